//! `fork()` + `execv()` による 1 グループの起動。
//!
//! 子プロセス側で stdout のリダイレクトを設定してからプログラムを実行する。
//! fork 後の子では非同期シグナル安全な呼び出し（`open`, `dup2`, `close`, `execv`, `_exit`）
//! しか行わないため、C 文字列はすべて親で用意してから fork する。
//!
//! ## 構成
//!
//! | 型 | 役割 |
//! |-----|------|
//! | [`CStringVec`] | argv 用の NULL 終端ポインタ配列 |
//! | [`Child`] | 起動した子プロセスのハンドル。[`Child::wait`] で reap する |
//! | [`spawn`] | fork して子で redirect + exec する公開関数 |

use std::ffi::{CStr, CString};
use std::fmt;
use std::io;

/// リダイレクト先ファイルのパーミッション（所有者の読み書きのみ）。
const REDIRECT_MODE: libc::c_uint = 0o600;

/// 子でリダイレクト先を開けなかったときの終了ステータス。
const EXIT_REDIRECT_FAILED: i32 = 1;

/// 子で exec できなかったときの終了ステータス。
const EXIT_EXEC_FAILED: i32 = 127;

// ── エラー型 ──────────────────────────────────────────────────────

/// `fork()` の失敗を表すエラー。プロセス表の枯渇などで、回復不能として扱う。
#[derive(Debug)]
pub struct SpawnError {
    /// errno 値。
    pub errno: i32,
    /// コマンド名（エラーメッセージ用）。
    pub command: String,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = io::Error::from_raw_os_error(self.errno);
        write!(f, "{}: fork failed: {}", self.command, reason)
    }
}

impl std::error::Error for SpawnError {}

impl SpawnError {
    pub fn from_errno(errno: i32, command: &str) -> Self {
        Self {
            errno,
            command: command.to_string(),
        }
    }

    fn last_os_error(command: &str) -> Self {
        let errno = io::Error::last_os_error().raw_os_error().unwrap_or(libc::EAGAIN);
        Self::from_errno(errno, command)
    }
}

// ── CStringVec ────────────────────────────────────────────────────

/// argv 用の CString ベクタ。NULL 終端のポインタ配列を構築する。
struct CStringVec {
    _strings: Vec<CString>,
    ptrs: Vec<*const libc::c_char>,
}

impl CStringVec {
    /// 引数リストから構築する。NUL を含む引数は空文字列になる。
    fn from_args(args: &[&str]) -> Self {
        let strings: Vec<CString> = args
            .iter()
            .map(|s| CString::new(*s).unwrap_or_default())
            .collect();
        let mut ptrs: Vec<*const libc::c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(std::ptr::null()); // NULL 終端
        Self {
            _strings: strings,
            ptrs,
        }
    }

    fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }
}

// ── Child ─────────────────────────────────────────────────────────

/// 起動済みの子プロセス。[`wait`](Child::wait) で消費されるまで reap されていない。
#[derive(Debug)]
pub struct Child {
    pid: libc::pid_t,
    command: String,
}

impl Child {
    pub fn pid(&self) -> libc::pid_t {
        self.pid
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// 子プロセスの終了までブロックし、`waitpid` の raw status を返す。
    ///
    /// シグナル割り込み（`EINTR`）では待機を再開する。
    pub fn wait(self) -> io::Result<i32> {
        let mut raw_status: i32 = 0;
        loop {
            let ret = unsafe { libc::waitpid(self.pid, &mut raw_status, 0) };
            if ret == self.pid {
                return Ok(raw_status);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }
}

/// `waitpid` の raw status を終了ステータスに変換する。シグナル終了は 128 + シグナル番号。
pub fn exit_code(raw_status: i32) -> i32 {
    if libc::WIFEXITED(raw_status) {
        libc::WEXITSTATUS(raw_status)
    } else if libc::WIFSIGNALED(raw_status) {
        128 + libc::WTERMSIG(raw_status)
    } else {
        1
    }
}

// ── spawn 関数 ────────────────────────────────────────────────────

/// 子プロセスを 1 つ起動する。成功時は [`Child`] を返す。
///
/// - `program`: 解決済みの実行ファイルパス。`None` なら子は exec せず 127 で終了する
/// - `args`: `args[0]` は元のコマンドトークン、以降が引数（リダイレクト部分は除去済み）
/// - `redirect`: stdout の書き込み先。作成 + 切り詰め、モード 0600
///
/// `Err` になるのは fork 自体の失敗だけ。リダイレクトや exec の失敗は子の終了ステータスに現れる。
pub fn spawn(
    program: Option<&str>,
    args: &[&str],
    redirect: Option<&str>,
) -> Result<Child, SpawnError> {
    let command = args.first().copied().unwrap_or_default();
    let program = program.map(|p| CString::new(p).unwrap_or_default());
    let argv = CStringVec::from_args(args);
    let target = redirect.map(|t| CString::new(t).unwrap_or_default());

    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(SpawnError::last_os_error(command));
    }
    if pid == 0 {
        // 子プロセス: ここから先は戻らない
        unsafe { exec_child(program.as_deref(), &argv, target.as_deref()) }
    }

    tracing::debug!(pid, command, redirect = ?redirect, "launched");
    Ok(Child {
        pid,
        command: command.to_string(),
    })
}

/// 子プロセス側の処理。stdout を差し替えてから exec する。
///
/// 元の stdout は復元しない（exec でプロセスイメージごと置き換わるため）。
unsafe fn exec_child(
    program: Option<&CStr>,
    argv: &CStringVec,
    target: Option<&CStr>,
) -> ! {
    if let Some(target) = target {
        let fd = libc::open(
            target.as_ptr(),
            libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
            REDIRECT_MODE,
        );
        if fd < 0 || libc::dup2(fd, libc::STDOUT_FILENO) < 0 {
            libc::_exit(EXIT_REDIRECT_FAILED);
        }
        if fd != libc::STDOUT_FILENO {
            libc::close(fd);
        }
    }

    if let Some(program) = program {
        libc::execv(program.as_ptr(), argv.as_ptr());
    }
    libc::_exit(EXIT_EXEC_FAILED)
}
