//! ビルトインコマンドの実装。
//!
//! ビルトインは fork/exec を経由せずプロセス内で直接実行される。
//! 判定はジョブ分割や実行ファイルの解決より前に、行全体のトークン列に対して行う。
//! `try_exec()` の戻り値は 3 状態:
//!
//! - `None`: 該当するビルトインなし（外部コマンドとして扱う）
//! - `Some(Ok(()))`: ビルトインとして実行済み
//! - `Some(Err(_))`: ビルトインだが使い方が不正。状態は変更しない

use std::env;

use crate::error::ShellError;
use crate::parser::{Token, JOB_SEPARATOR};
use crate::path::SearchPaths;
use crate::shell::Shell;

/// ビルトイン名の一覧。判定順でもある。
const BUILTINS: [&str; 3] = ["exit", "cd", "path"];

/// ビルトインコマンドの実行を試みる。`exit` → `cd` → `path` の順に照合する。
pub fn try_exec(shell: &mut Shell, tokens: &[Token]) -> Option<Result<(), ShellError>> {
    let name = tokens.first()?;
    let builtin = BUILTINS.iter().copied().find(|b| *b == name.as_str())?;

    // `>` は通常の引数として扱う
    if tokens.iter().any(|t| t == JOB_SEPARATOR) {
        return Some(Err(usage(builtin, "cannot be combined with `&`")));
    }

    let outcome = match builtin {
        "exit" => builtin_exit(shell, tokens),
        "cd" => builtin_cd(shell, tokens),
        _ => {
            shell.search_paths = builtin_path(tokens);
            tracing::debug!(paths = ?shell.search_paths.prefixes(), "search paths replaced");
            Ok(())
        }
    };
    Some(outcome)
}

fn usage(builtin: &'static str, reason: &'static str) -> ShellError {
    ShellError::BuiltinUsage { builtin, reason }
}

/// `exit`: 引数なしのときだけ REPL ループに終了を要求する。
fn builtin_exit(shell: &mut Shell, args: &[Token]) -> Result<(), ShellError> {
    if args.len() != 1 {
        return Err(usage("exit", "takes no arguments"));
    }
    shell.should_exit = true;
    Ok(())
}

/// `cd dir`: `./dir` に移動し、プロンプト用のカレントディレクトリを再取得する。
///
/// 引数は常にカレントディレクトリからの相対として扱う（`cd /tmp` は `.//tmp`）。
/// `Err` を返すのは移動そのものに失敗したときだけで、その場合ディレクトリは変わらない。
fn builtin_cd(shell: &mut Shell, args: &[Token]) -> Result<(), ShellError> {
    let [_, dir] = args else {
        return Err(usage("cd", "expected exactly one directory"));
    };
    let target = format!("./{dir}");
    env::set_current_dir(&target).map_err(|source| ShellError::ChangeDir {
        path: dir.clone(),
        source,
    })?;
    // 移動は成功済み。再取得に失敗したらプロンプトは古い表示のまま続ける
    if let Err(e) = shell.refresh_cwd() {
        tracing::warn!(dir = %dir, error = %e, "cannot refresh cwd after cd");
        return Ok(());
    }
    tracing::debug!(cwd = %shell.cwd, "changed directory");
    Ok(())
}

/// `path [dir ...]`: 残りの引数から新しい検索パスを作る。引数なしなら空になる。
fn builtin_path(args: &[Token]) -> SearchPaths {
    SearchPaths::new(args[1..].iter().cloned())
}
