//! シェルの実行状態と REPL ループ。
//!
//! 状態は検索パス、プロンプト表示用のカレントディレクトリ文字列、終了要求フラグだけ。
//! どれも行と行の間（前の行の子プロセスを全員 reap した後）にしか変更されない。

use std::env;
use std::io;

use crate::console::Console;
use crate::error::ShellError;
use crate::executor;
use crate::input::InputSource;
use crate::path::SearchPaths;

/// シェルの実行状態。REPL ループ全体で共有される。
pub struct Shell {
    /// コマンド解決に使う検索パス。`path` ビルトインで丸ごと置き換えられる。
    pub search_paths: SearchPaths,
    /// カレントディレクトリのキャッシュ。プロンプト表示専用で、`cd` 成功時に再取得する。
    pub cwd: String,
    /// `exit` ビルトインで true にセットされ、REPL ループを終了させる。
    pub should_exit: bool,
}

impl Shell {
    /// カレントディレクトリを取得して状態を作る。取得に失敗したら `Err`。
    pub fn new(search_paths: SearchPaths) -> io::Result<Self> {
        let mut shell = Self {
            search_paths,
            cwd: String::new(),
            should_exit: false,
        };
        shell.refresh_cwd()?;
        Ok(shell)
    }

    /// OS のカレントディレクトリからキャッシュを更新する。
    pub fn refresh_cwd(&mut self) -> io::Result<()> {
        self.cwd = env::current_dir()?.to_string_lossy().into_owned();
        Ok(())
    }

    /// 入力が尽きるか `exit` が実行されるまで、1 行ずつ読んで実行する。
    ///
    /// 不正な行は汎用エラーを 1 回表示して次の行へ進む。
    /// 戻り値の `Err` は入力の読み取りエラーか、回復不能な fork の失敗のみ。
    pub fn run<I, C>(&mut self, input: &mut I, console: &mut C) -> Result<(), ShellError>
    where
        I: InputSource,
        C: Console,
    {
        while !self.should_exit {
            console.show_prompt(&self.cwd);

            let line = match input.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    console.show_error();
                    return Err(ShellError::Input(e));
                }
            };

            match executor::execute(self, &line) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, line = line.trim_end(), "line rejected");
                    console.show_error();
                }
            }
        }
        Ok(())
    }
}
