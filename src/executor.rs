//! 1 行の実行: トークン化 → ビルトイン判定 → 形式検証 → 並行起動 → 全待機。
//!
//! - [`execute`]: 入力行 1 つを最後まで処理する
//! - [`run`]: 検証済みトークン列の各グループを子プロセスとして起動し、全員を reap する
//!
//! 1 行の全グループは待機より前にすべて起動されるため、OS 上で並行に動く。
//! 起動した子の数と reap した子の数が一致するまで次の行は読まれない。

use crate::builtins;
use crate::error::ShellError;
use crate::parser::{self, Token};
use crate::path::SearchPaths;
use crate::shell::Shell;
use crate::spawn::{self, Child};
use crate::validator;

/// 入力行を 1 つ処理する。
///
/// 構文エラー・ビルトインの使い方の誤りは `Err` で返り、行は何も実行されない。
/// fork の失敗だけは [`ShellError::is_fatal`] なエラーになる。
pub fn execute(shell: &mut Shell, line: &str) -> Result<(), ShellError> {
    let tokens = parser::tokenize(line)?;
    if tokens.is_empty() {
        return Ok(());
    }

    if let Some(outcome) = builtins::try_exec(shell, &tokens) {
        return outcome;
    }

    validator::validate_line(&tokens, &shell.search_paths)?;
    run(&tokens, &shell.search_paths)?;
    Ok(())
}

/// 各グループを子プロセスとして起動し、全員の終了を待つ。reap した子の数を返す。
///
/// 前提: [`validator::validate_line`] が成功済みで、ビルトインではない。
/// リダイレクトが不正なグループがあれば、何も起動せずに [`ShellError::InvalidRedirect`] を返す。
///
/// 検証から起動までの間にコマンドが消えた場合も子は起動され、子の中で 127 終了する。
/// fork に失敗した場合は、それまでに起動した子を reap してからエラーを返す。
pub fn run(tokens: &[Token], paths: &SearchPaths) -> Result<usize, ShellError> {
    let plans = parser::groups(tokens)
        .map(parser::split_redirect)
        .collect::<Option<Vec<_>>>()
        .ok_or(ShellError::InvalidRedirect)?;

    let mut children: Vec<Child> = Vec::with_capacity(plans.len());
    for (argv, target) in plans {
        let program = paths.resolve(&argv[0]);
        let args: Vec<&str> = argv.iter().map(String::as_str).collect();

        match spawn::spawn(program.as_deref(), &args, target) {
            Ok(child) => children.push(child),
            Err(e) => {
                tracing::error!(error = %e, launched = children.len(), "fork failed");
                wait_all(children);
                return Err(e.into());
            }
        }
    }

    Ok(wait_all(children))
}

/// 子プロセスをすべて reap する。終了順は問わない。
fn wait_all(children: Vec<Child>) -> usize {
    let mut reaped = 0;
    for child in children {
        let pid = child.pid();
        let command = child.command().to_string();
        match child.wait() {
            Ok(raw_status) => {
                tracing::debug!(pid, command = %command, status = spawn::exit_code(raw_status), "reaped");
            }
            Err(e) => {
                tracing::warn!(pid, command = %command, error = %e, "waitpid failed");
            }
        }
        reaped += 1;
    }
    reaped
}
