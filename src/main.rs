//! lsh: 並行ジョブ実行つきの最小シェル
//!
//! 引数なしなら対話モード（プロンプトを表示して標準入力を読む）、
//! スクリプトファイルを 1 つ渡すとバッチモード（プロンプトなしでファイルを読む）。
//!
//! REPLループ: プロンプト表示 → 1 行読み取り → トークン化 → ビルトイン or 検証 + 並行起動 → 全待機 → ループ
//!
//! ログは `LSH_LOG` 環境変数（`tracing_subscriber::EnvFilter` 形式）で有効化し、標準エラーに出す。

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lsh::console::{Console, Terminal};
use lsh::input;
use lsh::path::SearchPaths;
use lsh::shell::Shell;

/// ログ設定を読む環境変数。
const LOG_ENV: &str = "LSH_LOG";

#[derive(Parser)]
#[command(name = "lsh", version, about = "A minimal shell with concurrent jobs")]
struct Cli {
    /// 1 行ずつ実行するスクリプトファイル。省略時は標準入力から対話的に読む。
    script: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            Terminal::batch().show_error();
            return ExitCode::FAILURE;
        }
    };

    init_tracing();

    let mut shell = match Shell::new(SearchPaths::default()) {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!(error = %e, "cannot determine current directory");
            Terminal::batch().show_error();
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.script {
        Some(path) => {
            let mut console = Terminal::batch();
            let mut script = match input::open_script(path) {
                Ok(script) => script,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "cannot open script");
                    console.show_error();
                    return ExitCode::FAILURE;
                }
            };
            tracing::info!(path = %path.display(), "batch mode");
            shell.run(&mut script, &mut console)
        }
        None => shell.run(&mut input::stdin(), &mut Terminal::interactive()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_fatal() => {
            tracing::error!(error = %e, "aborting");
            std::process::abort()
        }
        Err(e) => {
            tracing::error!(error = %e, "input failed");
            ExitCode::FAILURE
        }
    }
}
