//! インタプリタのエラー型。
//!
//! ユーザに見えるのは常に汎用メッセージ [`GENERIC_ERROR`] だけで、
//! バリアントの詳細は `tracing` のデバッグログにのみ出力する。
//! [`ShellError::is_fatal`] が `true` のエラー（プロセス生成の枯渇）だけは
//! 行境界で回復せず、インタプリタ全体を異常終了させる。

use std::io;

use thiserror::Error;

use crate::spawn::SpawnError;

/// ユーザに表示する唯一のエラーメッセージ。
pub const GENERIC_ERROR: &str = "An error has occurred\n";

/// 1 行の処理中に発生しうるエラー。
#[derive(Debug, Error)]
pub enum ShellError {
    /// 1 行のトークン数が上限を超えた（構文エラーではなくリソースガード）。
    #[error("too many tokens on one line (limit {limit})")]
    TooManyTokens { limit: usize },

    /// グループ先頭のコマンドが検索パスのどこにも見つからない。
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// `>` の位置が不正（先頭・末尾・複数回）。
    #[error("syntax error: malformed output redirect")]
    InvalidRedirect,

    /// ビルトインの引数の数・形式が不正。
    #[error("{builtin}: {reason}")]
    BuiltinUsage {
        builtin: &'static str,
        reason: &'static str,
    },

    /// `cd` の移動先に移動できない。
    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },

    /// 入力ソースからの読み取りに失敗した（EOF ではない）。
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),

    /// 子プロセスを生成できなかった。回復不能。
    #[error(transparent)]
    Fork(#[from] SpawnError),
}

impl ShellError {
    /// 行境界で回復できず、インタプリタを異常終了させるべきエラーか。
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fork(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fork_failure_is_fatal() {
        let fork = ShellError::Fork(SpawnError::from_errno(libc::EAGAIN, "sleep"));
        assert!(fork.is_fatal());

        assert!(!ShellError::InvalidRedirect.is_fatal());
        assert!(!ShellError::CommandNotFound("nope".into()).is_fatal());
        assert!(!ShellError::TooManyTokens { limit: 127 }.is_fatal());
    }

    #[test]
    fn messages_carry_detail_for_logs() {
        let err = ShellError::CommandNotFound("frobnicate".into());
        assert_eq!(err.to_string(), "frobnicate: command not found");

        let err = ShellError::BuiltinUsage {
            builtin: "exit",
            reason: "takes no arguments",
        };
        assert_eq!(err.to_string(), "exit: takes no arguments");
    }
}
