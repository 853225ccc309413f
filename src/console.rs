//! プロンプトとエラーメッセージの出力先。
//!
//! コア側はメッセージを組み立てず、「プロンプトを出す」「汎用エラーを出す」を依頼するだけ。

use std::io::{self, Write};

use crate::error::GENERIC_ERROR;

/// プロンプト末尾の文字列。
pub const PROMPT: &str = "lsh> ";

/// REPL ループが使う出力先。
pub trait Console {
    /// 入力待ちの前に呼ばれる。非対話モードでは何もしない。
    fn show_prompt(&mut self, cwd: &str);
    /// 汎用エラーメッセージを 1 回出す。
    fn show_error(&mut self);
}

/// 標準出力 / 標準エラーに書く実装。
pub struct Terminal {
    interactive: bool,
}

impl Terminal {
    /// プロンプトを表示する対話モード。
    pub fn interactive() -> Self {
        Self { interactive: true }
    }

    /// プロンプトを表示しないスクリプトモード。
    pub fn batch() -> Self {
        Self { interactive: false }
    }
}

/// `"<cwd>" - lsh> ` 形式のプロンプト文字列。
pub fn prompt_for(cwd: &str) -> String {
    format!("\"{cwd}\" - {PROMPT}")
}

impl Console for Terminal {
    fn show_prompt(&mut self, cwd: &str) {
        if !self.interactive {
            return;
        }
        let mut out = io::stdout().lock();
        let _ = out.write_all(prompt_for(cwd).as_bytes());
        let _ = out.flush();
    }

    fn show_error(&mut self) {
        let _ = io::stderr().write_all(GENERIC_ERROR.as_bytes());
    }
}
