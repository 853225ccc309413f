//! コマンド検索パスと実行ファイルの解決。
//!
//! 検索は [`SearchPaths`] に明示されたプレフィックスだけを順に試す。
//! `$PATH` は参照せず、コマンド名に `./` を補うこともしない。
//! 空文字列のプレフィックスは「カレントディレクトリからの相対」を意味する。

use std::ffi::CString;

/// 起動時の既定プレフィックス。
pub const DEFAULT_SEARCH_PATHS: [&str; 3] = ["", "/bin/", "/usr/bin/"];

/// 順序付きのディレクトリプレフィックス列。先に一致したものが優先される。
///
/// `path` ビルトインで丸ごと置き換えられる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    prefixes: Vec<String>,
}

impl SearchPaths {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// `name` を各プレフィックスと連結し、最初に実行可能だった候補を返す。
    pub fn resolve(&self, name: &str) -> Option<String> {
        let found = self
            .prefixes
            .iter()
            .map(|prefix| candidate(prefix, name))
            .find(|path| is_executable(path));
        tracing::debug!(command = name, resolved = ?found, "resolve");
        found
    }
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_PATHS)
    }
}

/// `prefix + ('/' が必要なら) + name` を組み立てる。
fn candidate(prefix: &str, name: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        format!("{prefix}{name}")
    } else {
        format!("{prefix}/{name}")
    }
}

/// `access(X_OK)` で存在と実行権限を確認する。ファイルを開くことはない。
pub fn is_executable(path: &str) -> bool {
    match CString::new(path) {
        Ok(c_path) => unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 },
        Err(_) => false,
    }
}
