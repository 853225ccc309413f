//! 行全体の形式検証。
//!
//! 空でない各グループについて、先頭トークンが検索パスで解決できることと
//! リダイレクト指定が正しいことを確認する。1 グループでも失敗すれば行全体を拒否し、
//! どのグループも実行しない。

use crate::error::ShellError;
use crate::parser::{self, RedirectResult, Token};
use crate::path::SearchPaths;

/// トークン列を検証する。最初に見つかった問題で打ち切る。
///
/// 空でないグループが 1 つもない行はエラーではない（何もしない行）。
pub fn validate_line(tokens: &[Token], paths: &SearchPaths) -> Result<(), ShellError> {
    for group in parser::groups(tokens) {
        let command = &group[0];
        if paths.resolve(command).is_none() {
            return Err(ShellError::CommandNotFound(command.clone()));
        }
        if parser::validate_redirect(group) == RedirectResult::Invalid {
            return Err(ShellError::InvalidRedirect);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(line: &str) -> Result<(), ShellError> {
        let tokens = parser::tokenize(line).unwrap();
        validate_line(&tokens, &SearchPaths::default())
    }

    #[test]
    fn accepts_resolvable_groups() {
        assert!(check("ls -l").is_ok());
        assert!(check("ls -l & echo hi").is_ok());
        assert!(check("echo hi > out.txt & ls").is_ok());
    }

    #[test]
    fn empty_line_and_bare_separators_are_ok() {
        assert!(check("").is_ok());
        assert!(check("& &").is_ok());
        assert!(check("ls &").is_ok());
    }

    #[test]
    fn rejects_unknown_command_in_any_group() {
        assert!(matches!(
            check("ls & no-such-command-xyz"),
            Err(ShellError::CommandNotFound(name)) if name == "no-such-command-xyz"
        ));
    }

    #[test]
    fn rejects_bad_redirect_in_any_group() {
        assert!(matches!(check("ls & echo hi >"), Err(ShellError::InvalidRedirect)));
        assert!(matches!(check("echo > a > b"), Err(ShellError::InvalidRedirect)));
    }

    #[test]
    fn leading_redirect_fails_resolution_first() {
        // `>` がコマンド位置にあると解決に失敗する
        assert!(matches!(check("> out"), Err(ShellError::CommandNotFound(_))));
    }

    #[test]
    fn ambiguous_redirect_then_separator_is_invalid() {
        // `ls > & out` → グループ [ls, >] と [out]
        assert!(check("ls > & out").is_err());
    }

    #[test]
    fn empty_search_paths_reject_everything() {
        let tokens = parser::tokenize("ls").unwrap();
        assert!(validate_line(&tokens, &SearchPaths::new(Vec::<String>::new())).is_err());
    }
}
