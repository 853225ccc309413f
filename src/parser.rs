//! トークナイザ + グループ分割 + リダイレクト検証。
//!
//! 入力行を空白で分割し、各断片をさらに `&` と `>` で分割してトークン列を作る。
//! 区切り文字そのものも独立したトークンとして元の順序のまま残る。
//!
//! ## 対応構文
//!
//! - 並行実行: `cmd1 args & cmd2 args`（`&` で区切られた各グループを同時に起動）
//! - リダイレクト: `cmd args > file`（グループ末尾の 1 組のみ）
//!
//! クォート・エスケープ・変数展開はない。`"a>b"` も `"`, `a`, `>`, `b"` に分割される。

use crate::error::ShellError;

/// トークン。空文字列にはならない。
pub type Token = String;

/// ジョブ区切り。グループ境界を表す。
pub const JOB_SEPARATOR: &str = "&";

/// リダイレクト区切り。グループの stdout をファイルへ向ける。
pub const REDIRECT: &str = ">";

/// 1 行あたりの最大トークン数。終端を含めて 128 要素に収まる上限。
pub const MAX_TOKENS: usize = 127;

/// 断片の再分割に使う 1 文字区切り。
const DELIMITERS: [char; 2] = ['&', '>'];

// ── Tokenizer ───────────────────────────────────────────────────────

/// 空白クラス（スペース、タブ、CR、LF）か。
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// 入力行をトークン列に変換する。
///
/// 1. 空白クラスで分割し、空の断片を捨てる。
/// 2. 各断片を `&` / `>` で分割し、区切り文字もトークンとして残す。
///    両方を含む断片では、未走査部分の中で最も手前にある区切り文字を採用する。
///
/// トークン数が [`MAX_TOKENS`] を超えると [`ShellError::TooManyTokens`]。
pub fn tokenize(line: &str) -> Result<Vec<Token>, ShellError> {
    let mut tokens = Vec::new();
    for fragment in line.split(is_blank).filter(|f| !f.is_empty()) {
        split_fragment(fragment, &mut tokens)?;
    }
    Ok(tokens)
}

/// 空白を含まない断片を区切り文字で分割し、`out` に追加する。
fn split_fragment(fragment: &str, out: &mut Vec<Token>) -> Result<(), ShellError> {
    let mut rest = fragment;
    while !rest.is_empty() {
        // どちらの区切り文字でも最小オフセットのものが先に見つかる
        match rest.find(&DELIMITERS[..]) {
            Some(at) => {
                push_token(out, &rest[..at])?;
                push_token(out, &rest[at..at + 1])?;
                rest = &rest[at + 1..];
            }
            None => {
                push_token(out, rest)?;
                break;
            }
        }
    }
    Ok(())
}

fn push_token(out: &mut Vec<Token>, s: &str) -> Result<(), ShellError> {
    if s.is_empty() {
        return Ok(());
    }
    if out.len() >= MAX_TOKENS {
        tracing::debug!(limit = MAX_TOKENS, "token limit exceeded");
        return Err(ShellError::TooManyTokens { limit: MAX_TOKENS });
    }
    out.push(s.to_string());
    Ok(())
}

// ── Groups ──────────────────────────────────────────────────────────

/// トークン列を `&` でグループに分割する。空のグループは読み飛ばす。
///
/// 行末は常に暗黙の `&` として扱われるため、末尾 `&` の有無で結果は変わらない。
pub fn groups(tokens: &[Token]) -> impl Iterator<Item = &[Token]> + '_ {
    tokens
        .split(|t| t.as_str() == JOB_SEPARATOR)
        .filter(|group| !group.is_empty())
}

// ── Redirect ────────────────────────────────────────────────────────

/// グループ内のリダイレクト指定の検証結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectResult {
    /// `>` を含まない。
    NoRedirect,
    /// `cmd ... > file` の形。値はファイル名トークンのインデックス。
    Redirect(usize),
    /// `>` が先頭・末尾にある、または 2 回以上現れる。
    Invalid,
}

/// 1 グループのトークン列を左から走査し、リダイレクトの妥当性を判定する。
///
/// `>` は「末尾から 2 番目」かつ「前に 1 つ以上トークンがある」場合のみ有効。
pub fn validate_redirect(group: &[Token]) -> RedirectResult {
    let mut result = RedirectResult::NoRedirect;
    for (i, token) in group.iter().enumerate() {
        if token != REDIRECT {
            continue;
        }
        let in_place = i > 0 && i + 2 == group.len();
        if !in_place || result != RedirectResult::NoRedirect {
            return RedirectResult::Invalid;
        }
        result = RedirectResult::Redirect(i + 1);
    }
    result
}

/// 検証済みグループを「コマンド + 引数」と「リダイレクト先」に分ける。
///
/// リダイレクトが不正なら `None`。
pub fn split_redirect(group: &[Token]) -> Option<(&[Token], Option<&str>)> {
    match validate_redirect(group) {
        RedirectResult::NoRedirect => Some((group, None)),
        RedirectResult::Redirect(idx) => Some((&group[..idx - 1], Some(group[idx].as_str()))),
        RedirectResult::Invalid => None,
    }
}
