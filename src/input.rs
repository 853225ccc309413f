//! 入力ソース。1 回の呼び出しで 1 行を返し、EOF と読み取りエラーを区別する。
//!
//! 対話モードは標準入力、スクリプトモードはファイルを [`LineReader`] で包んで使う。

use std::fs::File;
use std::io::{self, BufRead, BufReader, StdinLock};
use std::path::Path;

/// REPL ループが行を取り出す先。
pub trait InputSource {
    /// 次の 1 行を返す。EOF なら `Ok(None)`。
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// 任意の [`BufRead`] を行単位の入力ソースにする。
///
/// 不正な UTF-8 は置換文字に変換し、読み取りエラー扱いにはしない。
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineReader<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// 対話モード用: 標準入力から読む。
pub fn stdin() -> LineReader<StdinLock<'static>> {
    LineReader::new(io::stdin().lock())
}

/// スクリプトモード用: ファイルを開いて読む。
pub fn open_script(path: &Path) -> io::Result<LineReader<BufReader<File>>> {
    Ok(LineReader::new(BufReader::new(File::open(path)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn yields_lines_then_eof() {
        let mut input = LineReader::new("ls -l\necho hi\n".as_bytes());
        assert_eq!(input.next_line().unwrap().as_deref(), Some("ls -l\n"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("echo hi\n"));
        assert_eq!(input.next_line().unwrap(), None);
        assert_eq!(input.next_line().unwrap(), None);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let mut input = LineReader::new("exit".as_bytes());
        assert_eq!(input.next_line().unwrap().as_deref(), Some("exit"));
        assert_eq!(input.next_line().unwrap(), None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut input = LineReader::new(&b"echo \xff\n"[..]);
        assert_eq!(input.next_line().unwrap().as_deref(), Some("echo \u{fffd}\n"));
    }

    #[test]
    fn script_file_is_read_line_by_line() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "path\nexit\n").unwrap();

        let mut input = open_script(file.path()).unwrap();
        assert_eq!(input.next_line().unwrap().as_deref(), Some("path\n"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("exit\n"));
        assert_eq!(input.next_line().unwrap(), None);
    }

    #[test]
    fn missing_script_is_an_error() {
        assert!(open_script(Path::new("/nonexistent/script.lsh")).is_err());
    }
}
