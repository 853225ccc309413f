//! lsh ライブラリ: ベンチマーク・テスト用にモジュールを公開する。
//!
//! バイナリ本体は `main.rs`（引数解析、ログ初期化、入力ソースの選択）。
//! この `lib.rs` は `benches/bench_main.rs` や `tests/` から
//! トークナイザ・パス解決・起動処理に直接アクセスするために存在する。
//!
//! ## モジュール構成
//!
//! | モジュール | 役割 |
//! |-----------|------|
//! | [`parser`] | トークン化（空白 + `&`/`>` 区切り、上限 127 個）、ジョブ分割、リダイレクト形式の判定 |
//! | [`path`] | 検索パスと実行ファイルの解決（`prefix + "/" + name`、`access(X_OK)`） |
//! | [`validator`] | 行全体の事前検証（全グループのコマンド解決 + リダイレクト形式） |
//! | [`builtins`] | ビルトイン（`exit`, `cd`, `path`） |
//! | [`spawn`] | `fork` + `execv` ラッパー（子側で stdout リダイレクト） |
//! | [`executor`] | 1 行の実行（全グループを起動してから全員を reap） |
//! | [`shell`] | シェル状態（検索パス、カレントディレクトリ、終了要求）と REPL ループ |
//! | [`input`] | 入力ソース（標準入力 / スクリプトファイル） |
//! | [`console`] | プロンプトと汎用エラーメッセージの出力 |
//! | [`error`] | エラー型と汎用エラーメッセージ |

pub mod builtins;
pub mod console;
pub mod error;
pub mod executor;
pub mod input;
pub mod parser;
pub mod path;
pub mod shell;
pub mod spawn;
pub mod validator;
