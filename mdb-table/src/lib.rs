//! mdb 呼び出しテーブル探索
//!
//! このクレートは、メモ化（テーブリング）された手続きの呼び出しテーブルを
//! たどる機能を提供します。ユーザーが指定した引数でトライを絞り込み、
//! 残りの引数位置をバックトラックしながら列挙します。

pub mod call_table;
pub mod error;
pub mod trie;
pub mod value;
pub mod walker;

pub use call_table::{CallTableArg, CallTableInfo, CallTableQuery, EvalMethod, StepKind};
pub use error::TableError;
pub use trie::{MemoTrie, NodeRef, TrieAccess};
pub use value::{format_tuple, ArgKind, ArgValue};
pub use walker::entry_count;

/// テーブル探索の結果型
pub type Result<T> = anyhow::Result<T>;
