//! 呼び出しテーブル探索のエラー

use thiserror::Error;

/// `table` コマンドの引数処理と列挙で起きるエラー
///
/// 表示文字列はそのままユーザーに見せるメッセージです。
#[derive(Debug, Error)]
pub enum TableError {
    #[error("There are only {0} input arguments.")]
    TooManyInputs(usize),

    #[error("Sorry, this procedure has only {0} tabled arguments")]
    TooManyTabled(usize),

    #[error("Sorry, can handle only integer, float and string arguments for now.")]
    UnsupportedStep,

    #[error("argument {0} is not an integer.")]
    NotAnInteger(usize),

    #[error("argument {0} is not a float.")]
    NotAFloat(usize),

    #[error("call table does not contain {value} in argument position {arg}.")]
    NotInTable { value: String, arg: usize },

    /// 列挙中に、スナップショットから取った値でトライをたどれなかった
    #[error("internal error: trie lookup failed for {0} while enumerating")]
    BadLookup(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TableError {
    /// ランタイムの状態が壊れていることを示すエラーかどうか
    pub fn is_internal(&self) -> bool {
        matches!(self, TableError::BadLookup(_))
    }
}
