//! エラー型とエラーメッセージ定数

use thiserror::Error;

/// 未知のコマンドに対するメッセージの書式（`{}` はコマンド名）
pub const ERR_UNKNOWN_COMMAND: &str = "Give the command `help' for help.";

/// 移動コマンドがその場から動けない場合のメッセージ
pub const ERR_NO_OP: &str = "This command is a no-op from this port.";

/// 過去のイベントへは移動できない
pub const ERR_PAST_EVENT: &str = "The debugger cannot go to a past event.";

/// ブレークポイントが1つもない
pub const ERR_NO_BREAKPOINTS: &str = "There are no break points.";

/// 直近のブレークポイントがない
pub const ERR_NO_MOST_RECENT: &str = "mdb: there is no most recent break point.";

/// 手続き指定にマッチするものがない
pub const ERR_NO_SUCH_PROCEDURE: &str = "mdb: there is no such procedure.";

/// 手続き指定を解釈できない
pub const ERR_INVALID_PROC_SPEC: &str = "mdb: invalid procedure specification.";

/// コラボレータが提供していない機能
pub const ERR_NOT_AVAILABLE: &str = "not available in this configuration";

/// 行の単語分割で起きるエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("unmatched single quote")]
    UnmatchedSingleQuote,

    #[error("unmatched double quote")]
    UnmatchedDoubleQuote,

    #[error("bad backslash")]
    BadBackslash,

    #[error("too large a number")]
    NumberTooLarge,
}

/// オプションの解析エラー
///
/// 呼び出し側はこのエラーを受け取ると、現在のコマンドの使い方エラーを表示します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("unrecognized option `{0}'")]
    UnknownOption(String),

    #[error("option `{0}' requires an argument")]
    MissingArgument(String),

    #[error("option `{0}' doesn't allow an argument")]
    UnexpectedArgument(String),

    #[error("option `{0}' is ambiguous")]
    AmbiguousOption(String),

    #[error("bad argument `{value}' for option `{option}'")]
    BadValue { option: String, value: String },

    #[error("options `{0}' and `{1}' cannot be used together")]
    Conflict(String, String),
}
