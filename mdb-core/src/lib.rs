//! mdb デバッガのコア機能
//!
//! このクレートは、デバッガのコマンドインタプリタを提供します。
//! 入力行の読み込みと単語分割、エイリアス展開、コマンドのディスパッチ、
//! ブレークポイントや設定値などのセッション状態を扱います。
//! 実行エンジンや変数表示は `runtime` のトレイト越しに呼び出します。

pub mod alias;
pub mod breakpoint;
pub mod command;
pub mod config;
pub mod console;
pub mod directive;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod flags;
pub mod handlers;
pub mod help;
pub mod io_tabling;
pub mod listing;
pub mod options;
pub mod procspec;
pub mod queue;
pub mod reader;
pub mod runtime;
pub mod save;
pub mod session;
pub mod settings;
pub mod term;
pub mod trust;
pub mod words;

pub use breakpoint::{SpyId, SpyPoint, SpyTable};
pub use command::Command;
pub use config::StartupConfig;
pub use console::{Console, LineInput, ReadLine};
pub use directive::{Directive, PrintLevel, StopCommand, StopPolicy};
pub use dispatch::{enter_interactive, event_must_be_checked, handle_command, report_stop_event};
pub use event::{Determinism, Event, Port, ProcKind, ProcLayout};
pub use runtime::Collaborators;
pub use session::Session;
pub use settings::{Features, Settings};

// 他のクレートから使用するために再エクスポート
pub use mdb_table::{CallTableInfo, EvalMethod, MemoTrie, StepKind, TrieAccess};

/// デバッガの結果型
pub type Result<T> = anyhow::Result<T>;
