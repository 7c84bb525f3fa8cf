//! コマンドの結果と再開方針

use crate::event::Port;
use std::fmt;

/// ハンドラがドライバループに返す指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// 次のコマンドを読む
    KeepInteracting,
    /// 対話をやめ、`StopPolicy` に従って実行を再開する
    StopInteracting,
}

/// イベントをどこまで表示するか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrintLevel {
    None,
    Some,
    All,
}

impl PrintLevel {
    pub fn name(self) -> &'static str {
        match self {
            PrintLevel::None => "none",
            PrintLevel::Some => "some",
            PrintLevel::All => "all",
        }
    }

    /// `none`/`some`/`all` をパースする
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "none" => Some(PrintLevel::None),
            "some" => Some(PrintLevel::Some),
            "all" => Some(PrintLevel::All),
            _ => None,
        }
    }
}

impl fmt::Display for PrintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 実行をどこで止めるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCommand {
    /// イベント番号 N で止まる
    Goto(u64),
    /// 深さ N 以下の最後のポートで止まる
    Next(u64),
    Finish(u64),
    /// 深さ N の呼び出しが失敗したら止まる
    Fail(u64),
    /// 次の例外ポートで止まる
    Exception,
    /// EXIT を抜けた後で止まる
    Return,
    /// FAIL/REDO/EXCEPTION から前進した後で止まる
    ResumeForward,
    MinDepth(u64),
    MaxDepth(u64),
    /// 最後まで実行する
    ToEnd,
    /// プログラムを終了する（確認済みの `quit`）
    Terminate,
}

/// 実行の再開方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPolicy {
    /// 厳密モードでは途中のブレークポイントを無視する
    pub strict: bool,
    /// 途中のイベントの表示レベル
    pub print_level: PrintLevel,
    pub command: StopCommand,
    /// 各イベントで整合性検査を行うか
    pub check_integrity: bool,
}

impl StopPolicy {
    /// 次のイベントで止まる方針
    pub fn new(print_level: PrintLevel) -> Self {
        Self {
            strict: false,
            print_level,
            command: StopCommand::Goto(0),
            check_integrity: false,
        }
    }

    /// このイベントで止まるべきか
    ///
    /// 深さや番号の条件だけを判定します。ブレークポイントの判定は呼び出し側です。
    pub fn should_stop_at(&self, number: u64, depth: u64, port: Port) -> bool {
        match self.command {
            StopCommand::Goto(n) => number >= n,
            StopCommand::Next(d) | StopCommand::Finish(d) => depth <= d && port.is_final(),
            StopCommand::Fail(d) => {
                depth <= d && matches!(port, Port::Fail | Port::Exception)
            }
            StopCommand::Exception => port == Port::Exception,
            StopCommand::Return => port != Port::Exit,
            StopCommand::ResumeForward => !matches!(
                port,
                Port::Fail | Port::Redo | Port::Exception
            ),
            StopCommand::MinDepth(d) => depth >= d,
            StopCommand::MaxDepth(d) => depth <= d,
            StopCommand::ToEnd | StopCommand::Terminate => false,
        }
    }
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self::new(PrintLevel::Some)
    }
}
