//! デバッガセッション
//!
//! コマンドハンドラが読み書きする状態をすべてここに集めます。グローバル変数は
//! 使わず、`Session` を `&mut` で渡して回ります。

use crate::alias::AliasTable;
use crate::breakpoint::{SpyId, SpyTable};
use crate::console::Console;
use crate::flags::DebugFlags;
use crate::help::HelpStore;
use crate::io_tabling::IoTabling;
use crate::listing::ListingPath;
use crate::procspec::ProcSpecParser;
use crate::queue::LineQueue;
use crate::runtime::Collaborators;
use crate::settings::{Features, Settings};
use crate::trust::TrustList;
use crate::Result;
use std::io::Write;

/// 1つのデバッガセッションの状態
pub struct Session {
    pub settings: Settings,
    /// 端末より先に処理する入力行
    pub queue: LineQueue,
    pub aliases: AliasTable,
    pub spies: SpyTable,
    pub help: HelpStore,
    pub trust: TrustList,
    pub flags: DebugFlags,
    pub io_tabling: IoTabling,
    pub listing: ListingPath,
    pub features: Features,
    pub console: Console,
    pub collab: Collaborators,
    pub(crate) proc_specs: ProcSpecParser,
    /// 現在の画面に出したイベント報告の行数
    pub(crate) scroll_next: usize,
    /// ブレークポイント条件を評価できなかったときのメッセージ
    pub(crate) condition_problem: Option<(SpyId, String)>,
}

impl Session {
    pub fn new(console: Console, collab: Collaborators, features: Features) -> Result<Self> {
        Ok(Self {
            settings: Settings::default(),
            queue: LineQueue::new(),
            aliases: AliasTable::new(),
            spies: SpyTable::new(),
            help: HelpStore::with_commands(),
            trust: TrustList::new(),
            flags: DebugFlags::new(),
            io_tabling: IoTabling::new(features.io_tabling),
            listing: ListingPath::new(),
            features,
            console,
            collab,
            proc_specs: ProcSpecParser::new()?,
            scroll_next: 0,
            condition_problem: None,
        })
    }

    /// 出力ストリーム
    pub fn out(&mut self) -> &mut dyn Write {
        self.console.out()
    }

    /// エラーストリーム（出力を先にフラッシュする）
    pub fn err(&mut self) -> &mut dyn Write {
        self.console.err()
    }

    /// 最後の行を端末から読んだか
    pub fn is_interacting(&self) -> bool {
        self.console.is_interacting()
    }

    /// 実行エンジンが条件を評価できなかったことを知らせる
    ///
    /// 次に対話に入るとき、プロンプトの前に報告されます。
    pub fn report_condition_problem(&mut self, id: SpyId, problem: impl Into<String>) {
        self.condition_problem = Some((id, problem.into()));
    }

    /// `mdb: <problem>.` をエラーストリームに書く
    pub(crate) fn problem(&mut self, problem: impl std::fmt::Display) -> Result<()> {
        writeln!(self.err(), "mdb: {}.", problem)?;
        Ok(())
    }

    /// 現在のコマンドの使い方エラー
    pub(crate) fn usage(&mut self, name: &str) -> Result<()> {
        writeln!(
            self.err(),
            "mdb: {}: usage error -- type `help {}' for help.",
            name, name
        )?;
        Ok(())
    }

    /// 対話中（端末から読んだ行）のときだけ確認メッセージを出す
    pub(crate) fn confirm(&mut self, message: &str) -> Result<()> {
        if self.is_interacting() {
            writeln!(self.out(), "{}", message)?;
        }
        Ok(())
    }
}
