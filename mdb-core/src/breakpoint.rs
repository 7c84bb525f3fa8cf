//! ブレークポイント（スパイポイント）管理
//!
//! 番号は 0 から振られ、削除しても再利用しません。直近に追加または
//! 操作したブレークポイントを `most_recent` として覚えておき、番号を
//! 省略したコマンドの対象にします。

use crate::event::{Event, Port, ProcLayout};
use crate::settings::{PrintFormat, Scope};
use crate::term::{Term, VarSpec};
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

/// ブレークポイントID
pub type SpyId = usize;

/// どのイベントで反応するか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpyWhen {
    All,
    Interface,
    Entry,
    /// 特定のラベル（`break here`）
    Specific,
    /// ソース行
    LineNo,
}

impl SpyWhen {
    pub fn name(self) -> &'static str {
        match self {
            SpyWhen::All => "all",
            SpyWhen::Interface => "interface",
            SpyWhen::Entry => "entry",
            SpyWhen::Specific => "specific",
            SpyWhen::LineNo => "linenumber",
        }
    }
}

impl From<Scope> for SpyWhen {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => SpyWhen::All,
            Scope::Interface => SpyWhen::Interface,
            Scope::Entry => SpyWhen::Entry,
        }
    }
}

/// 反応したときの動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpyAction {
    Stop,
    Print,
}

impl SpyAction {
    pub fn name(self) -> &'static str {
        match self {
            SpyAction::Stop => "stop",
            SpyAction::Print => "print",
        }
    }
}

/// 無視回数を数えるイベントの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreWhen {
    Entry,
    Interface,
}

impl IgnoreWhen {
    pub fn name(self) -> &'static str {
        match self {
            IgnoreWhen::Entry => "entry",
            IgnoreWhen::Interface => "interface",
        }
    }

    /// `break`/`ignore` のオプション文字
    pub fn short_option(self) -> &'static str {
        match self {
            IgnoreWhen::Entry => "-E",
            IgnoreWhen::Interface => "-I",
        }
    }

    fn counts(self, port: Port) -> bool {
        match self {
            IgnoreWhen::Entry => port.is_entry(),
            IgnoreWhen::Interface => port.is_interface(),
        }
    }
}

/// 反応したときに表示するもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    AllVars,
    Goal,
    Var(String),
}

/// 表示リストの1項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintItem {
    pub target: PrintTarget,
    pub format: PrintFormat,
    /// 変数が存在しないとき警告するか
    pub warn: bool,
}

impl PrintItem {
    /// `*` は全変数、`goal` はゴール、それ以外は変数名
    pub fn parse(word: &str, format: PrintFormat, warn: bool) -> Self {
        let target = match word {
            "*" => PrintTarget::AllVars,
            "goal" => PrintTarget::Goal,
            name => PrintTarget::Var(name.to_string()),
        };
        Self { target, format, warn }
    }

    /// `break -p` で再入力できる名前
    pub fn word(&self) -> &str {
        match &self.target {
            PrintTarget::AllVars => "*",
            PrintTarget::Goal => "goal",
            PrintTarget::Var(name) => name,
        }
    }
}

/// ブレークポイントを置く場所
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpyTarget {
    Proc(ProcLayout),
    /// 手続き内の特定のイベント
    Label {
        proc: ProcLayout,
        port: Port,
        goal_path: String,
    },
    Line {
        file: String,
        line: u32,
    },
}

impl fmt::Display for SpyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpyTarget::Proc(proc) => write!(f, "{}", proc),
            SpyTarget::Label {
                proc,
                port,
                goal_path,
            } => write!(f, "{} {} {}", proc, port, goal_path),
            SpyTarget::Line { file, line } => write!(f, "{}:{}", file, line),
        }
    }
}

/// 条件の比較方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondTest {
    Equal,
    NotEqual,
}

impl CondTest {
    /// `=`/`==` と `!=`/`\=` を受け付ける
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "=" | "==" => Some(CondTest::Equal),
            "!=" | "\\=" => Some(CondTest::NotEqual),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CondTest::Equal => "=",
            CondTest::NotEqual => "!=",
        }
    }
}

/// ブレークポイントの条件
#[derive(Debug, Clone, PartialEq)]
pub struct SpyCondition {
    pub var: VarSpec,
    pub test: CondTest,
    pub term: Term,
    pub require_var: bool,
    pub require_path: bool,
}

impl SpyCondition {
    /// `condition` コマンドの引数として再入力できる形
    pub fn to_args(&self) -> String {
        let mut args = String::new();
        if !self.require_var {
            args.push_str("-v ");
        } else if !self.require_path {
            args.push_str("-p ");
        }
        args.push_str(&format!("{} {} {}", self.var, self.test.symbol(), self.term));
        args
    }
}

/// ブレークポイント
#[derive(Debug, Clone, PartialEq)]
pub struct SpyPoint {
    pub when: SpyWhen,
    pub action: SpyAction,
    pub target: SpyTarget,
    pub ignore_when: IgnoreWhen,
    pub ignore_count: usize,
    pub enabled: bool,
    pub condition: Option<SpyCondition>,
    pub print_list: Vec<PrintItem>,
}

impl SpyPoint {
    pub fn new(when: SpyWhen, action: SpyAction, target: SpyTarget) -> Self {
        Self {
            when,
            action,
            target,
            ignore_when: IgnoreWhen::Entry,
            ignore_count: 0,
            enabled: true,
            condition: None,
            print_list: Vec::new(),
        }
    }

    /// 無視回数を使い切れる（いつか有効になり得る）か
    ///
    /// 特定イベントのブレークポイントは、そのポートが無視回数の
    /// 数え方に含まれなければ回数が減りません。
    pub fn can_become_enabled(&self) -> bool {
        if self.ignore_count == 0 {
            return true;
        }
        match &self.target {
            SpyTarget::Label { port, .. } => self.ignore_when.counts(*port),
            _ => true,
        }
    }

    fn matches(&self, event: &Event) -> bool {
        match &self.target {
            SpyTarget::Proc(proc) => {
                *proc == event.proc
                    && match self.when {
                        SpyWhen::Interface => event.port.is_interface(),
                        SpyWhen::Entry => event.port.is_entry(),
                        _ => true,
                    }
            }
            SpyTarget::Label {
                proc,
                port,
                goal_path,
            } => *proc == event.proc && *port == event.port && *goal_path == event.goal_path,
            SpyTarget::Line { file, line } => *file == event.file && *line == event.line,
        }
    }
}

/// ブレークポイントマネージャ
#[derive(Debug)]
pub struct SpyTable {
    points: HashMap<SpyId, SpyPoint>,
    next_id: SpyId,
    most_recent: Option<SpyId>,
}

impl SpyTable {
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
            next_id: 0,
            most_recent: None,
        }
    }

    /// ブレークポイントを追加し、直近のものにする
    pub fn add(&mut self, point: SpyPoint) -> SpyId {
        let id = self.next_id;
        self.next_id += 1;
        debug!("spy point {} added: {}", id, point.target);
        self.points.insert(id, point);
        self.most_recent = Some(id);
        id
    }

    /// ブレークポイントを削除する
    pub fn delete(&mut self, id: SpyId) -> Option<SpyPoint> {
        let removed = self.points.remove(&id);
        if removed.is_some() && self.most_recent == Some(id) {
            self.most_recent = None;
        }
        removed
    }

    pub fn get(&self, id: SpyId) -> Option<&SpyPoint> {
        self.points.get(&id)
    }

    pub fn get_mut(&mut self, id: SpyId) -> Option<&mut SpyPoint> {
        self.points.get_mut(&id)
    }

    /// 存在する番号を昇順で返す
    pub fn ids(&self) -> Vec<SpyId> {
        let mut ids: Vec<SpyId> = self.points.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// 番号順の (番号, ブレークポイント) 列
    pub fn iter(&self) -> impl Iterator<Item = (SpyId, &SpyPoint)> {
        self.ids().into_iter().filter_map(|id| self.points.get(&id).map(|p| (id, p)))
    }

    pub fn most_recent(&self) -> Option<SpyId> {
        self.most_recent
    }

    pub fn set_most_recent(&mut self, id: SpyId) {
        if self.points.contains_key(&id) {
            self.most_recent = Some(id);
        }
    }

    /// 一度は振られたが、もう存在しない番号か
    pub fn has_been_deleted(&self, id: SpyId) -> bool {
        id < self.next_id && !self.points.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// イベントに反応するブレークポイントを調べる
    ///
    /// 無視回数の残っているものは回数を減らして見送ります。停止するものが
    /// 1つでもあれば `Stop` を返します。条件の評価は変数を読める側の仕事です。
    pub fn check_event(&mut self, event: &Event) -> Option<(SpyAction, Vec<SpyId>)> {
        let mut action = None;
        let mut hits = Vec::new();
        for id in self.ids() {
            let Some(point) = self.points.get_mut(&id) else {
                continue;
            };
            if !point.enabled || !point.matches(event) {
                continue;
            }
            if point.ignore_count > 0 {
                if point.ignore_when.counts(event.port) {
                    point.ignore_count -= 1;
                }
                continue;
            }
            hits.push(id);
            if point.action == SpyAction::Stop || action.is_none() {
                action = Some(point.action);
            }
        }
        action.map(|a| (a, hits))
    }

    /// 1つのブレークポイントを一覧の形式で書く
    pub fn print_point(&self, out: &mut dyn Write, id: SpyId) -> io::Result<()> {
        let Some(point) = self.points.get(&id) else {
            return Ok(());
        };
        writeln!(
            out,
            "{:2}: {} {:<5} {:<9} {}",
            id,
            if point.enabled { '+' } else { '-' },
            point.action.name(),
            point.when.name(),
            point.target
        )?;
        if point.ignore_count > 0 {
            writeln!(
                out,
                "            (ignore next {} {} event{})",
                point.ignore_count,
                point.ignore_when.name(),
                if point.ignore_count == 1 { "" } else { "s" }
            )?;
        }
        if let Some(condition) = &point.condition {
            writeln!(out, "            {}", condition.to_args())?;
        }
        if !point.print_list.is_empty() {
            let items: Vec<&str> = point.print_list.iter().map(PrintItem::word).collect();
            writeln!(out, "            print {}", items.join(" "))?;
        }
        Ok(())
    }

    /// すべてのブレークポイントを番号順に書く
    pub fn print_all(&self, out: &mut dyn Write) -> io::Result<()> {
        for id in self.ids() {
            self.print_point(out, id)?;
        }
        Ok(())
    }
}

impl Default for SpyTable {
    fn default() -> Self {
        Self::new()
    }
}
