//! 外部コラボレータのトレイト
//!
//! 実行エンジンや変数表示など、インタプリタの外にある機能はここの
//! トレイト越しに呼び出します。既定のメソッドは「この構成では使えない」
//! エラーか空のデータを返すので、実装側は必要なものだけ書けば済みます。

use crate::directive::{Directive, StopPolicy};
use crate::errors::ERR_NOT_AVAILABLE;
use crate::event::{Event, ProcLayout};
use crate::options::{DdOpts, DiceOpts, ViewOpts};
use crate::settings::{FormatParams, PrintFormat};
use crate::term::VarSpec;
use crate::Result;
use anyhow::anyhow;
use mdb_table::{CallTableInfo, TrieAccess};
use std::io::Write;

fn not_available<T>() -> Result<T> {
    Err(anyhow!(ERR_NOT_AVAILABLE))
}

/// `retry` が副作用のある I/O をまたぐときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryIoPolicy {
    Force,
    Interactive,
    OnlyIfSafe,
}

/// `retry` の実行方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// その場でやり直した
    Direct,
    /// 先に祖先の終了まで進める必要がある
    FinishFirst,
    /// 先に祖先の失敗まで進める必要がある
    FailFirst,
}

/// 宣言的デバッガの探索方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdSearchMode {
    TopDown,
    DivideAndQuery,
    SuspicionDivideAndQuery,
}

impl DdSearchMode {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "top_down" | "td" => Some(DdSearchMode::TopDown),
            "divide_and_query" | "dq" => Some(DdSearchMode::DivideAndQuery),
            "suspicion_divide_and_query" | "sdq" => Some(DdSearchMode::SuspicionDivideAndQuery),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DdSearchMode::TopDown => "top_down",
            DdSearchMode::DivideAndQuery => "divide_and_query",
            DdSearchMode::SuspicionDivideAndQuery => "suspicion_divide_and_query",
        }
    }
}

/// `print`/`browse`/`dump` の対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseTarget {
    Goal,
    Exception,
    ProcBody,
    AllVars,
    Var(String),
    /// I/O アクション番号
    Action(usize),
}

/// 対話的クエリの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Normal,
    CcQuery,
    IoQuery,
}

/// 深さヒストグラムの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramKind {
    /// 実行全体
    All,
    /// 最後に消去してから
    Exp,
}

/// `stats` の対象のうちエンジンが答えるもの
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTarget {
    Procs,
    Labels,
    VarNames,
}

/// 型コンストラクタの説明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCtorDesc {
    pub module: String,
    pub name: String,
    pub arity: usize,
    /// 表現方法の名前
    pub rep: String,
    pub functors: Vec<String>,
}

/// 型クラス宣言の説明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeClassDesc {
    pub module: String,
    pub name: String,
    pub arity: usize,
    pub methods: Vec<String>,
    pub instances: Vec<String>,
}

/// 変数の表示と祖先フレームの選択
pub trait Inspector {
    /// 選択中の祖先レベル
    fn current_level(&self) -> usize {
        0
    }

    /// 祖先レベルを選ぶ。範囲外ならエラー
    fn set_level(&mut self, _event: &Event, _level: usize, _detailed: bool, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn list_vars(&mut self, _event: &Event, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn list_held_vars(&mut self, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn print(
        &mut self,
        _event: &Event,
        _target: &BrowseTarget,
        _format: PrintFormat,
        _params: FormatParams,
        _out: &mut dyn Write,
    ) -> Result<()> {
        not_available()
    }

    fn browse(
        &mut self,
        _event: &Event,
        _target: &BrowseTarget,
        _format: PrintFormat,
        _xml: bool,
        _out: &mut dyn Write,
    ) -> Result<()> {
        not_available()
    }

    /// 祖先の一覧。`frame_limit`/`line_limit` が 0 なら無制限
    fn stack(
        &mut self,
        _event: &Event,
        _detailed: bool,
        _frame_limit: usize,
        _line_limit: usize,
        _out: &mut dyn Write,
    ) -> Result<()> {
        not_available()
    }

    fn nondet_stack(
        &mut self,
        _event: &Event,
        _detailed: bool,
        _frame_limit: usize,
        _line_limit: usize,
        _out: &mut dyn Write,
    ) -> Result<()> {
        not_available()
    }

    /// 値を保持変数に入れる。同名が既にあれば `false`
    fn hold(&mut self, _event: &Event, _var: &VarSpec, _name: &str) -> Result<bool> {
        not_available()
    }

    fn diff(
        &mut self,
        _event: &Event,
        _start: usize,
        _max: usize,
        _first: &VarSpec,
        _second: &VarSpec,
        _out: &mut dyn Write,
    ) -> Result<()> {
        not_available()
    }

    fn dump(&mut self, _event: &Event, _target: &BrowseTarget, _xml: bool, _file: &str) -> Result<()> {
        not_available()
    }

    fn var_details(&mut self, _event: &Event, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn term_size(&mut self, _event: &Event, _target: &BrowseTarget, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn debug_vars(&mut self, _event: &Event, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    /// 補完用の変数名
    fn var_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// プログラムの実行を進める側
pub trait Engine {
    fn retry(
        &mut self,
        _event: &Event,
        _level: usize,
        _io_policy: RetryIoPolicy,
        _assume_all_io_is_tabled: bool,
    ) -> Result<RetryOutcome> {
        not_available()
    }

    fn query(&mut self, _kind: QueryKind, _options: &str, _modules: &[String], _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    /// 深さごとのイベント数。集計していなければ `None`
    fn histogram(&self, _kind: HistogramKind) -> Option<Vec<u64>> {
        None
    }

    fn clear_histogram(&mut self) {}

    fn stack_regs(&self, _event: &Event, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn all_regs(&self, _event: &Event, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn stats(&self, _target: StatsTarget, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }
}

/// デバッグ可能なモジュールと手続き、型の表
pub trait ProcRegistry {
    fn modules(&self) -> Vec<String> {
        Vec::new()
    }

    fn all_procs(&self) -> Vec<ProcLayout> {
        Vec::new()
    }

    fn type_ctors(&self) -> Vec<TypeCtorDesc> {
        Vec::new()
    }

    fn type_classes(&self) -> Vec<TypeClassDesc> {
        Vec::new()
    }
}

/// テーブリングの実行時データ
pub trait Tabling {
    /// テーブリングされていない手続きなら `None`
    fn call_table(&self, _proc: &ProcLayout) -> Option<CallTableInfo> {
        None
    }

    fn trie(&self) -> Option<&dyn TrieAccess> {
        None
    }

    /// サブゴールを表示する。存在しなければ `false`
    fn print_subgoal(&self, _n: usize, _out: &mut dyn Write) -> Result<bool> {
        not_available()
    }

    fn print_consumer(&self, _n: usize, _out: &mut dyn Write) -> Result<bool> {
        not_available()
    }

    fn gen_stack(&self, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn cut_stack(&self, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }

    fn pneg_stack(&self, _out: &mut dyn Write) -> Result<()> {
        not_available()
    }
}

/// ソース表示ウィンドウ
pub trait SourceWindow {
    fn is_open(&self) -> bool {
        false
    }

    fn open(&mut self, _opts: &ViewOpts) -> Result<()> {
        not_available()
    }

    fn sync(&mut self, _event: &Event, _verbose: bool, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn close(&mut self, _verbose: bool, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

/// 宣言的デバッガ
pub trait DeclDebugger {
    /// 診断を始める。実行を再開するなら `policy` を設定して `StopInteracting` を返す
    fn start(
        &mut self,
        _opts: &DdOpts,
        _event: &Event,
        _policy: &mut StopPolicy,
        _out: &mut dyn Write,
    ) -> Result<Directive> {
        not_available()
    }
}

/// トレースカウントによる障害箇所の推定
pub trait TraceCounts {
    /// 表を文字列で返す
    fn dice(&mut self, _opts: &DiceOpts) -> Result<String> {
        not_available()
    }

    /// 宣言的デバッガの疑わしさ表を読み込む
    fn load_suspicion_table(&mut self, _pass: &str, _fail: &str) -> Result<()> {
        not_available()
    }
}

/// どの機能も持たないコラボレータ
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Inspector for Detached {}
impl Engine for Detached {}
impl ProcRegistry for Detached {}
impl Tabling for Detached {}
impl SourceWindow for Detached {}
impl DeclDebugger for Detached {}
impl TraceCounts for Detached {}

/// セッションが使うコラボレータ一式
pub struct Collaborators {
    pub engine: Box<dyn Engine>,
    pub inspector: Box<dyn Inspector>,
    pub registry: Box<dyn ProcRegistry>,
    pub tabling: Box<dyn Tabling>,
    pub window: Box<dyn SourceWindow>,
    pub decl: Box<dyn DeclDebugger>,
    pub trace_counts: Box<dyn TraceCounts>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            engine: Box::new(Detached),
            inspector: Box::new(Detached),
            registry: Box::new(Detached),
            tabling: Box::new(Detached),
            window: Box::new(Detached),
            decl: Box::new(Detached),
            trace_counts: Box::new(Detached),
        }
    }
}
