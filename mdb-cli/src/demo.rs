//! デモ用の模擬プログラム
//!
//! `main` がメモ化された `fib/2` を k = 0, 1, 2, ... の順に呼び、
//! 答えを `show/1` で出力するトレースを作ります。コラボレータは
//! すべて同じ `Program` を共有し、`retry` はカーソルを巻き戻します。

use anyhow::{anyhow, bail, Result};
use mdb_core::breakpoint::SpyAction;
use mdb_core::runtime::{BrowseTarget, Engine, Inspector, ProcRegistry, RetryIoPolicy, RetryOutcome, Tabling};
use mdb_core::settings::{FormatParams, PrintFormat};
use mdb_core::{
    enter_interactive, report_stop_event, CallTableInfo, Collaborators, Determinism, EvalMethod,
    Event, MemoTrie, Port, PrintLevel, ProcLayout, Session, StepKind, StopCommand, StopPolicy,
    TrieAccess,
};
use mdb_table::ArgValue;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use tracing::{debug, info};

const MODULE: &str = "demo";
const FILE: &str = "demo.m";

const MAIN: usize = 0;
const FIB: usize = 1;
const SHOW: usize = 2;

/// トレースの1ステップ
#[derive(Debug, Clone)]
struct Step {
    proc: usize,
    port: Port,
    depth: u64,
    call_seqno: u64,
    /// 束縛済みの引数（名前と値）
    vars: Vec<(&'static str, i64)>,
    line: u32,
    parent_line: u32,
}

/// 模擬プログラムの状態
pub struct Program {
    procs: Vec<ProcLayout>,
    steps: Vec<Step>,
    cursor: usize,
    next_number: u64,
    trie: MemoTrie,
}

struct Tracer {
    steps: Vec<Step>,
    seqno: u64,
    memo: HashMap<i64, i64>,
    trie: MemoTrie,
}

impl Tracer {
    fn call(&mut self, proc: usize, depth: u64, vars: Vec<(&'static str, i64)>, line: u32, parent_line: u32) -> u64 {
        self.seqno += 1;
        self.steps.push(Step {
            proc,
            port: Port::Call,
            depth,
            call_seqno: self.seqno,
            vars,
            line,
            parent_line,
        });
        self.seqno
    }

    fn exit(&mut self, proc: usize, depth: u64, seqno: u64, vars: Vec<(&'static str, i64)>, line: u32, parent_line: u32) {
        self.steps.push(Step {
            proc,
            port: Port::Exit,
            depth,
            call_seqno: seqno,
            vars,
            line,
            parent_line,
        });
    }

    fn fib(&mut self, n: i64, depth: u64, parent_line: u32) -> i64 {
        let seqno = self.call(FIB, depth, vec![("N", n)], 10, parent_line);
        let answer = match self.memo.get(&n) {
            Some(&answer) => answer,
            None => {
                let answer = if n < 2 {
                    n
                } else {
                    self.fib(n - 1, depth + 1, 14) + self.fib(n - 2, depth + 1, 15)
                };
                self.memo.insert(n, answer);
                self.trie.insert(&[ArgValue::Int(n)], format!("succeeded <{}>", answer));
                answer
            }
        };
        self.exit(FIB, depth, seqno, vec![("N", n), ("F", answer)], 16, parent_line);
        answer
    }
}

impl Program {
    /// ステップ数が `size` に達するまで `fib` を呼ぶプログラムを作る
    pub fn new(size: usize) -> Self {
        let procs = vec![
            ProcLayout::pred(MODULE, "main", 2, 0, Determinism::Det),
            ProcLayout::pred(MODULE, "fib", 2, 0, Determinism::Det),
            ProcLayout::pred(MODULE, "show", 3, 0, Determinism::Det),
        ];
        let mut tracer = Tracer {
            steps: Vec::new(),
            seqno: 0,
            memo: HashMap::new(),
            trie: MemoTrie::new(),
        };

        let main = tracer.call(MAIN, 1, Vec::new(), 3, 0);
        // 1回の反復は高々8ステップ（fib が3回の CALL/EXIT、show が1回）
        let mut k = 0;
        while k == 0 || tracer.steps.len() + 9 <= size {
            let answer = tracer.fib(k, 2, 5);
            let show = tracer.call(SHOW, 2, vec![("F", answer)], 20, 6);
            tracer.exit(SHOW, 2, show, vec![("F", answer)], 21, 6);
            k += 1;
        }
        tracer.exit(MAIN, 1, main, Vec::new(), 8, 0);
        debug!("demo program has {} steps", tracer.steps.len());

        Self {
            procs,
            steps: tracer.steps,
            cursor: 0,
            next_number: 1,
            trie: tracer.trie,
        }
    }

    /// 次のイベントを作り、カーソルを進める
    fn next_event(&mut self) -> Option<Event> {
        let step = self.steps.get(self.cursor)?;
        let mut event = Event::new(
            self.next_number,
            step.call_seqno,
            step.depth,
            step.port,
            self.procs[step.proc].clone(),
        )
        .at(FILE, step.line);
        if step.parent_line > 0 {
            event = event.called_from(FILE, step.parent_line);
        }
        self.cursor += 1;
        self.next_number += 1;
        Some(event)
    }

    /// 直前に作ったイベントのステップ
    fn current(&self) -> Option<&Step> {
        self.steps.get(self.cursor.checked_sub(1)?)
    }

    /// 現在の呼び出しとその祖先
    fn ancestors(&self) -> Vec<&Step> {
        let Some(current) = self.current() else {
            return Vec::new();
        };
        let mut frames = vec![current];
        let mut depth = current.depth;
        for step in self.steps[..self.cursor - 1].iter().rev() {
            if step.port == Port::Call && step.depth < depth {
                frames.push(step);
                depth = step.depth;
            }
        }
        frames
    }

    /// `level` 番目の祖先の CALL までカーソルを戻す
    fn rewind(&mut self, level: usize) -> Result<()> {
        let Some(seqno) = self.ancestors().get(level).map(|step| step.call_seqno) else {
            bail!("not that many ancestors");
        };
        let Some(pos) = self
            .steps
            .iter()
            .position(|step| step.call_seqno == seqno && step.port == Port::Call)
        else {
            bail!("cannot find the call to retry");
        };
        info!("rewinding to step {}", pos);
        self.cursor = pos;
        Ok(())
    }
}

type Shared = Rc<RefCell<Program>>;

struct DemoEngine(Shared);

impl Engine for DemoEngine {
    fn retry(&mut self, _event: &Event, level: usize, _io_policy: RetryIoPolicy, _assume_all_io_is_tabled: bool) -> Result<RetryOutcome> {
        self.0.borrow_mut().rewind(level)?;
        Ok(RetryOutcome::Direct)
    }
}

struct DemoInspector {
    program: Shared,
    level: usize,
}

impl DemoInspector {
    fn frame_vars(&self) -> Vec<(&'static str, i64)> {
        let program = self.program.borrow();
        program
            .ancestors()
            .get(self.level)
            .map(|step| step.vars.clone())
            .unwrap_or_default()
    }

    fn goal(&self) -> Option<String> {
        let program = self.program.borrow();
        let frames = program.ancestors();
        let step = frames.get(self.level)?;
        let proc = &program.procs[step.proc];
        let args: Vec<String> = step.vars.iter().map(|(_, value)| value.to_string()).collect();
        Some(format!("{}({})", proc.name, args.join(", ")))
    }
}

impl Inspector for DemoInspector {
    fn current_level(&self) -> usize {
        self.level
    }

    fn set_level(&mut self, _event: &Event, level: usize, _detailed: bool, out: &mut dyn Write) -> Result<()> {
        let depth = self.program.borrow().ancestors().len();
        if level >= depth {
            bail!("not that many ancestors");
        }
        self.level = level;
        writeln!(out, "Ancestor level set to {}:", level)?;
        Ok(())
    }

    fn list_vars(&mut self, _event: &Event, out: &mut dyn Write) -> Result<()> {
        let vars = self.frame_vars();
        if vars.is_empty() {
            writeln!(out, "mdb: there are no live, named variables.")?;
        }
        for (i, (name, value)) in vars.iter().enumerate() {
            writeln!(out, "{:>8} {:<10} {}", i + 1, name, value)?;
        }
        Ok(())
    }

    fn print(
        &mut self,
        _event: &Event,
        target: &BrowseTarget,
        _format: PrintFormat,
        _params: FormatParams,
        out: &mut dyn Write,
    ) -> Result<()> {
        let vars = self.frame_vars();
        match target {
            BrowseTarget::Goal => {
                let goal = self.goal().ok_or_else(|| anyhow!("there is no goal"))?;
                writeln!(out, "{}", goal)?;
            }
            BrowseTarget::AllVars => {
                if vars.is_empty() {
                    bail!("there are no live, named variables");
                }
                for (name, value) in &vars {
                    writeln!(out, "{:>8} {:<10} {}", "", name, value)?;
                }
            }
            BrowseTarget::Var(wanted) => {
                let Some((name, value)) = vars.iter().find(|(name, _)| *name == wanted.as_str()) else {
                    bail!("there is no variable named {}", wanted);
                };
                writeln!(out, "{:>8} {:<10} {}", "", name, value)?;
            }
            _ => bail!("not available in this configuration"),
        }
        Ok(())
    }

    fn stack(
        &mut self,
        _event: &Event,
        _detailed: bool,
        frame_limit: usize,
        _line_limit: usize,
        out: &mut dyn Write,
    ) -> Result<()> {
        let program = self.program.borrow();
        let frames = program.ancestors();
        let limit = if frame_limit == 0 { frames.len() } else { frame_limit };
        for (level, step) in frames.iter().take(limit).enumerate() {
            writeln!(out, "{:>4} {} ({}:{})", level, program.procs[step.proc], FILE, step.line)?;
        }
        Ok(())
    }

    fn var_names(&self) -> Vec<String> {
        self.frame_vars().iter().map(|(name, _)| name.to_string()).collect()
    }
}

struct DemoRegistry(Vec<ProcLayout>);

impl ProcRegistry for DemoRegistry {
    fn modules(&self) -> Vec<String> {
        vec![MODULE.to_string()]
    }

    fn all_procs(&self) -> Vec<ProcLayout> {
        self.0.clone()
    }
}

struct DemoTabling {
    trie: MemoTrie,
}

impl Tabling for DemoTabling {
    fn call_table(&self, proc: &ProcLayout) -> Option<CallTableInfo> {
        let method = match proc.name.as_str() {
            "fib" => EvalMethod::MemoStrict,
            "show" => EvalMethod::TableIo,
            _ => return None,
        };
        Some(CallTableInfo {
            method,
            input_steps: vec![StepKind::Int],
            root: self.trie.root(),
        })
    }

    fn trie(&self) -> Option<&dyn TrieAccess> {
        Some(&self.trie)
    }
}

/// プログラムを共有するコラボレータ一式を作る
pub fn collaborators(program: &Shared) -> Collaborators {
    let (procs, trie) = {
        let mut program = program.borrow_mut();
        (program.procs.clone(), std::mem::take(&mut program.trie))
    };
    Collaborators {
        engine: Box::new(DemoEngine(Rc::clone(program))),
        inspector: Box::new(DemoInspector {
            program: Rc::clone(program),
            level: 0,
        }),
        registry: Box::new(DemoRegistry(procs)),
        tabling: Box::new(DemoTabling { trie }),
        ..Collaborators::default()
    }
}

/// 実行の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// プログラムが最後まで実行された
    Finished(u64),
    /// `quit` で終了した
    Quit,
}

/// プログラムを実行し、止まるべきイベントでセッションに制御を渡す
///
/// `batch` では対話せず、止まるべきイベントを報告するだけです。
pub fn run(session: &mut Session, program: &Shared, batch: bool) -> Result<Outcome> {
    let mut policy = StopPolicy::new(session.settings.print_level);
    let mut events = 0;
    loop {
        let Some(event) = program.borrow_mut().next_event() else {
            break;
        };
        events += 1;

        let (spy_stop, hits) = match session.spies.check_event(&event) {
            Some((action, hits)) if !policy.strict => (action == SpyAction::Stop, hits),
            _ => (false, Vec::new()),
        };
        let stop = spy_stop || policy.should_stop_at(event.number, event.depth, event.port);
        let print = match policy.print_level {
            PrintLevel::All => true,
            PrintLevel::Some => !hits.is_empty(),
            PrintLevel::None => false,
        };

        if stop && !batch {
            policy = enter_interactive(session, &event, &hits)?;
        } else if stop || print {
            report_stop_event(session, &mut policy, &event, &hits)?;
        }

        if policy.command == StopCommand::Terminate {
            return Ok(Outcome::Quit);
        }
    }
    Ok(Outcome::Finished(events))
}
