//! 対話ループ全体を通したセッションのテスト

use mdb_core::console::{ScriptedInput, SharedBuffer};
use mdb_core::runtime::{Engine, ProcRegistry, RetryIoPolicy, RetryOutcome};
use mdb_core::{
    enter_interactive, handle_command, Collaborators, Console, Determinism, Directive, Event,
    Features, Port, PrintLevel, ProcLayout, Session, StopCommand, StopPolicy,
};
use tempfile::TempDir;

struct Procs;

impl ProcRegistry for Procs {
    fn modules(&self) -> Vec<String> {
        vec!["m".to_string()]
    }

    fn all_procs(&self) -> Vec<ProcLayout> {
        vec![ProcLayout::pred("m", "p", 2, 0, Determinism::Det)]
    }
}

/// やり直しの前に祖先の終了まで進める必要があるエンジン
struct FinishFirst;

impl Engine for FinishFirst {
    fn retry(
        &mut self,
        _event: &Event,
        _level: usize,
        _io_policy: RetryIoPolicy,
        _assume_all_io_is_tabled: bool,
    ) -> mdb_core::Result<RetryOutcome> {
        Ok(RetryOutcome::FinishFirst)
    }
}

struct Fixture {
    session: Session,
    out: SharedBuffer,
    err: SharedBuffer,
}

fn fixture(input: &[&str], collab: Collaborators) -> Fixture {
    let out = SharedBuffer::new();
    let err = SharedBuffer::new();
    let console = Console::new(
        Box::new(ScriptedInput::new(input.iter().copied())),
        Box::new(out.clone()),
        Box::new(err.clone()),
    );
    let session = Session::new(console, collab, Features::default()).unwrap();
    Fixture { session, out, err }
}

fn with_procs() -> Collaborators {
    let mut collab = Collaborators::default();
    collab.registry = Box::new(Procs);
    collab
}

fn event(port: Port) -> Event {
    Event::new(10, 4, 3, port, ProcLayout::pred("m", "p", 2, 0, Determinism::Det)).at("m.m", 12)
}

#[test]
fn test_end_of_input_quits() {
    let mut f = fixture(&[], Collaborators::default());
    let policy = enter_interactive(&mut f.session, &event(Port::Call), &[]).unwrap();
    assert_eq!(policy.command, StopCommand::Terminate);
    assert_eq!(policy.print_level, PrintLevel::None);

    let out = f.out.take();
    assert!(out.contains("CALL pred m.p/2-0 (det)"));
    assert_eq!(f.err.take(), "");
}

#[test]
fn test_step_resumes_execution() {
    let mut f = fixture(&["step 3"], Collaborators::default());
    let policy = enter_interactive(&mut f.session, &event(Port::Call), &[]).unwrap();
    assert_eq!(policy.command, StopCommand::Goto(13));
    assert!(!policy.strict);
}

#[test]
fn test_next_at_final_port_keeps_interacting() {
    let mut f = fixture(&["next", "step"], Collaborators::default());
    let policy = enter_interactive(&mut f.session, &event(Port::Exit), &[]).unwrap();
    assert_eq!(f.err.take(), "This command is a no-op from this port.\n");
    assert_eq!(policy.command, StopCommand::Goto(11));
}

#[test]
fn test_semicolon_splits_commands() {
    let mut f = fixture(&["alias s step 2; s"], Collaborators::default());
    let policy = enter_interactive(&mut f.session, &event(Port::Call), &[]).unwrap();
    assert_eq!(f.session.aliases.lookup("s"), Some(&["step".to_string(), "2".to_string()][..]));
    assert_eq!(policy.command, StopCommand::Goto(12));
}

#[test]
fn test_empty_line_uses_empty_alias() {
    let mut f = fixture(&["alias EMPTY step", ""], Collaborators::default());
    let policy = enter_interactive(&mut f.session, &event(Port::Call), &[]).unwrap();
    assert_eq!(policy.command, StopCommand::Goto(11));
}

#[test]
fn test_unknown_command_is_reported() {
    let mut f = fixture(&[], Collaborators::default());
    let mut policy = StopPolicy::default();
    let directive = handle_command(&mut f.session, "frobnicate", &mut policy, &event(Port::Call)).unwrap();
    assert_eq!(directive, Directive::KeepInteracting);
    assert_eq!(
        f.err.take(),
        "Unknown command `frobnicate'. Give the command `help' for help.\n"
    );
    assert_eq!(policy, StopPolicy::default());
}

#[test]
fn test_feature_gated_command() {
    let mut f = fixture(&[], Collaborators::default());
    let mut policy = StopPolicy::default();
    handle_command(&mut f.session, "mm_stacks", &mut policy, &event(Port::Call)).unwrap();
    assert_eq!(
        f.err.take(),
        "mdb: the `mm_stacks' command is not available in this configuration.\n"
    );
}

#[test]
fn test_retry_after_finishing_requeues_itself() {
    let mut collab = Collaborators::default();
    collab.engine = Box::new(FinishFirst);
    let mut f = fixture(&["retry"], collab);
    let policy = enter_interactive(&mut f.session, &event(Port::Exit), &[]).unwrap();
    assert_eq!(policy.command, StopCommand::Finish(3));
    assert!(policy.strict);
    assert_eq!(policy.print_level, PrintLevel::None);
    assert_eq!(f.session.queue.front(), Some("retry -o"));
}

#[test]
fn test_save_then_source_restores_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.mdb");
    let path = path.to_str().unwrap();

    let mut f = fixture(&[], with_procs());
    let mut policy = StopPolicy::default();
    for line in ["break m.p", "alias s step", "scroll 40", "context before"] {
        handle_command(&mut f.session, line, &mut policy, &event(Port::Call)).unwrap();
    }
    f.out.take();
    handle_command(&mut f.session, &format!("save {}", path), &mut policy, &event(Port::Call)).unwrap();
    assert_eq!(f.err.take(), "");
    assert_eq!(f.out.take(), format!("Debugger state saved to {}.\n", path));

    let source = format!("source {}", path);
    let mut g = fixture(&[source.as_str()], with_procs());
    let policy = enter_interactive(&mut g.session, &event(Port::Call), &[]).unwrap();
    assert_eq!(policy.command, StopCommand::Terminate);
    assert_eq!(g.err.take(), "");
    assert_eq!(g.session.spies.len(), 1);
    assert_eq!(g.session.aliases.lookup("s"), Some(&["step".to_string()][..]));
    assert_eq!(g.session.settings.scroll_limit, 40);
}

#[test]
fn test_source_runs_before_terminal_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("script.mdb");
    std::fs::write(&path, "alias f finish\nf\n").unwrap();

    let source = format!("source {}", path.display());
    let mut f = fixture(&[source.as_str(), "step"], Collaborators::default());
    let policy = enter_interactive(&mut f.session, &event(Port::Call), &[]).unwrap();
    assert_eq!(policy.command, StopCommand::Finish(3));
    // 端末の行はまだ読まれていない
    assert_eq!(f.session.get_line("").unwrap().as_deref(), Some("step"));
}
