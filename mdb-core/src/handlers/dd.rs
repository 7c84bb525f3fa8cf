//! 宣言的デバッガのコマンド

use super::{choose, keep, usage};
use crate::directive::{Directive, StopPolicy};
use crate::event::{Event, ProcLayout};
use crate::options;
use crate::runtime::DdSearchMode;
use crate::session::Session;
use crate::trust::Trusted;
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;
use tracing::debug;

pub fn dd(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, mut opts)) = options::dd(words) else {
        return usage(session, words);
    };
    match &words[first..] {
        [] => {}
        [file] if opts.debug => opts.dump_file = Some(file.clone()),
        [_] => {}
        _ => return usage(session, words),
    }

    if session.settings.have_unhid_events {
        writeln!(session.err(), "mdb: dd doesn't work after `unhide_events on'.")?;
        return keep();
    }

    if opts.pass_trace_counts.is_none() {
        opts.pass_trace_counts = session.settings.pass_trace_counts.clone();
    }
    if opts.fail_trace_counts.is_none() {
        opts.fail_trace_counts = session.settings.fail_trace_counts.clone();
    }
    match (&opts.pass_trace_counts, &opts.fail_trace_counts) {
        (Some(pass), Some(fail)) => {
            if let Err(e) = session.collab.trace_counts.load_suspicion_table(pass, fail) {
                writeln!(session.err(), "mdb: {}", e)?;
                return keep();
            }
        }
        _ if opts.search_mode == Some(DdSearchMode::SuspicionDivideAndQuery) => {
            writeln!(
                session.err(),
                "mdb: you need to supply passing and failing trace count files\n\
                 before using the specified search mode."
            )?;
            return keep();
        }
        _ => {}
    }

    debug!("starting declarative debugging: {:?}", opts);
    // 再開しない場合に備えて、成功するまで呼び出し側の方針は書き換えない
    let mut next = *policy;
    let result = session
        .collab
        .decl
        .start(&opts, event, &mut next, session.console.out());
    match result {
        Ok(Directive::StopInteracting) => {
            *policy = next;
            Ok(Directive::StopInteracting)
        }
        Ok(Directive::KeepInteracting) => keep(),
        Err(e) => {
            session.problem(e)?;
            keep()
        }
    }
}

/// モジュール名か、ユーザ定義の述語・関数を信頼する
fn trust_name(session: &mut Session, words: &[String], name: &str) -> Result<()> {
    let procs = session.collab.registry.all_procs();
    if procs.iter().any(|p| p.module == name) || session.collab.registry.modules().iter().any(|m| m == name) {
        session.trust.add(Trusted::Module(name.to_string()));
        writeln!(session.out(), "Trusting module {}", name)?;
        return Ok(());
    }

    let Some(spec) = session.proc_specs.parse(name) else {
        usage(session, words)?;
        return Ok(());
    };
    // 同じ述語の別モードは1つにまとめる
    let mut matches: Vec<ProcLayout> = Vec::new();
    for proc in spec.select(&procs).into_iter().filter(|p| !p.uci) {
        if !matches.iter().any(|m| m.pred_id() == proc.pred_id()) {
            matches.push(proc.clone());
        }
    }

    let chosen = match matches.len() {
        0 => {
            writeln!(session.err(), "mdb: there is no such module, predicate or function.")?;
            Vec::new()
        }
        1 => matches,
        n => {
            writeln!(
                session.out(),
                "Ambiguous predicate or function specification. The matches are:"
            )?;
            let prompt = format!(
                "\nWhich predicate or function do you want to trust (0-{} or *)? ",
                n - 1
            );
            choose(session, &matches, ProcLayout::pred_id, &prompt, true, "no such match")?
        }
    };
    for proc in chosen {
        session.trust.add(Trusted::proc(&proc));
        writeln!(session.out(), "Trusting {}", proc.pred_id())?;
    }
    Ok(())
}

pub fn trust(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_, name] => trust_name(session, words, name)?,
        [_, a, b] if (a == "std" && b == "lib") || (a == "standard" && b == "library") => {
            session.trust.add(Trusted::StdLib);
            writeln!(session.out(), "Trusting the Mercury standard library")?;
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn untrust(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let [_, word] = words else {
        return usage(session, words);
    };
    let Some(index) = parse_natural(word) else {
        return usage(session, words);
    };
    if !session.trust.remove(index) {
        writeln!(session.err(), "mdb: no such trusted object")?;
    }
    keep()
}

pub fn trusted(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    session.trust.print(session.console.out())?;
    keep()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::StopCommand;
    use crate::event::Determinism;
    use crate::handlers::testing::Harness;
    use crate::options::DdOpts;
    use crate::runtime::{Collaborators, DeclDebugger, ProcRegistry};
    use crate::settings::Features;

    struct Procs;

    impl ProcRegistry for Procs {
        fn all_procs(&self) -> Vec<ProcLayout> {
            vec![
                ProcLayout::pred("m", "p", 2, 0, Determinism::Det),
                ProcLayout::pred("m", "p", 2, 1, Determinism::Semidet),
                ProcLayout::func("m", "p", 2, 0, Determinism::Det),
                ProcLayout::pred("list", "append", 3, 0, Determinism::Det),
            ]
        }
    }

    /// 診断を始めると、次の終了イベントまで進ませる
    struct Finisher;

    impl DeclDebugger for Finisher {
        fn start(
            &mut self,
            opts: &DdOpts,
            event: &Event,
            policy: &mut StopPolicy,
            out: &mut dyn Write,
        ) -> Result<Directive> {
            writeln!(out, "diagnosing with depth {:?}", opts.depth)?;
            policy.command = StopCommand::Finish(event.depth);
            Ok(Directive::StopInteracting)
        }
    }

    fn harness(input: &[&str]) -> Harness {
        let mut collab = Collaborators::default();
        collab.registry = Box::new(Procs);
        collab.decl = Box::new(Finisher);
        Harness::with(input.iter().copied(), collab, Features::default())
    }

    #[test]
    fn test_dd_starts_the_collaborator() {
        let mut h = harness(&[]);
        assert_eq!(h.run("dd -d 7"), Directive::StopInteracting);
        assert_eq!(h.out(), "diagnosing with depth Some(7)\n");
        assert_eq!(h.policy.command, StopCommand::Finish(3));
    }

    #[test]
    fn test_dd_refusals() {
        let mut h = harness(&[]);
        h.session.settings.have_unhid_events = true;
        assert_eq!(h.run("dd"), Directive::KeepInteracting);
        assert_eq!(h.err(), "mdb: dd doesn't work after `unhide_events on'.\n");

        let mut h = harness(&[]);
        h.run("dd -s sdq");
        assert!(h.err().starts_with("mdb: you need to supply passing and failing trace count files\n"));
        h.run("dd a b");
        assert!(h.err().contains("usage error"));
    }

    #[test]
    fn test_dd_without_decl_debugger() {
        let mut h = Harness::new();
        assert_eq!(h.run("dd"), Directive::KeepInteracting);
        assert_eq!(h.err(), "mdb: not available in this configuration.\n");
        assert_eq!(h.policy, StopPolicy::default());
    }

    #[test]
    fn test_trust_module_and_proc() {
        let mut h = harness(&[]);
        h.run("trust list");
        h.run("trust std lib");
        h.run("trust func*p");
        h.run("trust nothing");
        assert_eq!(
            h.out(),
            "Trusting module list\nTrusting the Mercury standard library\nTrusting func m.p/2\n"
        );
        assert_eq!(h.err(), "mdb: there is no such module, predicate or function.\n");
        h.run("trusted");
        assert_eq!(
            h.out(),
            "Trusted objects:\n0: module list\n1: the Mercury standard library\n2: func m.p/2\n"
        );
    }

    #[test]
    fn test_trust_ambiguous_asks() {
        let mut h = harness(&["1"]);
        h.run("trust p");
        assert_eq!(
            h.out(),
            "Ambiguous predicate or function specification. The matches are:\n\
             0: pred m.p/2\n1: func m.p/2\nTrusting func m.p/2\n"
        );
    }

    #[test]
    fn test_untrust() {
        let mut h = harness(&[]);
        h.run("trust list");
        h.out();
        h.run("untrust 3");
        assert_eq!(h.err(), "mdb: no such trusted object\n");
        h.run("untrust 0");
        assert!(h.session.trust.is_empty());
        h.run("untrust x");
        assert!(h.err().contains("usage error"));
    }
}
