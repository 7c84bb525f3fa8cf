//! 変数の表示、祖先フレーム、ソース表示のコマンド

use super::{keep, report, usage};
use crate::directive::{Directive, StopPolicy};
use crate::dispatch::print_event_report;
use crate::event::Event;
use crate::options;
use crate::runtime::BrowseTarget;
use crate::session::Session;
use crate::settings::BrowseCaller;
use crate::term::VarSpec;
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;

/// `-d` の後に続く祖先レベル
fn set_level(session: &mut Session, event: &Event, level: usize, detailed: bool) -> Result<Directive> {
    let result = session
        .collab
        .inspector
        .set_level(event, level, detailed, session.console.out());
    if let Err(e) = result {
        writeln!(session.err(), "{}.", e)?;
    }
    keep()
}

pub fn level(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, detailed)) = options::detailed(words) else {
        return usage(session, words);
    };
    match &words[first..] {
        [n] => match parse_natural(n) {
            Some(n) => set_level(session, event, n, detailed),
            None => usage(session, words),
        },
        _ => usage(session, words),
    }
}

/// `up`/`down` の移動量（省略時は 1）
fn relative_step(words: &[String]) -> Option<(bool, usize)> {
    let (first, detailed) = options::detailed(words).ok()?;
    match &words[first..] {
        [] => Some((detailed, 1)),
        [n] => parse_natural(n).map(|n| (detailed, n)),
        _ => None,
    }
}

pub fn up(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Some((detailed, n)) = relative_step(words) else {
        return usage(session, words);
    };
    let Some(level) = session.collab.inspector.current_level().checked_add(n) else {
        return usage(session, words);
    };
    set_level(session, event, level, detailed)
}

pub fn down(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Some((detailed, n)) = relative_step(words) else {
        return usage(session, words);
    };
    match session.collab.inspector.current_level().checked_sub(n) {
        Some(level) => set_level(session, event, level, detailed),
        None => {
            writeln!(session.err(), "level must not be negative.")?;
            keep()
        }
    }
}

pub fn vars(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.inspector.list_vars(event, session.console.out());
    report(session, result)
}

pub fn held_vars(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let result = session.collab.inspector.list_held_vars(session.console.out());
    report(session, result)
}

/// `print`/`browse` の位置引数を対象に変える
fn browse_target(args: &[String], allow_all: bool) -> Option<BrowseTarget> {
    match args {
        [] => Some(BrowseTarget::Goal),
        [word] => Some(match word.as_str() {
            "*" if allow_all => BrowseTarget::AllVars,
            "goal" => BrowseTarget::Goal,
            "exception" => BrowseTarget::Exception,
            "proc_body" => BrowseTarget::ProcBody,
            _ => BrowseTarget::Var(word.clone()),
        }),
        [action, n] if action == "action" => parse_natural(n).map(BrowseTarget::Action),
        _ => None,
    }
}

pub fn print(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::format(words, false) else {
        return usage(session, words);
    };
    let Some(target) = browse_target(&words[first..], true) else {
        return usage(session, words);
    };

    let caller = if target == BrowseTarget::AllVars {
        BrowseCaller::PrintAll
    } else {
        BrowseCaller::Print
    };
    let browser = &session.settings.browser;
    let format = opts.format.unwrap_or_else(|| browser.format(caller));
    let params = browser.params(caller, format);
    let result = session
        .collab
        .inspector
        .print(event, &target, format, params, session.console.out());
    report(session, result)
}

pub fn browse(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::format(words, true) else {
        return usage(session, words);
    };
    let Some(target) = browse_target(&words[first..], false) else {
        return usage(session, words);
    };

    let format = opts
        .format
        .unwrap_or_else(|| session.settings.browser.format(BrowseCaller::Browse));
    let result = session
        .collab
        .inspector
        .browse(event, &target, format, opts.xml, session.console.out());
    report(session, result)
}

pub fn stack(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::stack(words) else {
        return usage(session, words);
    };
    let line_limit = match &words[first..] {
        [] => session.settings.stack_default_limit,
        [n] => match parse_natural(n) {
            Some(n) => n,
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    };

    let result = session.collab.inspector.stack(
        event,
        opts.detailed,
        opts.frame_limit,
        line_limit,
        session.console.out(),
    );
    if let Err(e) = result {
        writeln!(session.err(), "{}.", e)?;
    }
    keep()
}

pub fn current(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    print_event_report(session, event)?;
    keep()
}

pub fn view(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::view(words) else {
        return usage(session, words);
    };
    if first != words.len() {
        return usage(session, words);
    }

    let window = &mut session.collab.window;
    if opts.close {
        let result = window.close(opts.verbose, session.console.out());
        return report(session, result);
    }

    if window.is_open() && !opts.force {
        session.problem("error: server already open (use '-f' to force)")?;
    } else if let Err(e) = window.open(&opts) {
        session.problem(e)?;
    }
    let result = session
        .collab
        .window
        .sync(event, opts.verbose, session.console.out());
    report(session, result)
}

pub fn hold(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let (var, name) = match words {
        [_, var] => (var, var),
        [_, var, name] => (var, name),
        _ => return usage(session, words),
    };
    if name.contains(['^', '/']) {
        return usage(session, words);
    }
    let name = name.strip_prefix('$').unwrap_or(name);

    let spec = match VarSpec::parse(var) {
        Ok(spec) => spec,
        Err(e) => {
            session.problem(e)?;
            return keep();
        }
    };
    match session.collab.inspector.hold(event, &spec, name) {
        Ok(true) => {}
        Ok(false) => writeln!(session.err(), "mdb: there is already a held variable ${}", name)?,
        Err(e) => session.problem(e)?,
    }
    keep()
}

pub fn diff(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::diff(words) else {
        return usage(session, words);
    };
    let [first_var, second_var] = &words[first..] else {
        return usage(session, words);
    };

    let mut specs = Vec::with_capacity(2);
    for (arg, text) in [("arg1", first_var), ("arg2", second_var)] {
        match VarSpec::parse(text) {
            Ok(spec) => specs.push(spec),
            Err(e) => {
                session.problem(format!("{}: {}", arg, e))?;
                return keep();
            }
        }
    }
    let result = session.collab.inspector.diff(
        event,
        opts.start,
        opts.max,
        &specs[0],
        &specs[1],
        session.console.out(),
    );
    report(session, result)
}

pub fn dump(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, xml)) = options::dump(words) else {
        return usage(session, words);
    };
    let [what, file] = &words[first..] else {
        return usage(session, words);
    };

    let target = match what.as_str() {
        "goal" => BrowseTarget::Goal,
        "exception" => BrowseTarget::Exception,
        "proc_body" => BrowseTarget::ProcBody,
        var => match VarSpec::parse(var) {
            Ok(_) => BrowseTarget::Var(var.to_string()),
            Err(e) => {
                session.problem(e)?;
                return keep();
            }
        },
    };
    let result = session.collab.inspector.dump(event, &target, xml, file);
    report(session, result)
}

pub fn list(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let context = match words {
        [_] => session.settings.list_context_lines,
        [_, n] => match parse_natural(n) {
            Some(n) => n,
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    };
    if event.file.is_empty() {
        session.problem("there is no source context for this event")?;
        return keep();
    }

    let line = event.line as usize;
    let (mut out, mut err) = (Vec::new(), Vec::new());
    session.listing.list_lines(
        &mut out,
        &mut err,
        &event.file,
        line.saturating_sub(context),
        line + context,
        line,
    )?;
    session.out().write_all(&out)?;
    if !err.is_empty() {
        session.err().write_all(&err)?;
    }
    keep()
}

pub fn push_list_dir(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() < 2 {
        return usage(session, words);
    }
    session.listing.push(&words[1..]);
    keep()
}

pub fn pop_list_dir(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    session.listing.pop();
    keep()
}
