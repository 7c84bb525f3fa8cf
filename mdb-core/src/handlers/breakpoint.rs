//! ブレークポイントのコマンド

use super::{choose, keep, usage};
use crate::breakpoint::{
    CondTest, PrintItem, SpyCondition, SpyId, SpyPoint, SpyTable, SpyTarget, SpyWhen,
};
use crate::directive::{Directive, StopPolicy};
use crate::errors::{ERR_NO_BREAKPOINTS, ERR_NO_MOST_RECENT, ERR_NO_SUCH_PROCEDURE};
use crate::event::{Event, ProcLayout};
use crate::options::{self, BreakOpts, MultiMatch};
use crate::session::Session;
use crate::term::{Term, VarSpec};
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;

/// `FILE:LINE` 形式のソース位置
fn parse_source_location(word: &str) -> Option<(&str, u32)> {
    let (file, line) = word.rsplit_once(':')?;
    if file.is_empty() {
        return None;
    }
    let line = parse_natural(line)?;
    Some((file, u32::try_from(line).ok()?))
}

/// オプションの無視回数と表示リストを付けてブレークポイントを追加し、表示する
fn add_point(session: &mut Session, opts: &BreakOpts, when: SpyWhen, target: SpyTarget) -> Result<()> {
    let mut point = SpyPoint::new(when, opts.action, target);
    point.ignore_when = opts.ignore_when;
    point.ignore_count = opts.ignore_count;
    point.print_list = opts.print_list.clone();
    let id = session.spies.add(point);
    session.spies.print_point(session.console.out(), id)?;
    Ok(())
}

pub fn break_(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    if let [_, info] = words {
        if info == "info" {
            if session.spies.is_empty() {
                writeln!(session.out(), "{}", ERR_NO_BREAKPOINTS)?;
            } else {
                session.spies.print_all(session.console.out())?;
            }
            return keep();
        }
    }

    let Ok((first, opts)) = options::break_opts(words, session.settings.scope) else {
        return usage(session, words);
    };
    let [what] = &words[first..] else {
        return usage(session, words);
    };

    if what == "here" {
        let target = SpyTarget::Label {
            proc: event.proc.clone(),
            port: event.port,
            goal_path: event.goal_path.clone(),
        };
        let mut probe = SpyPoint::new(SpyWhen::Specific, opts.action, target.clone());
        probe.ignore_when = opts.ignore_when;
        probe.ignore_count = opts.ignore_count;
        if !probe.can_become_enabled() {
            writeln!(session.out(), "That breakpoint would never become enabled.")?;
            return keep();
        }
        add_point(session, &opts, SpyWhen::Specific, target)?;
        return keep();
    }

    if let Some(line) = parse_natural(what) {
        if event.file.is_empty() {
            session.problem("cannot find the current file name")?;
            return keep();
        }
        let target = SpyTarget::Line {
            file: event.file.clone(),
            line: u32::try_from(line)?,
        };
        add_point(session, &opts, SpyWhen::LineNo, target)?;
        return keep();
    }

    if let Some((file, line)) = parse_source_location(what) {
        let target = SpyTarget::Line {
            file: file.to_string(),
            line,
        };
        add_point(session, &opts, SpyWhen::LineNo, target)?;
        return keep();
    }

    let Some(spec) = session.proc_specs.parse(what) else {
        return usage(session, words);
    };
    let procs = session.collab.registry.all_procs();
    let matches: Vec<ProcLayout> = spec.select(&procs).into_iter().cloned().collect();

    let chosen = match matches.len() {
        0 => {
            writeln!(session.err(), "{}", ERR_NO_SUCH_PROCEDURE)?;
            Vec::new()
        }
        1 => matches,
        _ if opts.multi_match == MultiMatch::All => matches,
        n => {
            writeln!(session.err(), "Ambiguous procedure specification. The matches are:")?;
            if opts.multi_match == MultiMatch::One {
                for (i, proc) in matches.iter().enumerate() {
                    writeln!(session.out(), "{}: {}", i, proc)?;
                }
                return keep();
            }
            let prompt = format!("\nWhich do you want to put a breakpoint on (0-{} or *)? ", n - 1);
            choose(session, &matches, ProcLayout::to_string, &prompt, true, "no such match")?
        }
    };

    let when = SpyWhen::from(opts.scope);
    for proc in chosen {
        add_point(session, &opts, when, SpyTarget::Proc(proc))?;
    }
    keep()
}

pub fn condition(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::condition(words) else {
        return usage(session, words);
    };
    let [what, test, term_words @ ..] = &words[first..] else {
        return usage(session, words);
    };
    if term_words.is_empty() {
        return usage(session, words);
    }

    let Some(id) = opts.break_num.or_else(|| session.spies.most_recent()) else {
        writeln!(session.err(), "There is no breakpoint.")?;
        return keep();
    };
    if session.spies.has_been_deleted(id) {
        writeln!(session.err(), "Breakpoint {} has been deleted.", id)?;
        return keep();
    }
    if session.spies.get(id).is_none() {
        writeln!(session.err(), "There is no breakpoint {}.", id)?;
        return keep();
    }

    let var = match VarSpec::parse(what) {
        Ok(var) => var,
        Err(e) => {
            writeln!(session.err(), "mdb: {}: {}.", what, e)?;
            return keep();
        }
    };
    let Some(test) = CondTest::parse(test) else {
        writeln!(session.err(), "invalid condition: should be = or !=")?;
        return keep();
    };
    let term = match Term::parse(&term_words.concat()) {
        Ok(term) => term,
        Err(e) => {
            writeln!(session.out(), "{}", e)?;
            return keep();
        }
    };

    if let Some(point) = session.spies.get_mut(id) {
        point.condition = Some(SpyCondition {
            var,
            test,
            term,
            require_var: opts.require_var,
            require_path: opts.require_path,
        });
    }
    session.spies.print_point(session.console.out(), id)?;
    keep()
}

/// `N`、`*`、省略（直近のもの）でブレークポイントを選ぶ
///
/// 選べなかったときはメッセージを表示して空を返します。
fn select_points(session: &mut Session, args: &[String], no_recent: &str) -> Result<Option<Vec<SpyId>>> {
    let ids = match args {
        [] => match session.spies.most_recent() {
            Some(id) => vec![id],
            None => {
                writeln!(session.err(), "{}", no_recent)?;
                Vec::new()
            }
        },
        [star] if star == "*" => {
            let ids = session.spies.ids();
            if ids.is_empty() {
                writeln!(session.err(), "{}", ERR_NO_BREAKPOINTS)?;
            }
            ids
        }
        [n] => match parse_natural(n) {
            Some(id) if session.spies.get(id).is_some() => vec![id],
            Some(id) => {
                writeln!(session.err(), "mdb: break point #{} does not exist.", id)?;
                Vec::new()
            }
            None => return Ok(None),
        },
        _ => return Ok(None),
    };
    Ok(Some(ids))
}

/// 選んだブレークポイントそれぞれに `apply` を施して表示する
fn update_points(
    session: &mut Session,
    words: &[String],
    args: &[String],
    no_recent: &str,
    apply: impl Fn(&mut SpyPoint),
) -> Result<Directive> {
    let Some(ids) = select_points(session, args, no_recent)? else {
        return usage(session, words);
    };
    for id in ids {
        if let Some(point) = session.spies.get_mut(id) {
            apply(point);
        }
        session.spies.print_point(session.console.out(), id)?;
    }
    keep()
}

pub fn ignore(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, (when, count))) = options::ignore(words) else {
        return usage(session, words);
    };
    update_points(session, words, &words[first..], ERR_NO_MOST_RECENT, |point| {
        point.ignore_when = when;
        point.ignore_count = count;
    })
}

pub fn break_print(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::break_print(words) else {
        return usage(session, words);
    };
    let [num, items @ ..] = &words[first..] else {
        return usage(session, words);
    };
    let (Some(id), false) = (parse_natural(num), items.is_empty()) else {
        return usage(session, words);
    };

    let Some(point) = session.spies.get_mut(id) else {
        writeln!(session.err(), "mdb: break point #{} does not exist.", id)?;
        return keep();
    };
    if items.len() == 1 && items[0] == "none" {
        point.print_list.clear();
    } else {
        let new_items = items
            .iter()
            .map(|word| PrintItem::parse(word, opts.format, opts.warn));
        if opts.at_start {
            point.print_list.splice(0..0, new_items);
        } else {
            point.print_list.extend(new_items);
        }
    }
    session.spies.print_point(session.console.out(), id)?;
    keep()
}

pub fn enable(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    update_points(session, words, &words[1..], ERR_NO_MOST_RECENT, |point| {
        point.enabled = true
    })
}

pub fn disable(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    update_points(session, words, &words[1..], "There is no most recent break point.", |point| {
        point.enabled = false
    })
}

pub fn delete(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Some(ids) = select_points(session, &words[1..], ERR_NO_MOST_RECENT)? else {
        return usage(session, words);
    };
    for id in ids {
        print_and_delete(&mut session.spies, session.console.out(), id)?;
    }
    keep()
}

fn print_and_delete(spies: &mut SpyTable, out: &mut dyn Write, id: SpyId) -> Result<()> {
    spies.print_point(out, id)?;
    spies.delete(id);
    Ok(())
}

pub fn register(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, verbose)) = options::register(words) else {
        return usage(session, words);
    };
    if first != words.len() {
        return usage(session, words);
    }
    if verbose {
        let modules = session.collab.registry.modules().len();
        let procs = session.collab.registry.all_procs().len();
        writeln!(session.out(), "Registering debuggable procedures... done.")?;
        writeln!(
            session.out(),
            "There are {} debuggable modules, with a total of {} procedures.",
            modules, procs
        )?;
    }
    keep()
}

pub fn modules(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    if words.len() != 1 {
        return usage(session, words);
    }
    let modules = session.collab.registry.modules();
    if modules.is_empty() {
        writeln!(session.out(), "There are no debuggable modules.")?;
    }
    for module in modules {
        writeln!(session.out(), "{}", module)?;
    }
    keep()
}

pub fn procedures(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let [_, module] = words else {
        return usage(session, words);
    };
    let procs: Vec<ProcLayout> = session
        .collab
        .registry
        .all_procs()
        .into_iter()
        .filter(|p| &p.module == module)
        .collect();
    if procs.is_empty() {
        writeln!(session.out(), "There is no debugging info about module `{}'", module)?;
        return keep();
    }
    writeln!(session.out(), "List of procedures in module `{}'\n", module)?;
    for proc in procs {
        writeln!(session.out(), "{}", proc)?;
    }
    keep()
}
