//! 前進コマンド

use super::{keep, no_op, usage};
use crate::directive::{Directive, PrintLevel, StopCommand, StopPolicy};
use crate::errors::ERR_PAST_EVENT;
use crate::event::{Event, Port};
use crate::options::{self, MovementOpts};
use crate::session::Session;
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;

/// 移動オプションを読む。失敗したら使い方エラーを表示して `None`
fn movement_opts<'w>(
    session: &mut Session,
    words: &'w [String],
) -> Result<Option<(&'w [String], MovementOpts)>> {
    match options::movement(words, session.features.integrity_checking) {
        Ok((first, opts)) => Ok(Some((&words[first..], opts))),
        Err(_) => {
            usage(session, words)?;
            Ok(None)
        }
    }
}

fn stop_with(
    session: &Session,
    opts: &MovementOpts,
    strict: bool,
    command: StopCommand,
    policy: &mut StopPolicy,
) -> Result<Directive> {
    *policy = StopPolicy {
        strict: opts.strict.unwrap_or(strict),
        print_level: opts.print_level.unwrap_or(session.settings.print_level),
        command,
        check_integrity: opts.integrity,
    };
    Ok(Directive::StopInteracting)
}

/// 省略可能な回数引数
fn optional_count(args: &[String], default: usize) -> Option<usize> {
    match args {
        [] => Some(default),
        [n] => parse_natural(n),
        _ => None,
    }
}

pub fn step(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Some((args, opts)) = movement_opts(session, words)? else {
        return keep();
    };
    let Some(target) = optional_count(args, 1).and_then(|n| event.number.checked_add(n as u64)) else {
        return usage(session, words);
    };
    stop_with(session, &opts, false, StopCommand::Goto(target), policy)
}

pub fn goto(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Some((args, opts)) = movement_opts(session, words)? else {
        return keep();
    };
    let [target] = args else {
        return usage(session, words);
    };
    let Some(n) = parse_natural(target) else {
        return usage(session, words);
    };
    if event.number < n as u64 {
        stop_with(session, &opts, true, StopCommand::Goto(n as u64), policy)
    } else {
        writeln!(session.err(), "{}", ERR_PAST_EVENT)?;
        keep()
    }
}

/// `next`/`finish` の停止深さ。祖先の数を超える指定は使い方エラー
fn stop_depth(args: &[String], event: &Event) -> Option<u64> {
    let n = optional_count(args, 0)? as u64;
    event.depth.checked_sub(n)
}

fn next_or_finish(
    session: &mut Session,
    words: &[String],
    policy: &mut StopPolicy,
    event: &Event,
    command: fn(u64) -> StopCommand,
) -> Result<Directive> {
    let Some((args, opts)) = movement_opts(session, words)? else {
        return keep();
    };
    let Some(depth) = stop_depth(args, event) else {
        return usage(session, words);
    };
    if depth == event.depth && event.port.is_final() {
        return no_op(session);
    }
    stop_with(session, &opts, true, command(depth), policy)
}

pub fn next(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    next_or_finish(session, words, policy, event, StopCommand::Next)
}

pub fn finish(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    next_or_finish(session, words, policy, event, StopCommand::Finish)
}

pub fn fail(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Some((args, opts)) = movement_opts(session, words)? else {
        return keep();
    };
    let Some(depth) = stop_depth(args, event) else {
        return usage(session, words);
    };

    if event.proc.on_det_stack {
        writeln!(
            session.err(),
            "mdb: cannot continue until failure: selected procedure has determinism {}.",
            event.proc.determinism
        )?;
        return keep();
    }

    if depth == event.depth && event.port == Port::Fail {
        no_op(session)
    } else if depth == event.depth && event.port == Port::Exception {
        writeln!(
            session.err(),
            "mdb: cannot continue until failure: the call has raised an exception."
        )?;
        keep()
    } else {
        stop_with(session, &opts, true, StopCommand::Fail(depth), policy)
    }
}

/// 引数を取らず、現在のポートで移動できるかどうかだけが変わるコマンド
fn portwise(
    session: &mut Session,
    words: &[String],
    policy: &mut StopPolicy,
    can_move: bool,
    command: StopCommand,
) -> Result<Directive> {
    let Some((args, opts)) = movement_opts(session, words)? else {
        return keep();
    };
    if !args.is_empty() {
        return usage(session, words);
    }
    if !can_move {
        return no_op(session);
    }
    stop_with(session, &opts, true, command, policy)
}

pub fn exception(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let can_move = event.port != Port::Exception;
    portwise(session, words, policy, can_move, StopCommand::Exception)
}

pub fn return_(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let can_move = event.port == Port::Exit;
    portwise(session, words, policy, can_move, StopCommand::Return)
}

pub fn forward(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let can_move = matches!(event.port, Port::Fail | Port::Redo | Port::Exception);
    portwise(session, words, policy, can_move, StopCommand::ResumeForward)
}

fn depth_limit(
    session: &mut Session,
    words: &[String],
    policy: &mut StopPolicy,
    command: fn(u64) -> StopCommand,
) -> Result<Directive> {
    let Some((args, opts)) = movement_opts(session, words)? else {
        return keep();
    };
    match args {
        [n] => match parse_natural(n) {
            Some(n) => stop_with(session, &opts, true, command(n as u64), policy),
            None => usage(session, words),
        },
        _ => usage(session, words),
    }
}

pub fn mindepth(session: &mut Session, words: &[String], policy: &mut StopPolicy, _event: &Event) -> Result<Directive> {
    depth_limit(session, words, policy, StopCommand::MinDepth)
}

pub fn maxdepth(session: &mut Session, words: &[String], policy: &mut StopPolicy, _event: &Event) -> Result<Directive> {
    depth_limit(session, words, policy, StopCommand::MaxDepth)
}

pub fn continue_(session: &mut Session, words: &[String], policy: &mut StopPolicy, _event: &Event) -> Result<Directive> {
    let Some((args, mut opts)) = movement_opts(session, words)? else {
        return keep();
    };
    if !args.is_empty() {
        return usage(session, words);
    }
    // 表示レベルを指定しなければ、厳密モードでは何も表示しない
    if opts.print_level.is_none() {
        let strict = opts.strict.unwrap_or(false);
        opts.print_level = Some(if strict { PrintLevel::None } else { PrintLevel::Some });
    }
    stop_with(session, &opts, false, StopCommand::ToEnd, policy)
}
