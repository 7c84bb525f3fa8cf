//! `table_io` コマンド

use super::{keep, usage};
use crate::directive::{Directive, StopPolicy};
use crate::event::Event;
use crate::session::Session;
use crate::Result;
use std::io::Write;

const ERR_NOT_PREPARED: &str = "This executable wasn't prepared for I/O tabling.";

pub fn table_io(session: &mut Session, words: &[String], _: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let action = match words {
        [_] => None,
        [_, action] if matches!(action.as_str(), "start" | "begin" | "stop" | "end" | "stats" | "allow") => {
            Some(action.as_str())
        }
        _ => return usage(session, words),
    };

    // `allow` は準備されていない実行ファイルでも開始できるようにする
    if action == Some("allow") {
        session.io_tabling.allowed = true;
        return keep();
    }
    if !session.io_tabling.allowed {
        writeln!(session.err(), "{}", ERR_NOT_PREPARED)?;
        return keep();
    }

    let message = match action {
        None => session.io_tabling.status_message(),
        Some("start" | "begin") => session.io_tabling.start(event.number),
        Some("stop" | "end") => session.io_tabling.stop(event.number),
        _ => {
            session.io_tabling.print_stats(session.console.out())?;
            return keep();
        }
    };
    writeln!(session.out(), "{}", message)?;
    keep()
}
