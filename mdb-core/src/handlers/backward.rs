//! 後退コマンド

use super::{keep, no_op, usage};
use crate::directive::{Directive, PrintLevel, StopCommand, StopPolicy};
use crate::event::Event;
use crate::options;
use crate::runtime::RetryOutcome;
use crate::session::Session;
use crate::words::parse_natural;
use crate::Result;
use tracing::debug;

/// 祖先の終了や失敗を待ってから再投入する `retry`
const RETRY_AGAIN: &str = "retry -o";

pub fn retry(session: &mut Session, words: &[String], policy: &mut StopPolicy, event: &Event) -> Result<Directive> {
    let Ok((first, opts)) = options::retry(words) else {
        return usage(session, words);
    };
    let level = match &words[first..] {
        [] => 0,
        [n] => match parse_natural(n) {
            Some(n) => n,
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    };

    if level == 0 && event.port.is_entry() {
        return no_op(session);
    }

    let outcome = session
        .collab
        .engine
        .retry(event, level, opts.io_policy, opts.assume_all_io_is_tabled);
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            session.problem(e)?;
            return keep();
        }
    };
    debug!("retry level {}: {:?}", level, outcome);

    let depth = event.depth.saturating_sub(level as u64);
    *policy = match outcome {
        RetryOutcome::Direct => StopPolicy {
            strict: false,
            print_level: session.settings.print_level,
            command: StopCommand::Goto(event.number + 1),
            check_integrity: false,
        },
        RetryOutcome::FinishFirst | RetryOutcome::FailFirst => {
            session.queue.push_front(RETRY_AGAIN);
            StopPolicy {
                strict: true,
                print_level: PrintLevel::None,
                command: if outcome == RetryOutcome::FinishFirst {
                    StopCommand::Finish(depth)
                } else {
                    StopCommand::Fail(depth)
                },
                check_integrity: false,
            }
        }
    };
    Ok(Directive::StopInteracting)
}
