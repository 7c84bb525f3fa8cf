//! セッションの設定値を変えるコマンド
//!
//! 値を変えたときの確認メッセージは、端末から読んだコマンドのときだけ出します。
//! `source` で読み込んだスクリプトでは黙って設定します。

use super::{keep, on_off, usage};
use crate::command::Command;
use crate::directive::{Directive, PrintLevel, StopPolicy};
use crate::event::Event;
use crate::session::Session;
use crate::settings::{ContextPosition, Scope};
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;

pub fn printlevel(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let level = session.settings.print_level;
            writeln!(session.out(), "The default print level is `{}'.", level)?;
        }
        [_, word] => {
            let Some(level) = PrintLevel::parse(word) else {
                return usage(session, words);
            };
            session.settings.print_level = level;
            session.confirm(&format!("Default print level set to `{}'.", level))?;
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn mmc_options(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    session.settings.mmc_options = words[1..].join(" ");
    keep()
}

pub fn scroll(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let settings = &session.settings;
            let message = format!(
                "Scroll control is {}, scroll window size is {}.",
                if settings.scroll_control { "on" } else { "off" },
                settings.scroll_limit
            );
            writeln!(session.out(), "{}", message)?;
        }
        [_, word] => {
            if let Some(on) = on_off(word) {
                session.settings.scroll_control = on;
                session.confirm(if on {
                    "Scroll control enabled."
                } else {
                    "Scroll control disabled."
                })?;
            } else if let Some(n) = parse_natural(word) {
                session.settings.scroll_limit = n;
                session.confirm(&format!("Scroll window size set to {}.", n))?;
            } else {
                return usage(session, words);
            }
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn stack_default_limit(
    session: &mut Session,
    words: &[String],
    _: &mut StopPolicy,
    _: &Event,
) -> Result<Directive> {
    match words {
        [_] => match session.settings.stack_default_limit {
            0 => writeln!(session.out(), "There is no default stack dump size limit.")?,
            n => writeln!(session.out(), "Default stack dump size limit is {}.", n)?,
        },
        [_, word] => {
            let Some(n) = parse_natural(word) else {
                return usage(session, words);
            };
            session.settings.stack_default_limit = n;
            if n > 0 {
                session.confirm(&format!("Default stack dump size limit set to {}.", n))?;
            } else {
                session.confirm("Default stack dump size limit set to none.")?;
            }
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn context(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let message = session.settings.context.report_message();
            writeln!(session.out(), "{}", message)?;
        }
        [_, word] => {
            let Some(position) = ContextPosition::parse(word) else {
                return usage(session, words);
            };
            session.settings.context = position;
            session.confirm(position.set_message())?;
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn goal_paths(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let state = if session.settings.goal_paths { "on" } else { "off" };
            writeln!(session.out(), "Goal path printing is {}.", state)?;
        }
        [_, word] => {
            let Some(on) = on_off(word) else {
                return usage(session, words);
            };
            session.settings.goal_paths = on;
            writeln!(session.out(), "Goal path printing is now {}.", word)?;
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn scope(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let message = session.settings.scope.report_message();
            writeln!(session.out(), "{}", message)?;
        }
        [_, word] => {
            let Some(scope) = Scope::parse(word) else {
                return usage(session, words);
            };
            session.settings.scope = scope;
            session.confirm(scope.set_message())?;
        }
        _ => return usage(session, words),
    }
    keep()
}

pub fn echo(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => {
            let state = if session.settings.echo_commands { "on" } else { "off" };
            writeln!(session.out(), "Command echo is {}.", state)?;
        }
        [_, word] => match on_off(word) {
            Some(true) => {
                // 有効にしたコマンド自身はまだエコーされていない
                if !session.settings.echo_commands {
                    writeln!(session.out(), "echo on")?;
                    session.settings.echo_commands = true;
                }
                session.confirm("Command echo enabled.")?;
            }
            Some(false) => {
                session.settings.echo_commands = false;
                session.confirm("Command echo disabled.")?;
            }
            None => return usage(session, words),
        },
        _ => return usage(session, words),
    }
    keep()
}

pub fn alias(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => session.aliases.print_all(session.console.out(), false)?,
        [_, name] => session.aliases.print_one(session.console.out(), name, false)?,
        [_, name, body @ ..] => {
            if !Command::is_valid_name(&body[0]) {
                writeln!(session.out(), "`{}' is not a valid command.", body[0])?;
                return keep();
            }
            session.aliases.add(name, body);
            if session.is_interacting() {
                session.aliases.print_one(session.console.out(), name, false)?;
            }
        }
        [] => return usage(session, words),
    }
    keep()
}

pub fn unalias(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let [_, name] = words else {
        return usage(session, words);
    };
    if session.aliases.remove(name) {
        session.confirm(&format!("Alias `{}' removed.", name))?;
    } else {
        writeln!(
            session.err(),
            "Alias `{}' cannot be removed, since it does not exist.",
            name
        )?;
    }
    keep()
}
