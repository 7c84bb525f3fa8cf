//! `set`、`source`、`save`、`quit`

use super::{keep, usage};
use crate::directive::{Directive, PrintLevel, StopCommand, StopPolicy};
use crate::event::Event;
use crate::options;
use crate::reader::os_message;
use crate::session::Session;
use crate::settings::{BrowserParam, PrintFormat};
use crate::words::parse_natural;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

const QUIT_PROMPT: &str = "mdb: are you sure you want to quit? ";

pub fn set(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_, key, rest @ ..] if key == "list_context_lines" && !rest.is_empty() => {
            let Some(n) = rest.first().filter(|_| rest.len() == 1).and_then(|v| parse_natural(v)) else {
                return usage(session, words);
            };
            session.settings.list_context_lines = n;
        }
        [_, key, dirs @ ..] if key == "list_path" && !dirs.is_empty() => session.listing.set(dirs),
        [_, key, file] if key == "fail_trace_count" || key == "fail_trace_counts" => {
            session.settings.fail_trace_counts = Some(file.clone());
        }
        [_, key, file] if key == "pass_trace_count" || key == "pass_trace_counts" => {
            session.settings.pass_trace_counts = Some(file.clone());
        }
        [_, key, value] if key == "max_io_actions" && parse_natural(value).is_some() => {
            if let Some(n) = parse_natural(value) {
                session.settings.max_io_actions = n;
            }
        }
        [_, key, command @ ..] if key == "xml_browser_cmd" && !command.is_empty() => {
            session.settings.xml_browser_cmd = Some(command.join(" "));
        }
        [_, key, file] if key == "xml_tmp_filename" => {
            session.settings.xml_tmp_filename = Some(file.clone());
        }
        _ => return set_browser_param(session, words),
    }
    keep()
}

/// `set [-P|-B|-A] [-f|-r|-v|-p] (format|depth|size|width|lines) VALUE`
fn set_browser_param(session: &mut Session, words: &[String]) -> Result<Directive> {
    let Ok((first, opts)) = options::param(words) else {
        return usage(session, words);
    };
    let [key, value] = &words[first..] else {
        return usage(session, words);
    };
    if key == "format" {
        let Some(format) = PrintFormat::parse(value) else {
            return usage(session, words);
        };
        session.settings.browser.set_format(&opts.callers, format);
        return keep();
    }
    let (Some(param), Some(n)) = (BrowserParam::parse(key), parse_natural(value)) else {
        return usage(session, words);
    };
    session
        .settings
        .browser
        .set_param(&opts.callers, &opts.formats, param, n);
    keep()
}

pub fn source(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, ignore_errors)) = options::source(words) else {
        return usage(session, words);
    };
    let [file] = &words[first..] else {
        return usage(session, words);
    };
    // 失敗は source_file が報告済み
    session.source_file(file, ignore_errors)?;
    keep()
}

pub fn save(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let [_, path] = words else {
        return usage(session, words);
    };
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            writeln!(session.err(), "mdb: error opening `{}': {}.", path, os_message(&e))?;
            return keep();
        }
    };

    let state = session.saved_state();
    for id in &state.unsaved {
        writeln!(
            session.err(),
            "mdb: cannot save break point {}: it is on a specific event.",
            id
        )?;
    }

    let mut writer = BufWriter::new(file);
    let written = state
        .commands
        .iter()
        .try_for_each(|command| writeln!(writer, "{}", command))
        .and_then(|()| writer.flush());
    debug!("saved {} commands to {}", state.commands.len(), path);

    if !state.unsaved.is_empty() {
        writeln!(session.err(), "mdb: could not save debugger state to {}.", path)?;
    } else if let Err(e) = written {
        writeln!(session.err(), "mdb: error closing `{}': {}.", path, os_message(&e))?;
    } else {
        writeln!(session.out(), "Debugger state saved to {}.", path)?;
    }
    keep()
}

pub fn quit(session: &mut Session, words: &[String], policy: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let Ok((first, confirmed)) = options::quit(words) else {
        return usage(session, words);
    };
    if first != words.len() {
        return usage(session, words);
    }

    if confirmed != Some(true) {
        // 入力の終わりや空行は確認とみなす
        let reply = session.get_line(QUIT_PROMPT)?;
        let confirmed = match reply.as_deref().map(str::trim_start) {
            None | Some("") => true,
            Some(text) => text.starts_with(['y', 'Y']),
        };
        if !confirmed {
            return keep();
        }
    }

    let verbose = false;
    session.collab.window.close(verbose, session.console.out())?;
    info!("quitting");
    *policy = StopPolicy {
        strict: true,
        print_level: PrintLevel::None,
        command: StopCommand::Terminate,
        check_integrity: false,
    };
    Ok(Directive::StopInteracting)
}
