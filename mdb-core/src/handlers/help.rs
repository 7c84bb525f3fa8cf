//! ヘルプの登録と表示

use super::{keep, usage};
use crate::directive::{Directive, StopPolicy};
use crate::event::Event;
use crate::session::Session;
use crate::words::parse_natural;
use crate::Result;
use std::io::Write;

/// ヘルプ本文を読むときのプロンプト
const HELP_TEXT_PROMPT: &str = "cat> ";

/// `end` だけの行までを本文として読む
///
/// 引数の検査より先に読むので、使い方エラーでも本文は読み捨てられます。
fn read_help_text(session: &mut Session) -> Result<String> {
    let mut lines = Vec::new();
    while let Some(line) = session.get_line(HELP_TEXT_PROMPT)? {
        if line == "end" {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

pub fn document_category(
    session: &mut Session,
    words: &[String],
    _: &mut StopPolicy,
    _: &Event,
) -> Result<Directive> {
    let text = read_help_text(session)?;
    let [_, slot, category] = words else {
        return usage(session, words);
    };
    let Some(slot) = parse_natural(slot) else {
        return usage(session, words);
    };
    if let Err(e) = session.help.add_category(category, slot, &text) {
        writeln!(session.err(), "Document category `{}' not added: {}.", category, e)?;
    }
    keep()
}

pub fn document(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    let text = read_help_text(session)?;
    let [_, category, slot, item] = words else {
        return usage(session, words);
    };
    let Some(slot) = parse_natural(slot) else {
        return usage(session, words);
    };
    if let Err(e) = session.help.add_item(category, item, slot, &text) {
        writeln!(
            session.err(),
            "Document item `{}' in category `{}' not added: {}.",
            item, category, e
        )?;
    }
    keep()
}

pub fn help(session: &mut Session, words: &[String], _: &mut StopPolicy, _: &Event) -> Result<Directive> {
    match words {
        [_] => session.help.print_overview(session.console.out())?,
        [_, word] => session.help.print_word(session.console.out(), word)?,
        [_, category, item] => session.help.print_item(session.console.out(), category, item)?,
        _ => return usage(session, words),
    }
    keep()
}
