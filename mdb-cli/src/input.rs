//! rustyline による行入力
//!
//! 先頭の単語はコマンド名で補完し、引数はコマンドごとの補完方法に従います。

use mdb_core::command::Completer as ArgCompleter;
use mdb_core::{Command, LineInput, ReadLine};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::io;

/// コマンド名と固定の引数を補完する
pub struct MdbHelper {
    files: FilenameCompleter,
}

impl MdbHelper {
    fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
        }
    }
}

fn pairs<'a>(names: impl Iterator<Item = &'a str>) -> Vec<Pair> {
    names
        .map(|name| Pair {
            display: name.to_string(),
            replacement: name.to_string(),
        })
        .collect()
}

impl Completer for MdbHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        // `;` の後は新しいコマンドとして扱う
        let head = &line[..pos];
        let command_start = head.rfind(';').map_or(0, |i| i + 1);
        let word_start = head
            .rfind([' ', '\t', ';'])
            .map_or(0, |i| i + 1);
        let prefix = &line[word_start..pos];

        let Some(name) = line[command_start..word_start].split_whitespace().next() else {
            return Ok((word_start, pairs(Command::completions(prefix))));
        };
        let Some(command) = Command::lookup(name) else {
            return Ok((word_start, Vec::new()));
        };
        let candidates = match command.completer() {
            ArgCompleter::Command | ArgCompleter::Help => pairs(Command::completions(prefix)),
            ArgCompleter::Filename => return self.files.complete(line, pos, ctx),
            _ => pairs(
                command
                    .fixed_args()
                    .iter()
                    .copied()
                    .filter(|arg| arg.starts_with(prefix)),
            ),
        };
        Ok((word_start, candidates))
    }
}

impl Hinter for MdbHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for MdbHelper {}

impl Validator for MdbHelper {}

impl Helper for MdbHelper {}

/// 端末から読む入力源
pub struct TerminalInput {
    editor: Editor<MdbHelper, DefaultHistory>,
}

impl TerminalInput {
    pub fn new() -> rustyline::Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(MdbHelper::new()));
        Ok(Self { editor })
    }
}

/// 中断と入力の終わり以外の rustyline のエラーを I/O エラーにする
fn to_io(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(e) => e,
        e => io::Error::other(e.to_string()),
    }
}

impl LineInput for TerminalInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadLine> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).map_err(to_io)?;
                }
                Ok(ReadLine::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadLine::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadLine::Eof),
            Err(e) => Err(to_io(e)),
        }
    }
}
