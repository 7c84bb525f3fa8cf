//! 入力行の読み込み
//!
//! キューに行が残っていればそれを先に使い、空なら端末から読みます。
//! `get_command` は引用符の途中や行末のバックスラッシュで次の行へ続け、
//! 引用符の外の `;` で行を分けて残りをキューの先頭に戻します。

use crate::console::ReadLine;
use crate::session::Session;
use crate::Result;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// 継続行のプロンプト
pub const CONTINUATION_PROMPT: &str = "> ";

/// 行の走査結果
#[derive(Debug, Default)]
struct LineScan {
    single_quoted: bool,
    double_quoted: bool,
}

impl LineScan {
    /// `line[start..]` を走査する
    ///
    /// 引用符の外の `;` を見つけたら切る位置を返します。行末がエスケープで
    /// 終わっていればそれを空白に置き換え、続きが必要かどうかを `needs_more` に返します。
    fn scan(&mut self, line: &mut String, start: usize) -> (Option<usize>, bool) {
        let mut escaped = false;
        for (i, c) in line[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '\'' if !self.double_quoted => self.single_quoted = !self.single_quoted,
                '"' if !self.single_quoted => self.double_quoted = !self.double_quoted,
                ';' if !self.single_quoted && !self.double_quoted => return (Some(start + i), false),
                _ => {}
            }
        }
        if escaped {
            line.pop();
            line.push(' ');
        }
        (None, escaped || self.single_quoted || self.double_quoted)
    }
}

impl Session {
    /// 1行読む。キューが空なら端末から読み、対話中の印を付ける
    ///
    /// 入力が尽きたら `None` を返します。
    pub fn get_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if let Some(line) = self.queue.pop_front() {
            return Ok(Some(line));
        }

        self.console.set_interacting(true);
        loop {
            match self.console.read_line(prompt)? {
                ReadLine::Line(line) => {
                    if self.settings.echo_commands {
                        writeln!(self.out(), "{}", line)?;
                    }
                    return Ok(Some(line));
                }
                ReadLine::Eof => return Ok(None),
                ReadLine::Interrupted => {
                    writeln!(self.out(), "\nmdb: got interrupt signal")?;
                }
            }
        }
    }

    /// 1コマンド分の行を読む。入力が尽きていれば `quit` を返す
    pub fn get_command(&mut self, prompt: &str) -> Result<String> {
        let Some(mut line) = self.get_line(prompt)? else {
            return Ok("quit".to_string());
        };

        let mut scan = LineScan::default();
        let mut start = 0;
        loop {
            let (cut, needs_more) = scan.scan(&mut line, start);
            if let Some(pos) = cut {
                let rest = line.split_off(pos + 1);
                line.truncate(pos);
                self.queue.push_front(rest);
                break;
            }
            if !needs_more {
                break;
            }
            start = line.len();
            match self.get_line(CONTINUATION_PROMPT)? {
                Some(more) => line.push_str(&more),
                // 閉じていなくても入力が尽きたら打ち切る
                None => break,
            }
        }
        Ok(line)
    }

    /// ファイルの全行をキューの先頭に元の順序で入れる
    ///
    /// 読めなかったときは `ignore_errors` でなければ `FILE: <理由>.` を表示し、
    /// `false` を返します。
    pub fn source_file(&mut self, path: &str, ignore_errors: bool) -> Result<bool> {
        match std::fs::read_to_string(Path::new(path)) {
            Ok(text) => {
                let lines: Vec<String> = text.lines().map(str::to_string).collect();
                debug!("sourcing {} ({} lines)", path, lines.len());
                self.queue.insert_lines_at_head(lines);
                self.console.set_interacting(false);
                Ok(true)
            }
            Err(e) => {
                debug!("cannot source {}: {}", path, e);
                if !ignore_errors {
                    writeln!(self.err(), "{}: {}.", path, os_message(&e))?;
                }
                Ok(false)
            }
        }
    }
}

/// `(os error N)` を除いた OS のエラーメッセージ
pub(crate) fn os_message(e: &io::Error) -> String {
    let text = e.to_string();
    match text.find(" (os error") {
        Some(pos) => text[..pos].to_string(),
        None => text,
    }
}
