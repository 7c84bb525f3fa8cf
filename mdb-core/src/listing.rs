//! `list` コマンドのソース表示と検索パス

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// ソースファイルを探すディレクトリの並び（先頭から順に探す）
#[derive(Debug, Clone, Default)]
pub struct ListingPath {
    dirs: Vec<String>,
}

impl ListingPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// 与えた順のまま先頭に加える
    pub fn push(&mut self, dirs: &[String]) {
        for dir in dirs.iter().rev() {
            self.dirs.insert(0, dir.clone());
        }
    }

    /// 先頭のディレクトリを取り除く
    pub fn pop(&mut self) -> Option<String> {
        if self.dirs.is_empty() {
            None
        } else {
            Some(self.dirs.remove(0))
        }
    }

    /// パス全体を置き換える（`set list_path`）
    pub fn set(&mut self, dirs: &[String]) {
        self.dirs.clear();
        self.push(dirs);
    }

    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// ファイルを探す。絶対パスならそのまま使う
    pub fn find(&self, file: &str) -> Option<PathBuf> {
        let path = Path::new(file);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.dirs
            .iter()
            .map(|dir| Path::new(dir).join(file))
            .chain(std::iter::once(path.to_path_buf()))
            .find(|candidate| candidate.is_file())
    }

    /// `first..=last` 行を表示し、`mark` 行に `*` を付ける
    pub fn list_lines(
        &self,
        out: &mut dyn Write,
        err: &mut dyn Write,
        file: &str,
        first: usize,
        last: usize,
        mark: usize,
    ) -> io::Result<()> {
        let Some(path) = self.find(file) else {
            return writeln!(err, "mdb: cannot find file `{}'.", file);
        };
        debug!("listing {} lines {}..={}", path.display(), first, last);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => return writeln!(err, "mdb: {}: {}.", file, e),
        };
        for (number, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l)) {
            if number < first {
                continue;
            }
            if number > last {
                break;
            }
            let marker = if number == mark { '*' } else { ' ' };
            writeln!(out, "{}{:>5} {}", marker, number, line)?;
        }
        Ok(())
    }
}
