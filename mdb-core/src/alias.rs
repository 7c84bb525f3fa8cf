//! エイリアス表と展開
//!
//! 展開は1行につき1回だけ行います。エイリアス本体の先頭が別のエイリアス名でも
//! 再展開はせず、そのままディスパッチされます。

use crate::words::{is_natural_number, quote_word};
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// 空行に対応するエイリアスのキー
pub const EMPTY_KEY: &str = "EMPTY";

/// 数字だけの行に対応するエイリアスのキー
pub const NUMBER_KEY: &str = "NUMBER";

/// 名前から単語列への対応表（名前順に列挙される）
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    aliases: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// エイリアスを追加する（同名があれば置き換える）
    pub fn add(&mut self, name: &str, body: &[String]) {
        debug!("alias {} => {:?}", name, body);
        self.aliases.insert(name.to_string(), body.to_vec());
    }

    /// エイリアスを削除する。存在しなければ `false`
    pub fn remove(&mut self, name: &str) -> bool {
        self.aliases.remove(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<&[String]> {
        self.aliases.get(name).map(Vec::as_slice)
    }

    /// 名前順の (名前, 本体) 列
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.aliases
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_slice()))
    }

    /// 登録されている名前（補完用）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// 1つのエイリアスを表示する
    ///
    /// `mdb_command_format` が真なら `source` で読み戻せる `alias` コマンドの形で書きます。
    pub fn print_one(&self, out: &mut dyn Write, name: &str, mdb_command_format: bool) -> io::Result<()> {
        match self.lookup(name) {
            Some(body) => write_alias(out, name, body, mdb_command_format),
            None => writeln!(out, "There is no such alias."),
        }
    }

    /// すべてのエイリアスを名前順に表示する
    pub fn print_all(&self, out: &mut dyn Write, mdb_command_format: bool) -> io::Result<()> {
        for (name, body) in self.iter() {
            write_alias(out, name, body, mdb_command_format)?;
        }
        Ok(())
    }

    /// 単語列の先頭にエイリアスがあれば1回だけ展開する
    ///
    /// 単語がなければ `EMPTY`、先頭が自然数なら `NUMBER` をキーにし、
    /// その場合は本体を元の単語列の前に付けます。それ以外は先頭の単語を本体で置き換えます。
    pub fn expand(&self, words: Vec<String>) -> Vec<String> {
        let (key, copy_start) = match words.first() {
            None => (EMPTY_KEY, 0),
            Some(first) if is_natural_number(first) => (NUMBER_KEY, 0),
            Some(first) => (first.as_str(), 1),
        };

        let Some(body) = self.lookup(key) else {
            return words;
        };
        debug!("expanding alias {} => {:?}", key, body);

        let mut expanded = Vec::with_capacity(body.len() + words.len());
        expanded.extend(body.iter().cloned());
        expanded.extend(words.into_iter().skip(copy_start));
        expanded
    }
}

fn write_alias(out: &mut dyn Write, name: &str, body: &[String], mdb_command_format: bool) -> io::Result<()> {
    if mdb_command_format {
        let quoted: Vec<String> = body.iter().map(|w| quote_word(w)).collect();
        writeln!(out, "alias {} {}", quote_word(name), quoted.join(" "))
    } else {
        writeln!(out, "{:<10} =>    {}", name, body.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_named_alias_replaces_first_word() {
        let mut table = AliasTable::new();
        table.add("s", &words(&["step"]));
        assert_eq!(table.expand(words(&["s", "3"])), words(&["step", "3"]));
        assert_eq!(table.expand(words(&["next"])), words(&["next"]));
    }

    #[test]
    fn test_empty_and_number_keys_prepend() {
        let mut table = AliasTable::new();
        table.add(EMPTY_KEY, &words(&["step"]));
        table.add(NUMBER_KEY, &words(&["step"]));
        assert_eq!(table.expand(Vec::new()), words(&["step"]));
        assert_eq!(table.expand(words(&["5"])), words(&["step", "5"]));
    }

    #[test]
    fn test_expansion_happens_once() {
        let mut table = AliasTable::new();
        table.add("a", &words(&["b", "x"]));
        table.add("b", &words(&["a"]));
        let once = table.expand(words(&["a"]));
        assert_eq!(once, words(&["b", "x"]));
    }

    #[test]
    fn test_listing_is_sorted() {
        let mut table = AliasTable::new();
        table.add("zz", &words(&["quit", "-y"]));
        table.add("p", &words(&["print", "*"]));
        let mut out = Vec::new();
        table.print_all(&mut out, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "p          =>    print *\nzz         =>    quit -y\n"
        );

        let mut out = Vec::new();
        table.print_all(&mut out, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "alias p print *\nalias zz quit -y\n"
        );
        assert!(table.remove("p"));
        assert!(!table.remove("p"));
    }
}
