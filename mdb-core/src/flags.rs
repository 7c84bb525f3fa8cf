//! 開発者向けのデバッグフラグ

use std::io::{self, Write};

/// 既知のフラグ名（一覧はこの順）
pub const FLAG_NAMES: [&str; 12] = [
    "calls",
    "detail",
    "final",
    "goto",
    "heap",
    "nondetstack",
    "ordreg",
    "prog",
    "sreg",
    "table",
    "tablestack",
    "unbuf",
];

/// `flag` コマンドが読み書きするフラグの集合
#[derive(Debug, Clone)]
pub struct DebugFlags {
    flags: Vec<(&'static str, bool)>,
}

impl DebugFlags {
    pub fn new() -> Self {
        Self {
            flags: FLAG_NAMES.iter().map(|&name| (name, false)).collect(),
        }
    }

    /// 未知の名前なら `None`
    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// 未知の名前なら `false`
    pub fn set(&mut self, name: &str, value: bool) -> bool {
        match self.flags.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn print_all(&self, out: &mut dyn Write) -> io::Result<()> {
        for (name, value) in &self.flags {
            print_flag(out, name, *value)?;
        }
        Ok(())
    }
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// `Flag NAME is set.` または `Flag NAME is clear.`
pub fn print_flag(out: &mut dyn Write, name: &str, value: bool) -> io::Result<()> {
    writeln!(out, "Flag {} is {}.", name, if value { "set" } else { "clear" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_flags_only() {
        let mut flags = DebugFlags::new();
        assert_eq!(flags.get("goto"), Some(false));
        assert!(flags.set("goto", true));
        assert_eq!(flags.get("goto"), Some(true));
        assert!(!flags.set("bogus", true));
        assert_eq!(flags.get("bogus"), None);

        let mut out = Vec::new();
        flags.print_all(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Flag calls is clear.\n"));
        assert!(text.contains("Flag goto is set.\n"));
    }
}
