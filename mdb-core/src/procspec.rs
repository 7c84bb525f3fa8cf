//! 手続き指定の解析と照合
//!
//! `[pred*|func*][MODULE.]NAME[/ARITY][-MODE]` の形を受け付けます。

use crate::event::{ProcKind, ProcLayout};
use crate::Result;
use regex::Regex;

/// 解析済みの手続き指定（省略された部分は何にでも一致する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcSpec {
    pub kind: Option<ProcKind>,
    pub module: Option<String>,
    pub name: String,
    pub arity: Option<usize>,
    pub mode: Option<usize>,
}

impl ProcSpec {
    /// 手続きがこの指定に一致するか
    pub fn matches(&self, proc: &ProcLayout) -> bool {
        self.kind.map_or(true, |k| k == proc.kind)
            && self.module.as_deref().map_or(true, |m| m == proc.module)
            && self.name == proc.name
            && self.arity.map_or(true, |a| a == proc.arity)
            && self.mode.map_or(true, |m| m == proc.mode)
    }

    /// 一致する手続きを候補から選ぶ
    pub fn select<'a>(&self, procs: &'a [ProcLayout]) -> Vec<&'a ProcLayout> {
        procs.iter().filter(|p| self.matches(p)).collect()
    }
}

/// 手続き指定のパーサ
pub struct ProcSpecParser {
    pattern: Regex,
}

impl ProcSpecParser {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"^(?:(pred|func)\*)?([^/]+?)(?:/(\d+))?(?:-(\d+))?$")?;
        Ok(Self { pattern })
    }

    /// 解析できなければ `None`
    pub fn parse(&self, text: &str) -> Option<ProcSpec> {
        let caps = self.pattern.captures(text)?;
        let kind = caps.get(1).map(|m| match m.as_str() {
            "func" => ProcKind::Func,
            _ => ProcKind::Pred,
        });

        let qualified = caps.get(2)?.as_str();
        let (module, name) = match qualified.rfind('.') {
            Some(0) => return None,
            Some(dot) if dot + 1 == qualified.len() => return None,
            Some(dot) => (Some(qualified[..dot].to_string()), qualified[dot + 1..].to_string()),
            None => (None, qualified.to_string()),
        };

        let arity = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        let mode = match caps.get(4) {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        Some(ProcSpec {
            kind,
            module,
            name,
            arity,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Determinism;

    #[test]
    fn test_parse_full_spec() {
        let parser = ProcSpecParser::new().unwrap();
        let spec = parser.parse("func*list.length/2-0").unwrap();
        assert_eq!(spec.kind, Some(ProcKind::Func));
        assert_eq!(spec.module.as_deref(), Some("list"));
        assert_eq!(spec.name, "length");
        assert_eq!(spec.arity, Some(2));
        assert_eq!(spec.mode, Some(0));
    }

    #[test]
    fn test_parse_partial_specs() {
        let parser = ProcSpecParser::new().unwrap();
        let spec = parser.parse("fib").unwrap();
        assert_eq!(spec.module, None);
        assert_eq!(spec.arity, None);

        let spec = parser.parse("a.b.fib/2").unwrap();
        assert_eq!(spec.module.as_deref(), Some("a.b"));
        assert_eq!(spec.name, "fib");

        assert!(parser.parse("").is_none());
        assert!(parser.parse("m./2").is_none());
        assert!(parser.parse("fib/x").is_none());
    }

    #[test]
    fn test_matches_ignores_missing_parts() {
        let parser = ProcSpecParser::new().unwrap();
        let procs = vec![
            ProcLayout::pred("m", "p", 2, 0, Determinism::Det),
            ProcLayout::pred("m", "p", 2, 1, Determinism::Semidet),
            ProcLayout::func("n", "p", 1, 0, Determinism::Det),
        ];
        assert_eq!(parser.parse("p").unwrap().select(&procs).len(), 3);
        assert_eq!(parser.parse("m.p/2").unwrap().select(&procs).len(), 2);
        assert_eq!(parser.parse("pred*p-1").unwrap().select(&procs).len(), 1);
        assert_eq!(parser.parse("func*p").unwrap().select(&procs).len(), 1);
    }
}
