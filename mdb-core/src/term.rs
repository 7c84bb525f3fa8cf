//! 変数指定と条件式の項
//!
//! `condition` コマンドと `hold`/`print` の変数指定が使う小さな構文です。

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// 変数指定の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarSpecError {
    #[error("missing variable name")]
    MissingName,

    #[error("missing path component")]
    MissingPathStep,
}

/// 項の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    #[error("syntax error in term")]
    Syntax,

    #[error("syntax error after term")]
    Trailing,
}

/// 変数の名前部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarName {
    /// 頭部変数の番号
    Number(usize),
    Named(String),
    /// `$name` で参照する保持変数
    Held(String),
}

/// 項の中の位置を表す段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Arg(usize),
    Field(String),
}

/// `VAR[^PATH]` 形式の変数指定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub var: VarName,
    pub path: Vec<PathStep>,
}

impl VarSpec {
    pub fn parse(text: &str) -> Result<Self, VarSpecError> {
        let mut parts = text.split(['^', '/']);
        let name = parts.next().unwrap_or_default();
        let var = if let Some(held) = name.strip_prefix('$') {
            if held.is_empty() {
                return Err(VarSpecError::MissingName);
            }
            VarName::Held(held.to_string())
        } else if name.is_empty() {
            return Err(VarSpecError::MissingName);
        } else if let Ok(n) = name.parse() {
            VarName::Number(n)
        } else {
            VarName::Named(name.to_string())
        };

        let path = parts
            .map(|step| match step {
                "" => Err(VarSpecError::MissingPathStep),
                _ => Ok(step
                    .parse()
                    .map(PathStep::Arg)
                    .unwrap_or_else(|_| PathStep::Field(step.to_string()))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { var, path })
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.var {
            VarName::Number(n) => write!(f, "{}", n)?,
            VarName::Named(name) => f.write_str(name)?,
            VarName::Held(name) => write!(f, "${}", name)?,
        }
        for step in &self.path {
            match step {
                PathStep::Arg(n) => write!(f, "^{}", n)?,
                PathStep::Field(name) => write!(f, "^{}", name)?,
            }
        }
        Ok(())
    }
}

/// 条件式の右辺の項
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Var(String),
    Int(i64),
    Float(f64),
    Str(String),
    Compound(String, Vec<Term>),
    List(Vec<Term>, Option<Box<Term>>),
}

impl Term {
    /// 文字列全体を1つの項として解析する
    pub fn parse(text: &str) -> Result<Self, TermError> {
        let mut parser = TermParser {
            chars: text.chars().peekable(),
        };
        let term = parser.term()?;
        parser.skip_space();
        if parser.chars.peek().is_some() {
            return Err(TermError::Trailing);
        }
        Ok(term)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) | Term::Var(name) => f.write_str(name),
            Term::Int(n) => write!(f, "{}", n),
            Term::Float(x) => write!(f, "{:?}", x),
            Term::Str(s) => write!(f, "\"{}\"", s),
            Term::Compound(functor, args) => {
                write!(f, "{}(", functor)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Term::List(items, tail) => {
                f.write_str("[")?;
                write_list(f, items)?;
                if let Some(tail) = tail {
                    write!(f, " | {}", tail)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", term)?;
    }
    Ok(())
}

struct TermParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl TermParser<'_> {
    fn skip_space(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn expect(&mut self, wanted: char) -> Result<(), TermError> {
        self.skip_space();
        match self.chars.next() {
            Some(c) if c == wanted => Ok(()),
            _ => Err(TermError::Syntax),
        }
    }

    fn term(&mut self) -> Result<Term, TermError> {
        self.skip_space();
        match self.chars.peek().copied() {
            Some('[') => {
                self.chars.next();
                self.list()
            }
            Some('"') => {
                self.chars.next();
                Ok(Term::Str(self.quoted('"')?))
            }
            Some('\'') => {
                self.chars.next();
                let name = self.quoted('\'')?;
                self.after_functor(name)
            }
            Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
            Some(c) if c.is_uppercase() || c == '_' => Ok(Term::Var(self.identifier())),
            Some(c) if c.is_alphabetic() => {
                let name = self.identifier();
                self.after_functor(name)
            }
            _ => Err(TermError::Syntax),
        }
    }

    fn after_functor(&mut self, name: String) -> Result<Term, TermError> {
        if self.chars.next_if_eq(&'(').is_none() {
            return Ok(Term::Atom(name));
        }
        let args = self.sequence(')')?;
        if args.is_empty() {
            return Err(TermError::Syntax);
        }
        self.expect(')')?;
        Ok(Term::Compound(name, args))
    }

    fn list(&mut self) -> Result<Term, TermError> {
        let items = self.sequence(']')?;
        self.skip_space();
        let tail = if !items.is_empty() && self.chars.next_if_eq(&'|').is_some() {
            Some(Box::new(self.term()?))
        } else {
            None
        };
        self.expect(']')?;
        Ok(Term::List(items, tail))
    }

    /// `close` の直前までのカンマ区切りの項
    fn sequence(&mut self, close: char) -> Result<Vec<Term>, TermError> {
        let mut items = Vec::new();
        self.skip_space();
        if self.chars.peek() == Some(&close) {
            return Ok(items);
        }
        loop {
            items.push(self.term()?);
            self.skip_space();
            if self.chars.next_if_eq(&',').is_none() {
                return Ok(items);
            }
        }
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
            name.push(c);
        }
        name
    }

    fn quoted(&mut self, quote: char) -> Result<String, TermError> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(TermError::Syntax),
                Some('\\') => text.push(self.chars.next().ok_or(TermError::Syntax)?),
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Term, TermError> {
        let mut text = String::new();
        if let Some(minus) = self.chars.next_if_eq(&'-') {
            text.push(minus);
        }
        while let Some(c) = self.chars.next_if(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E')) {
            text.push(c);
        }
        if let Ok(n) = text.parse() {
            return Ok(Term::Int(n));
        }
        text.parse().map(Term::Float).map_err(|_| TermError::Syntax)
    }
}
