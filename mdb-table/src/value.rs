//! 呼び出しテーブルの引数値

use std::fmt;

/// トライの1段で使われるキーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// 64ビット整数
    Int,
    /// 浮動小数点数
    Float,
    /// 文字列
    String,
}

impl ArgKind {
    /// ユーザーが入力した文字列をこの種類の値として解釈する
    ///
    /// 文字列は常に成功します。整数と浮動小数点数は失敗すると `None` を返します。
    pub fn parse(self, text: &str) -> Option<ArgValue> {
        match self {
            ArgKind::Int => parse_integer(text).map(ArgValue::Int),
            ArgKind::Float => text.trim().parse::<f64>().ok().map(ArgValue::Float),
            ArgKind::String => Some(ArgValue::Str(text.to_string())),
        }
    }
}

/// 符号付き10進整数をパースする（先頭の `-` のみ許可）
fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok()
}

/// トライのキーとなる値
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ArgValue {
    /// 値の種類を返す
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Int(_) => ArgKind::Int,
            ArgValue::Float(_) => ArgKind::Float,
            ArgValue::Str(_) => ArgKind::String,
        }
    }

    /// "call table does not contain ..." で使う、引用符なしの表記
    pub fn bare(&self) -> String {
        match self {
            ArgValue::Int(n) => n.to_string(),
            ArgValue::Float(f) => format!("{:.6}", f),
            ArgValue::Str(s) => s.clone(),
        }
    }
}

/// チップ行で使う表記（文字列は二重引用符で囲む）
impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Int(n) => write!(f, "{}", n),
            ArgValue::Float(x) => write!(f, "{:.6}", x),
            ArgValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// `<1, 2.500000, "a">` 形式でタプルを整形する
pub fn format_tuple(values: &[ArgValue]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("<{}>", parts.join(", "))
}
