//! 入力行の単語分割
//!
//! 空白で単語を区切ります。一重引用符と二重引用符の中の空白は区切りになりません。
//! 引用符は取り除かれ、一方の引用符の中ではもう一方の引用符は普通の文字です。
//! バックスラッシュはどのモードでも次の1文字をエスケープし、自身は取り除かれます。

use crate::errors::WordError;
use std::iter::Peekable;
use std::str::Chars;

/// 先頭の回数プレフィックスとして受け付ける桁数の上限
pub const MAX_NUMBER_LEN: usize = 80;

/// 行を単語に分割し、先頭単語に付いた数字のプレフィックスを独立した単語にする
///
/// `3dump` は `["3", "dump"]` になります。
pub fn break_into_words(line: &str) -> Result<Vec<String>, WordError> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }
        words.push(break_off_one_word(&mut chars)?);
    }

    split_count_prefix(&mut words)?;
    Ok(words)
}

/// 1単語を切り出す。引用符とエスケープはここで取り除く
fn break_off_one_word(chars: &mut Peekable<Chars<'_>>) -> Result<String, WordError> {
    let mut word = String::new();
    let mut single_quoted = false;
    let mut double_quoted = false;

    while let Some(&c) = chars.peek() {
        if !single_quoted && !double_quoted && c.is_ascii_whitespace() {
            break;
        }
        chars.next();

        match c {
            '\'' if !double_quoted => single_quoted = !single_quoted,
            '"' if !single_quoted => double_quoted = !double_quoted,
            '\\' => match chars.next() {
                Some(escaped) => word.push(escaped),
                None => return Err(WordError::BadBackslash),
            },
            _ => word.push(c),
        }
    }

    if single_quoted {
        return Err(WordError::UnmatchedSingleQuote);
    }
    if double_quoted {
        return Err(WordError::UnmatchedDoubleQuote);
    }
    Ok(word)
}

/// 先頭単語の一部だけが数字なら、その数字を別の単語として前に出す
fn split_count_prefix(words: &mut Vec<String>) -> Result<(), WordError> {
    let Some(first) = words.first() else {
        return Ok(());
    };

    let digits = first.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Ok(());
    }
    if digits > MAX_NUMBER_LEN {
        return Err(WordError::NumberTooLarge);
    }

    if digits < first.len() {
        let rest = first[digits..].to_string();
        let count = first[..digits].to_string();
        words[0] = rest;
        words.insert(0, count);
    }
    Ok(())
}

/// 行をコマンドの単語列に変換する
///
/// `break_into_words` に加えて、先頭が数字で2番目が数字でなければ2つを入れ替え、
/// コマンド名を先頭にします（`5 step` は `step 5` になる）。
pub fn parse_line(line: &str) -> Result<Vec<String>, WordError> {
    let mut words = break_into_words(line)?;
    if words.len() > 1 && is_natural_number(&words[0]) && !is_natural_number(&words[1]) {
        words.swap(0, 1);
    }
    Ok(words)
}

/// 自然数（空でない10進数字列）かどうか
pub fn is_natural_number(word: &str) -> bool {
    parse_natural(word).is_some()
}

/// 自然数としてパースする
pub fn parse_natural(word: &str) -> Option<usize> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    word.parse().ok()
}

/// 単語分割で元の1単語に戻るように、特別な文字をエスケープする
pub fn quote_word(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    let mut quoted = String::with_capacity(word.len());
    for c in word.chars() {
        if c.is_ascii_whitespace() || matches!(c, '\'' | '"' | '\\' | ';') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        break_into_words(line).unwrap()
    }

    #[test]
    fn test_whitespace_separates_words() {
        assert_eq!(words("  print   X  "), vec!["print", "X"]);
        assert!(words("   ").is_empty());
        assert_eq!(words("a\tb"), vec!["a", "b"]);
    }

    #[test]
    fn test_quotes_are_removed() {
        assert_eq!(words("echo 'a b' c"), vec!["echo", "a b", "c"]);
        assert_eq!(words("x\"1 2\"y"), vec!["x1 2y"]);
        assert_eq!(words("'say \"hi\"'"), vec!["say \"hi\""]);
        assert_eq!(words("\"it's\""), vec!["it's"]);
        assert_eq!(words("''"), vec![""]);
    }

    #[test]
    fn test_backslash_escapes_in_all_modes() {
        assert_eq!(words(r"a\ b"), vec!["a b"]);
        assert_eq!(words(r"'a\'b'"), vec!["a'b"]);
        assert_eq!(words(r#""a\"b""#), vec!["a\"b"]);
        assert_eq!(words(r"\;"), vec![";"]);
    }

    #[test]
    fn test_word_errors() {
        assert_eq!(break_into_words("a 'b"), Err(WordError::UnmatchedSingleQuote));
        assert_eq!(break_into_words("a 'b' 'c"), Err(WordError::UnmatchedSingleQuote));
        assert_eq!(break_into_words("\"b"), Err(WordError::UnmatchedDoubleQuote));
        assert_eq!(break_into_words("a\\"), Err(WordError::BadBackslash));
        assert_eq!(WordError::BadBackslash.to_string(), "bad backslash");
    }

    #[test]
    fn test_balanced_quotes_never_error() {
        for line in ["'a' \"b\"", "'\"'", "\"'\"", "'' \"\"", "x'y'z \"w\""] {
            assert!(break_into_words(line).is_ok(), "{}", line);
        }
    }

    #[test]
    fn test_count_prefix_split() {
        assert_eq!(words("3dump"), vec!["3", "dump"]);
        assert_eq!(words("dump 3"), vec!["dump", "3"]);
        assert_eq!(words("12"), vec!["12"]);
    }

    #[test]
    fn test_count_prefix_length_limit() {
        let longest = "9".repeat(MAX_NUMBER_LEN);
        assert_eq!(break_into_words(&format!("{}x", longest)), Ok(vec![longest.clone(), "x".to_string()]));
        let too_long = "9".repeat(MAX_NUMBER_LEN + 1) + "x";
        assert_eq!(break_into_words(&too_long), Err(WordError::NumberTooLarge));
    }

    #[test]
    fn test_leading_number_swap() {
        assert_eq!(parse_line("5 step").unwrap(), vec!["step", "5"]);
        assert_eq!(parse_line("5 10").unwrap(), vec!["5", "10"]);
        assert_eq!(parse_line("3dump").unwrap(), vec!["dump", "3"]);
        assert_eq!(parse_line("dump 3").unwrap(), vec!["dump", "3"]);
    }

    #[test]
    fn test_quote_word_splits_back_to_one_word() {
        for word in ["plain", "a b", "it's", "x;y", r"back\\slash", ""] {
            assert_eq!(words(&quote_word(word)), vec![word.to_string()]);
        }
    }

    #[test]
    fn test_natural_numbers() {
        assert_eq!(parse_natural("007"), Some(7));
        assert_eq!(parse_natural(""), None);
        assert_eq!(parse_natural("-1"), None);
        assert!(!is_natural_number("step"));
    }
}
