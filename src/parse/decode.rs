//! Value decoding by quote kind

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Backtick,
}

static CLOSING_DOUBLE: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r#"(?<!\\)""#).expect("valid regex"));
static CLOSING_SINGLE: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"(?<!\\)'").expect("valid regex"));
static CLOSING_BACKTICK: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"(?<!\\)`").expect("valid regex"));

static CONTINUATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\n\s*").expect("valid regex"));

impl Quote {
    pub fn from_char(c: char) -> Option<Quote> {
        match c {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            '`' => Some(Quote::Backtick),
            _ => None,
        }
    }

    /// Byte offset of the first instance of this quote not preceded by a backslash.
    pub fn find_closing(self, text: &str) -> Option<usize> {
        let pattern = match self {
            Quote::Double => &*CLOSING_DOUBLE,
            Quote::Single => &*CLOSING_SINGLE,
            Quote::Backtick => &*CLOSING_BACKTICK,
        };
        pattern.find(text).ok().flatten().map(|m| m.start())
    }
}

/// Decode the content found between a pair of quotes.
pub fn decode_quoted(quote: Quote, content: &str) -> String {
    match quote {
        Quote::Double => unescape_double_quoted(content),
        Quote::Single | Quote::Backtick => content.to_string(),
    }
}

/// Decode an unquoted value: trim, drop `\<newline><whitespace>` markers.
pub fn decode_unquoted(raw: &str) -> String {
    CONTINUATION_MARKER.replace_all(raw.trim(), "").into_owned()
}

/// `\n \r \t \\ \"` are processed; any other escape is kept verbatim so that
/// `\$` survives to interpolation.
fn unescape_double_quoted(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quotes_process_escapes() {
        assert_eq!(decode_quoted(Quote::Double, r"a\nb"), "a\nb");
        assert_eq!(decode_quoted(Quote::Double, r"tab\there"), "tab\there");
        assert_eq!(decode_quoted(Quote::Double, r"cr\r"), "cr\r");
        assert_eq!(decode_quoted(Quote::Double, r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(decode_quoted(Quote::Double, r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_double_quotes_keep_unknown_escapes() {
        assert_eq!(decode_quoted(Quote::Double, r"\$HOME"), r"\$HOME");
        assert_eq!(decode_quoted(Quote::Double, r"trailing\"), r"trailing\");
    }

    #[test]
    fn test_escaped_backslash_before_n_is_not_a_newline() {
        assert_eq!(decode_quoted(Quote::Double, r"C:\\new"), r"C:\new");
    }

    #[test]
    fn test_single_quotes_and_backticks_are_literal() {
        assert_eq!(decode_quoted(Quote::Single, r"a\nb"), r"a\nb");
        assert_eq!(decode_quoted(Quote::Backtick, r"a\nb"), r"a\nb");
    }

    #[test]
    fn test_unquoted_values_are_trimmed_and_markers_removed() {
        assert_eq!(decode_unquoted("  value  "), "value");
        assert_eq!(decode_unquoted("one\\\n   two"), "onetwo");
    }

    #[test]
    fn test_closing_quote_skips_escaped_instances() {
        assert_eq!(Quote::Double.find_closing(r#"a\"b"c"#), Some(4));
        assert_eq!(Quote::Single.find_closing(r"it\'s"), None);
        assert_eq!(Quote::Backtick.find_closing("x`"), Some(1));
        assert_eq!(Quote::Double.find_closing("\"at start"), Some(0));
    }

    #[test]
    fn test_quote_kinds_from_chars() {
        assert_eq!(Quote::from_char('"'), Some(Quote::Double));
        assert_eq!(Quote::from_char('\''), Some(Quote::Single));
        assert_eq!(Quote::from_char('`'), Some(Quote::Backtick));
        assert_eq!(Quote::from_char('x'), None);
    }
}
