//! Line scanner turning env-file text into an ordered map
//!
//! The scanner carries a [`ScanState`] from line to line:
//!
//! - `SeekingKey`: skip blanks and comments, look for `[export ]KEY=`.
//! - `UnquotedContinuation`: the previous line ended in `\`.
//! - `QuotedValue`: a quote was opened and not yet closed.
//!
//! When input ends with an entry still open, the buffered value is finalized
//! in whatever state was active.

use super::decode::{decode_quoted, decode_unquoted, Quote};
use crate::domain::EnvMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*").expect("valid regex")
});

#[derive(Debug)]
enum ScanState {
    SeekingKey,
    UnquotedContinuation { key: String, buffer: Vec<String> },
    QuotedValue { key: String, quote: Quote, buffer: Vec<String> },
}

/// Parse env-file text. Never fails: malformed lines are ignored.
pub fn parse_str(content: &str) -> EnvMap {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut parsed = EnvMap::new();
    let mut state = ScanState::SeekingKey;

    for line in normalized.split('\n') {
        state = match state {
            ScanState::SeekingKey => seek_key(line, &mut parsed),
            ScanState::UnquotedContinuation { key, buffer } => {
                continue_unquoted(key, buffer, line, &mut parsed)
            }
            ScanState::QuotedValue { key, quote, buffer } => {
                continue_quoted(key, quote, buffer, line, &mut parsed)
            }
        };
    }

    match state {
        ScanState::SeekingKey => {}
        ScanState::UnquotedContinuation { key, buffer } => {
            insert(&mut parsed, key, decode_unquoted(&buffer.join("\n")));
        }
        ScanState::QuotedValue { key, quote, buffer } => {
            insert(&mut parsed, key, decode_quoted(quote, &buffer.join("\n")));
        }
    }

    parsed
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn insert(parsed: &mut EnvMap, key: String, value: String) {
    parsed.insert(key, Value::String(value));
}

fn seek_key(line: &str, parsed: &mut EnvMap) -> ScanState {
    if is_blank_or_comment(line) {
        return ScanState::SeekingKey;
    }
    let Some(captures) = KEY_PATTERN.captures(line) else {
        return ScanState::SeekingKey;
    };
    let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
        return ScanState::SeekingKey;
    };
    let key = name.as_str().to_string();
    let value_start = &line[whole.end()..];
    let trimmed = value_start.trim();

    if let Some(quote) = trimmed.chars().next().and_then(Quote::from_char) {
        let rest = &trimmed[1..];
        return match quote.find_closing(rest) {
            Some(end) => {
                insert(parsed, key, decode_quoted(quote, &rest[..end]));
                ScanState::SeekingKey
            }
            None => ScanState::QuotedValue { key, quote, buffer: vec![rest.to_string()] },
        };
    }

    match value_start.strip_suffix('\\') {
        Some(fragment) => {
            ScanState::UnquotedContinuation { key, buffer: vec![fragment.trim().to_string()] }
        }
        None => {
            insert(parsed, key, decode_unquoted(value_start));
            ScanState::SeekingKey
        }
    }
}

fn continue_unquoted(
    key: String,
    mut buffer: Vec<String>,
    line: &str,
    parsed: &mut EnvMap,
) -> ScanState {
    if is_blank_or_comment(line) {
        return ScanState::UnquotedContinuation { key, buffer };
    }
    if let Some(fragment) = line.strip_suffix('\\') {
        buffer.push(fragment.trim().to_string());
        return ScanState::UnquotedContinuation { key, buffer };
    }
    buffer.push(line.trim().to_string());
    insert(parsed, key, decode_unquoted(&buffer.join("\n")));
    ScanState::SeekingKey
}

fn continue_quoted(
    key: String,
    quote: Quote,
    mut buffer: Vec<String>,
    line: &str,
    parsed: &mut EnvMap,
) -> ScanState {
    match quote.find_closing(line) {
        Some(end) => {
            buffer.push(line[..end].to_string());
            insert(parsed, key, decode_quoted(quote, &buffer.join("\n")));
            ScanState::SeekingKey
        }
        None => {
            buffer.push(line.to_string());
            ScanState::QuotedValue { key, quote, buffer }
        }
    }
}
