//! Reading env files in a caller-specified encoding.
//!
//! Labels are resolved through `encoding_rs` (WHATWG labels), plus the
//! extra spellings `utf8`, `utf16le`, `ucs2` and `ucs-2`. A leading BOM is
//! removed. Undecodable input is an error rather than being replaced.

use crate::error::{EnvError, Result};
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

/// Resolve an encoding label, accepting a few non-WHATWG aliases.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let canonical = match normalized.as_str() {
        "utf8" => "utf-8",
        "utf16le" | "ucs2" | "ucs-2" => "utf-16le",
        other => other,
    };
    Encoding::for_label(canonical.as_bytes())
}

/// Decode raw bytes, stripping a BOM if present.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding, path: &Path) -> Result<String> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(EnvError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name().to_lowercase(),
        });
    }
    Ok(text.into_owned())
}

/// Read a whole file as text. `encoding` defaults to UTF-8.
pub fn read_text(path: &Path, encoding: Option<&str>) -> Result<String> {
    let encoding = match encoding {
        Some(label) => {
            encoding_for_label(label).ok_or_else(|| EnvError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: label.to_string(),
            })?
        }
        None => UTF_8,
    };

    let bytes = std::fs::read(path)
        .map_err(|source| EnvError::Read { path: path.to_path_buf(), source })?;

    decode_bytes(&bytes, encoding, path)
}
