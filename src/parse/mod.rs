//! Env-file parsing
//!
//! Files are parsed independently and folded together with the overwrite
//! merge, so later files win on key collisions.

use crate::domain::EnvMap;
use crate::error::Result;
use crate::merge::{MergeConfig, Merger};
use crate::utils::read_text;
use std::path::Path;

pub mod decode;
pub mod scanner;

pub use scanner::parse_str;

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub encoding: Option<String>,
    pub merge: MergeConfig,
}

/// Read and parse a single file.
pub fn parse_file(path: &Path, encoding: Option<&str>) -> Result<EnvMap> {
    tracing::debug!("parsing \"{}\"...", path.display());
    let content = read_text(path, encoding)?;
    Ok(parse_str(&content))
}

/// Parse every file in order and overwrite-merge the results.
///
/// Fails on the first unreadable file; no partial map is returned.
pub fn parse_files<P: AsRef<Path>>(paths: &[P], options: &ParseOptions) -> Result<EnvMap> {
    let merger = Merger::new(options.merge);
    let mut result = EnvMap::new();

    for path in paths {
        let path = path.as_ref();
        let parsed = parse_file(path, options.encoding.as_deref())?;
        for key in parsed.keys().filter(|key| result.contains_key(*key)) {
            tracing::debug!(">> {} is being overwritten by merge from \"{}\"", key, path.display());
        }
        result = merger.merge_maps(&result, &parsed);
    }

    Ok(result)
}
