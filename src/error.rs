//! Error types surfaced by the loader.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = EnvError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum EnvError {
    /// The file could not be read at all (missing, permission denied, ...).
    #[error("failed to read \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported encoding \"{encoding}\" requested for \"{}\"", path.display())]
    UnsupportedEncoding { path: PathBuf, encoding: String },

    /// The bytes are not valid in the requested encoding.
    #[error("\"{}\" is not valid {encoding}", path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error("no \".env*\" files matching pattern \"{pattern}\" in \"{}\" dir", dir.display())]
    NoMatchingFiles { pattern: String, dir: PathBuf },

    #[error("cyclic variable reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },
}
