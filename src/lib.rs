//! envcascade: load layered `.env` file cascades
//!
//! Files are selected by environment name and naming pattern, parsed into an
//! ordered map, merged with later files overriding earlier ones, and their
//! values interpolated and coerced. Only variables absent from the target
//! store are set.

pub mod cascade;
pub mod config;
pub mod domain;
pub mod error;
pub mod merge;
pub mod parse;
pub mod resolve;
pub mod store;
pub mod utils;

pub use cascade::{config, list_files, load, unload};
pub use domain::{CascadeFile, CascadeRole, EnvMap, LoadOptions};
pub use error::{EnvError, Result};
pub use merge::{MergeConfig, Merger};
pub use store::{EnvStore, MemoryEnv, ProcessEnv};
