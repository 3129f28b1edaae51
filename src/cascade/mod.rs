//! Env-file cascade: file discovery and loading into an [`EnvStore`](crate::store::EnvStore)

pub mod filename;
pub mod loader;

pub use filename::{compose_filename, list_cascade, list_files, ComposeFlags, ListOptions};
pub use loader::{config, effective_env_name, load, planned_cascade, unload};
