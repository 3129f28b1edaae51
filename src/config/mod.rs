//! Option layering
//!
//! Loader options come from CLI arguments and environment variables with
//! precedence CLI > Env > Defaults.

pub mod env_options;

pub use env_options::{parse_flag, OptionOverrides};
