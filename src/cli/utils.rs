//! Shared CLI utilities.

use clap::Args;
use envcascade::config::OptionOverrides;
use envcascade::LoadOptions;
use std::path::PathBuf;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

/// Loader options shared by the cascade commands.
#[derive(Args, Debug, Default)]
pub struct CascadeArgs {
    /// Environment name (overrides APP_ENV)
    #[arg(long, value_name = "NAME")]
    pub env_name: Option<String>,

    /// Environment name used when none is set
    #[arg(long, value_name = "NAME")]
    pub default_env_name: Option<String>,

    /// Directory the cascade files live in
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// File naming pattern, e.g. ".env[.node_env][.local]"
    #[arg(long, value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Load exactly these files instead of the cascade (comma-separated)
    #[arg(long, value_name = "FILES")]
    pub files: Option<String>,

    /// Encoding of the files (default utf-8)
    #[arg(long, value_name = "ENCODING")]
    pub encoding: Option<String>,

    /// Unload a previously loaded plain .env before loading
    #[arg(long)]
    pub purge_dotenv: bool,

    /// Suppress loader warnings
    #[arg(long)]
    pub silent: bool,
}

impl CascadeArgs {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            env_name: self.env_name.clone(),
            default_env_name: self.default_env_name.clone(),
            path: self.path.clone(),
            pattern: self.pattern.clone(),
            files: parse_csv(&self.files)
                .map(|files| files.into_iter().map(PathBuf::from).collect()),
            encoding: self.encoding.clone(),
            purge_dotenv: self.purge_dotenv.then_some(true),
            debug: None,
            silent: self.silent.then_some(true),
        }
    }

    /// CLI values first, then environment values, then defaults.
    pub fn load_options(&self, env_overrides: OptionOverrides) -> LoadOptions {
        self.overrides().or(env_overrides).apply(LoadOptions::new())
    }
}
