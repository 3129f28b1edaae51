//! Core data types shared across the loader

use crate::merge::MergeConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Ordered key → value map produced by parsing. Raw entries hold strings;
/// resolved entries hold typed values.
pub type EnvMap = serde_json::Map<String, serde_json::Value>;

/// Naming convention used when no pattern is configured.
pub const DEFAULT_PATTERN: &str = ".env[.node_env][.local]";

/// Legacy file considered before `.env` when the default pattern is in use.
pub const LEGACY_DEFAULTS_FILE: &str = ".env.defaults";

/// Plain base file reverted by `purge_dotenv`.
pub const DOTENV_FILE: &str = ".env";

/// Store variable read when no environment name is given explicitly.
pub const DEFAULT_ENV_VAR: &str = "APP_ENV";

/// Environment in which the local override file is never loaded.
pub const TEST_ENV_NAME: &str = "test";

/// Position of a file in the cascade, lowest override priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeRole {
    Defaults,
    Base,
    Local,
    EnvSpecific,
    EnvSpecificLocal,
}

impl CascadeRole {
    pub const ALL: [CascadeRole; 5] = [
        CascadeRole::Defaults,
        CascadeRole::Base,
        CascadeRole::Local,
        CascadeRole::EnvSpecific,
        CascadeRole::EnvSpecificLocal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeRole::Defaults => "defaults",
            CascadeRole::Base => "base",
            CascadeRole::Local => "local",
            CascadeRole::EnvSpecific => "env-specific",
            CascadeRole::EnvSpecificLocal => "env-specific-local",
        }
    }
}

/// An existing cascade file together with the role it was selected for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeFile {
    pub role: CascadeRole,
    pub path: PathBuf,
}

/// Options for [`crate::cascade::config`] and the other loader entry points.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub(crate) env_name: Option<String>,
    pub(crate) default_env_name: Option<String>,
    pub(crate) env_var: String,
    pub(crate) path: Option<PathBuf>,
    pub(crate) pattern: Option<String>,
    pub(crate) files: Option<Vec<PathBuf>>,
    pub(crate) encoding: Option<String>,
    pub(crate) purge_dotenv: bool,
    pub(crate) silent: bool,
    pub(crate) merge: MergeConfig,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            env_name: None,
            default_env_name: None,
            env_var: DEFAULT_ENV_VAR.to_string(),
            path: None,
            pattern: None,
            files: None,
            encoding: None,
            purge_dotenv: false,
            silent: false,
            merge: MergeConfig::default(),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit environment name (development/test/production/...).
    pub fn env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into());
        self
    }

    /// Environment name used when neither the option nor the store variable is set.
    pub fn default_env_name(mut self, name: impl Into<String>) -> Self {
        self.default_env_name = Some(name.into());
        self
    }

    /// Name of the store variable holding the environment name.
    pub fn env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    /// Directory the cascade files are looked up in.
    pub fn path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.path = Some(dir.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Explicit file list; environment name and pattern are ignored when set.
    pub fn files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Revert a previously loaded plain `.env` before loading the cascade.
    pub fn purge_dotenv(mut self, purge: bool) -> Self {
        self.purge_dotenv = purge;
        self
    }

    /// Suppress warnings; errors are still returned.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn merge_config(mut self, config: MergeConfig) -> Self {
        self.merge = config;
        self
    }

    pub fn working_dir(&self) -> PathBuf {
        match &self.path {
            Some(path) => absolutize(path),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn effective_pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

/// Make `path` absolute against the current directory without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
