//! Loader options read from environment variables
//!
//! Precedence is CLI > environment > [`LoadOptions`] defaults. Each layer is
//! an [`OptionOverrides`]; layers are combined with [`OptionOverrides::or`]
//! and applied on top of a base `LoadOptions`.

use crate::domain::{LoadOptions, DEFAULT_ENV_VAR};
use crate::store::EnvStore;
use std::path::PathBuf;

pub const DEFAULT_ENV_NAME_VAR: &str = "DEFAULT_APP_ENV";
pub const PATH_VAR: &str = "ENVCASCADE_PATH";
pub const PATTERN_VAR: &str = "ENVCASCADE_PATTERN";
pub const ENCODING_VAR: &str = "ENVCASCADE_ENCODING";
pub const PURGE_DOTENV_VAR: &str = "ENVCASCADE_PURGE_DOTENV";
pub const DEBUG_VAR: &str = "ENVCASCADE_DEBUG";
pub const SILENT_VAR: &str = "ENVCASCADE_SILENT";

/// Optional values for every loader option; `None` means "not specified here".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub env_name: Option<String>,
    pub default_env_name: Option<String>,
    pub path: Option<PathBuf>,
    pub pattern: Option<String>,
    pub files: Option<Vec<PathBuf>>,
    pub encoding: Option<String>,
    pub purge_dotenv: Option<bool>,
    pub debug: Option<bool>,
    pub silent: Option<bool>,
}

impl OptionOverrides {
    /// Read overrides from `store`. Empty variables are treated as unset,
    /// except flags, where an empty value means `false`.
    pub fn from_env(store: &dyn EnvStore) -> Self {
        let text = |key: &str| store.get(key).filter(|value| !value.is_empty());
        let flag = |key: &str| store.get(key).map(|value| parse_flag(&value));

        Self {
            env_name: text(DEFAULT_ENV_VAR),
            default_env_name: text(DEFAULT_ENV_NAME_VAR),
            path: text(PATH_VAR).map(PathBuf::from),
            pattern: text(PATTERN_VAR),
            files: None,
            encoding: text(ENCODING_VAR),
            purge_dotenv: flag(PURGE_DOTENV_VAR),
            debug: flag(DEBUG_VAR),
            silent: flag(SILENT_VAR),
        }
    }

    /// Field-wise: values in `self` win, gaps are filled from `fallback`.
    pub fn or(self, fallback: OptionOverrides) -> Self {
        Self {
            env_name: self.env_name.or(fallback.env_name),
            default_env_name: self.default_env_name.or(fallback.default_env_name),
            path: self.path.or(fallback.path),
            pattern: self.pattern.or(fallback.pattern),
            files: self.files.or(fallback.files),
            encoding: self.encoding.or(fallback.encoding),
            purge_dotenv: self.purge_dotenv.or(fallback.purge_dotenv),
            debug: self.debug.or(fallback.debug),
            silent: self.silent.or(fallback.silent),
        }
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    pub fn apply(self, mut options: LoadOptions) -> LoadOptions {
        if let Some(name) = self.env_name {
            options = options.env_name(name);
        }
        if let Some(name) = self.default_env_name {
            options = options.default_env_name(name);
        }
        if let Some(path) = self.path {
            options = options.path(path);
        }
        if let Some(pattern) = self.pattern {
            options = options.pattern(pattern);
        }
        if let Some(files) = self.files {
            options = options.files(files);
        }
        if let Some(encoding) = self.encoding {
            options = options.encoding(encoding);
        }
        if let Some(purge) = self.purge_dotenv {
            options = options.purge_dotenv(purge);
        }
        if let Some(silent) = self.silent {
            options = options.silent(silent);
        }
        options
    }
}

/// `true` unless the value is empty, `0`, `false`, `no` or `off`.
pub fn parse_flag(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    !matches!(normalized.as_str(), "" | "0" | "false" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEnv;

    #[test]
    fn test_flags_parse_common_spellings() {
        for value in ["1", "true", "YES", "on", "anything"] {
            assert!(parse_flag(value), "{value} should be true");
        }
        for value in ["", "0", "false", "No", " OFF "] {
            assert!(!parse_flag(value), "{value:?} should be false");
        }
    }

    #[test]
    fn test_reads_known_variables() {
        let store: MemoryEnv = [
            ("APP_ENV", "production"),
            ("DEFAULT_APP_ENV", "development"),
            ("ENVCASCADE_PATH", "/srv/app"),
            ("ENVCASCADE_PATTERN", "config/.env[.node_env]"),
            ("ENVCASCADE_ENCODING", "latin1"),
            ("ENVCASCADE_PURGE_DOTENV", "1"),
            ("ENVCASCADE_SILENT", "off"),
        ]
        .into_iter()
        .collect();

        let overrides = OptionOverrides::from_env(&store);
        assert_eq!(overrides.env_name.as_deref(), Some("production"));
        assert_eq!(overrides.default_env_name.as_deref(), Some("development"));
        assert_eq!(overrides.path, Some(PathBuf::from("/srv/app")));
        assert_eq!(overrides.pattern.as_deref(), Some("config/.env[.node_env]"));
        assert_eq!(overrides.encoding.as_deref(), Some("latin1"));
        assert_eq!(overrides.purge_dotenv, Some(true));
        assert_eq!(overrides.silent, Some(false));
        assert_eq!(overrides.debug, None);
    }

    #[test]
    fn test_empty_text_variables_are_unset() {
        let store: MemoryEnv =
            [("ENVCASCADE_PATTERN", ""), ("ENVCASCADE_DEBUG", "")].into_iter().collect();
        let overrides = OptionOverrides::from_env(&store);
        assert_eq!(overrides.pattern, None);
        assert_eq!(overrides.debug, Some(false));
    }

    #[test]
    fn test_cli_layer_wins_over_env_layer() {
        let cli = OptionOverrides {
            env_name: Some("test".into()),
            silent: Some(true),
            ..OptionOverrides::default()
        };
        let env = OptionOverrides {
            env_name: Some("production".into()),
            pattern: Some("app.env[.local]".into()),
            silent: Some(false),
            ..OptionOverrides::default()
        };

        let merged = cli.or(env);
        assert_eq!(merged.env_name.as_deref(), Some("test"));
        assert_eq!(merged.pattern.as_deref(), Some("app.env[.local]"));
        assert_eq!(merged.silent, Some(true));
    }

    #[test]
    fn test_apply_keeps_defaults_for_gaps() {
        let overrides =
            OptionOverrides { pattern: Some("app.env".into()), ..OptionOverrides::default() };
        let options = overrides.apply(LoadOptions::new().encoding("utf-16le"));

        assert_eq!(options.effective_pattern(), "app.env");
        assert_eq!(options.encoding.as_deref(), Some("utf-16le"));
        assert_eq!(options.env_name, None);
        assert!(!options.is_silent());
    }
}
