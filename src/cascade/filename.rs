//! Naming patterns and cascade file discovery
//!
//! A pattern such as `.env[.node_env][.local]` holds optional bracketed
//! segments. The `local` segment is kept for local override files; the
//! `node_env` segment is kept (with the token replaced) for environment
//! specific files. Inactive segments are dropped entirely.

use crate::domain::{
    absolutize, CascadeFile, CascadeRole, DEFAULT_PATTERN, LEGACY_DEFAULTS_FILE, TEST_ENV_NAME,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

static LOCAL_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\W*\blocal\b\W*)\]").expect("valid regex"));

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\W*\b)node_env(\b\W*)\]").expect("valid regex"));

/// Which placeholders are active for one expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeFlags<'a> {
    pub local: bool,
    pub env_name: Option<&'a str>,
}

pub fn compose_filename(pattern: &str, flags: ComposeFlags<'_>) -> String {
    let local = if flags.local { "${1}" } else { "" };
    let filename = LOCAL_PLACEHOLDER.replace_all(pattern, local);

    let env_name = flags.env_name.filter(|name| !name.is_empty());
    ENV_PLACEHOLDER
        .replace_all(&filename, |caps: &Captures<'_>| match env_name {
            Some(name) => format!("{}{}{}", &caps[1], name, &caps[2]),
            None => String::new(),
        })
        .into_owned()
}

pub fn has_local_placeholder(pattern: &str) -> bool {
    LOCAL_PLACEHOLDER.is_match(pattern)
}

pub fn has_env_placeholder(pattern: &str) -> bool {
    ENV_PLACEHOLDER.is_match(pattern)
}

/// The pattern as shown in error messages: `node_env` replaced by the env
/// name but brackets kept, e.g. `.env[.development][.local]`.
pub fn describe_pattern(pattern: &str, env_name: Option<&str>) -> String {
    match env_name.filter(|name| !name.is_empty()) {
        Some(name) => ENV_PLACEHOLDER
            .replace_all(pattern, |caps: &Captures<'_>| {
                format!("[{}{}{}]", &caps[1], name, &caps[2])
            })
            .into_owned(),
        None => pattern.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub env_name: Option<String>,
    pub path: Option<PathBuf>,
    pub pattern: Option<String>,
}

impl ListOptions {
    fn working_dir(&self) -> PathBuf {
        match &self.path {
            Some(path) => absolutize(path),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Candidate filenames per role, in ascending priority, before any
/// existence check.
pub fn candidate_filenames(pattern: &str, env_name: Option<&str>) -> Vec<(CascadeRole, String)> {
    let env_name = env_name.filter(|name| !name.is_empty());
    let has_local = has_local_placeholder(pattern);
    let mut candidates = Vec::with_capacity(CascadeRole::ALL.len());

    if pattern == DEFAULT_PATTERN {
        candidates.push((CascadeRole::Defaults, LEGACY_DEFAULTS_FILE.to_string()));
    }

    candidates.push((CascadeRole::Base, compose_filename(pattern, ComposeFlags::default())));

    if has_local && env_name != Some(TEST_ENV_NAME) {
        let flags = ComposeFlags { local: true, env_name: None };
        candidates.push((CascadeRole::Local, compose_filename(pattern, flags)));
    }

    if let Some(name) = env_name {
        if has_env_placeholder(pattern) {
            let flags = ComposeFlags { local: false, env_name: Some(name) };
            candidates.push((CascadeRole::EnvSpecific, compose_filename(pattern, flags)));

            if has_local {
                let flags = ComposeFlags { local: true, env_name: Some(name) };
                candidates.push((CascadeRole::EnvSpecificLocal, compose_filename(pattern, flags)));
            }
        }
    }

    candidates
}

/// Existing cascade files with their roles, lowest priority first.
pub fn list_cascade(options: &ListOptions) -> Vec<CascadeFile> {
    tracing::debug!("listing effective `.env*` files...");

    let dir = options.working_dir();
    let pattern = options.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
    let env_name = options.env_name.as_deref();

    if env_name == Some(TEST_ENV_NAME) && has_local_placeholder(pattern) {
        let local = compose_filename(pattern, ComposeFlags { local: true, env_name: None });
        if dir.join(&local).is_file() {
            tracing::debug!("[!] note that `{}` is being skipped for \"test\" environment", local);
        }
    }

    candidate_filenames(pattern, env_name)
        .into_iter()
        .filter_map(|(role, filename)| {
            let path = dir.join(filename);
            if !exists(&path) {
                return None;
            }
            tracing::debug!(">> {} ({})", path.display(), role.as_str());
            Some(CascadeFile { role, path })
        })
        .collect()
}

/// Existing cascade file paths, lowest priority first.
pub fn list_files(options: &ListOptions) -> Vec<PathBuf> {
    list_cascade(options).into_iter().map(|file| file.path).collect()
}

pub(crate) fn exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "X=1\n").expect("write");
    }

    fn options(dir: &Path, env_name: Option<&str>, pattern: Option<&str>) -> ListOptions {
        ListOptions {
            env_name: env_name.map(str::to_string),
            path: Some(dir.to_path_buf()),
            pattern: pattern.map(str::to_string),
        }
    }

    fn names(dir: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(dir).expect("inside dir").to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_compose_strips_inactive_segments() {
        assert_eq!(compose_filename(DEFAULT_PATTERN, ComposeFlags::default()), ".env");
        let local = ComposeFlags { local: true, env_name: None };
        assert_eq!(compose_filename(DEFAULT_PATTERN, local), ".env.local");
    }

    #[test]
    fn test_compose_substitutes_env_name() {
        let flags = ComposeFlags { local: false, env_name: Some("production") };
        assert_eq!(compose_filename(DEFAULT_PATTERN, flags), ".env.production");
        let flags = ComposeFlags { local: true, env_name: Some("production") };
        assert_eq!(compose_filename(DEFAULT_PATTERN, flags), ".env.production.local");
    }

    #[test]
    fn test_compose_handles_custom_layouts() {
        let pattern = "config/[local/].env[.node_env]";
        let flags = ComposeFlags { local: true, env_name: Some("dev") };
        assert_eq!(compose_filename(pattern, flags), "config/local/.env.dev");
        assert_eq!(compose_filename(pattern, ComposeFlags::default()), "config/.env");
    }

    #[test]
    fn test_compose_treats_empty_env_name_as_unset() {
        let flags = ComposeFlags { local: false, env_name: Some("") };
        assert_eq!(compose_filename(DEFAULT_PATTERN, flags), ".env");
    }

    #[test]
    fn test_describe_pattern_keeps_brackets() {
        assert_eq!(
            describe_pattern(DEFAULT_PATTERN, Some("development")),
            ".env[.development][.local]"
        );
        assert_eq!(
            describe_pattern("config/[local/].env[.node_env]", Some("development")),
            "config/[local/].env[.development]"
        );
        assert_eq!(describe_pattern(DEFAULT_PATTERN, None), DEFAULT_PATTERN);
    }

    #[test]
    fn test_lists_in_ascending_priority() {
        let tmp = TempDir::new().expect("tmp");
        let names_on_disk =
            [".env.development.local", ".env.local", ".env", ".env.development", ".env.defaults"];
        for name in names_on_disk {
            touch(tmp.path(), name);
        }

        let files = list_files(&options(tmp.path(), Some("development"), None));
        assert_eq!(
            names(tmp.path(), &files),
            [".env.defaults", ".env", ".env.local", ".env.development", ".env.development.local"]
        );
    }

    #[test]
    fn test_missing_files_are_skipped_not_reordered() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), ".env.production.local");
        touch(tmp.path(), ".env");

        let files = list_files(&options(tmp.path(), Some("production"), None));
        assert_eq!(names(tmp.path(), &files), [".env", ".env.production.local"]);
    }

    #[test]
    fn test_default_options_list_base_and_local() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), ".env");
        touch(tmp.path(), ".env.local");
        touch(tmp.path(), ".env.development");

        let files = list_files(&options(tmp.path(), None, None));
        assert_eq!(names(tmp.path(), &files), [".env", ".env.local"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_env_named_test_skips_local_file() {
        let tmp = TempDir::new().expect("tmp");
        for name in [".env", ".env.local", ".env.test", ".env.test.local"] {
            touch(tmp.path(), name);
        }

        let files = list_files(&options(tmp.path(), Some("test"), None));
        assert_eq!(names(tmp.path(), &files), [".env", ".env.test", ".env.test.local"]);
    }

    #[test]
    fn test_pattern_without_env_placeholder_never_lists_env_files() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), "app.env");
        touch(tmp.path(), "app.env.local");

        let files = list_files(&options(tmp.path(), Some("staging"), Some("app.env[.local]")));
        assert_eq!(names(tmp.path(), &files), ["app.env", "app.env.local"]);
    }

    #[test]
    fn test_legacy_defaults_only_for_default_pattern() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), ".env.defaults");
        touch(tmp.path(), ".env");

        let files = list_files(&options(tmp.path(), None, Some(".env[.node_env]")));
        assert_eq!(names(tmp.path(), &files), [".env"]);
    }

    #[test]
    fn test_nested_pattern_layout() {
        let tmp = TempDir::new().expect("tmp");
        for name in [".env/env", ".env/local/env", ".env/env.test", ".env/local/env.test"] {
            touch(tmp.path(), name);
        }

        let pattern = Some(".env/[local/]env[.node_env]");
        let files = list_files(&options(tmp.path(), Some("test"), pattern));
        assert_eq!(names(tmp.path(), &files), [".env/env", ".env/env.test", ".env/local/env.test"]);

        let files = list_files(&options(tmp.path(), Some("development"), pattern));
        assert_eq!(names(tmp.path(), &files), [".env/env", ".env/local/env"]);
    }

    #[test]
    fn test_roles_are_reported() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), ".env");
        touch(tmp.path(), ".env.staging");

        let files = list_cascade(&options(tmp.path(), Some("staging"), None));
        let roles: Vec<CascadeRole> = files.iter().map(|f| f.role).collect();
        assert_eq!(roles, [CascadeRole::Base, CascadeRole::EnvSpecific]);
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let tmp = TempDir::new().expect("tmp");
        assert!(list_files(&options(tmp.path(), Some("development"), None)).is_empty());
    }
}
