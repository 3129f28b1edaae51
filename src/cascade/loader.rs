//! Cascade orchestration: select, parse, resolve and commit
//!
//! The store is written exactly once, after every file has been parsed and
//! every value resolved. Any error before that point leaves it untouched.

use super::filename::{describe_pattern, exists, list_cascade, list_files, ListOptions};
use crate::domain::{CascadeFile, EnvMap, LoadOptions, DOTENV_FILE};
use crate::error::{EnvError, Result};
use crate::merge::Merger;
use crate::parse::{parse_files, ParseOptions};
use crate::resolve::{render, resolve};
use crate::store::{EnvStore, MemoryEnv};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Environment name in effect: explicit option, then the store variable,
/// then the configured default. Empty values count as unset.
pub fn effective_env_name(options: &LoadOptions, store: &dyn EnvStore) -> Option<String> {
    if let Some(name) = options.env_name.as_deref().filter(|n| !n.is_empty()) {
        tracing::debug!("setting env name to \"{}\" from options", name);
        return Some(name.to_string());
    }

    if let Some(name) = store.get(&options.env_var).filter(|n| !n.is_empty()) {
        tracing::debug!("setting env name to \"{}\" from `{}`", name, options.env_var);
        return Some(name);
    }

    if let Some(name) = options.default_env_name.as_deref().filter(|n| !n.is_empty()) {
        tracing::debug!("`{}` is not set, falling back to default \"{}\"", options.env_var, name);
        return Some(name.to_string());
    }

    tracing::debug!("no environment name in effect");
    None
}

/// Load the cascade selected by `options` into `store`.
pub fn config(options: &LoadOptions, store: &mut dyn EnvStore) -> Result<EnvMap> {
    run_config(options, store).map_err(|e| report(e, options))
}

/// Load an explicit list of files into `store`. Pattern and environment
/// name options are not consulted.
pub fn load<P: AsRef<Path>>(
    files: &[P],
    options: &LoadOptions,
    store: &mut dyn EnvStore,
) -> Result<EnvMap> {
    let files: Vec<PathBuf> = files.iter().map(|p| p.as_ref().to_path_buf()).collect();
    let staged = Staged::of(store);
    commit_files(&dedupe(files), options, store, staged).map_err(|e| report(e, options))
}

/// Remove the variables `files` would have set.
///
/// Only keys whose current store value equals the parsed raw value are
/// removed, so calling this twice is the same as calling it once.
pub fn unload<P: AsRef<Path>>(
    files: &[P],
    options: &LoadOptions,
    store: &mut dyn EnvStore,
) -> Result<()> {
    let parsed = parse_files(files, &parse_options(options)).map_err(|e| report(e, options))?;

    for key in loaded_keys(&parsed, &store.snapshot()) {
        tracing::debug!("unsetting `{}`", key);
        store.remove(&key);
    }
    Ok(())
}

/// Pattern-driven cascade `config` would load, without reading any file.
pub fn planned_cascade(options: &LoadOptions, store: &dyn EnvStore) -> Vec<CascadeFile> {
    let env_name = effective_env_name(options, store);
    list_cascade(&list_options(options, env_name))
}

/// Store contents a load resolves against, plus the removals it applies on commit.
struct Staged {
    snapshot: BTreeMap<String, String>,
    removals: Vec<String>,
}

impl Staged {
    fn of(store: &dyn EnvStore) -> Self {
        Self { snapshot: store.snapshot(), removals: Vec::new() }
    }

    fn remove(&mut self, keys: Vec<String>) {
        for key in keys {
            if self.snapshot.remove(&key).is_some() {
                self.removals.push(key);
            }
        }
    }

    fn view(&self) -> MemoryEnv {
        MemoryEnv::from(self.snapshot.clone())
    }
}

/// Keys of `parsed` whose value in `env` is still the parsed raw value.
fn loaded_keys(parsed: &EnvMap, env: &BTreeMap<String, String>) -> Vec<String> {
    parsed
        .iter()
        .filter(|(key, value)| env.get(key.as_str()) == Some(&render(value)))
        .map(|(key, _)| key.clone())
        .collect()
}

fn list_options(options: &LoadOptions, env_name: Option<String>) -> ListOptions {
    ListOptions { env_name, path: Some(options.working_dir()), pattern: options.pattern.clone() }
}

fn run_config(options: &LoadOptions, store: &mut dyn EnvStore) -> Result<EnvMap> {
    tracing::debug!("initializing...");
    let dir = options.working_dir();
    let mut staged = Staged::of(store);

    if options.purge_dotenv {
        purge_dotenv(&dir, options, &mut staged);
    }

    let files = match &options.files {
        Some(files) => {
            tracing::debug!("using explicit file list, `env_name` and `pattern` are ignored");
            explicit_files(files, &dir)
        }
        None => {
            let env_name = effective_env_name(options, &staged.view());
            let files = list_files(&list_options(options, env_name.clone()));
            if files.is_empty() {
                return Err(EnvError::NoMatchingFiles {
                    pattern: describe_pattern(options.effective_pattern(), env_name.as_deref()),
                    dir,
                });
            }
            files
        }
    };

    commit_files(&dedupe(files), options, store, staged)
}

/// Stage the removal of whatever a previous load of `<dir>/.env` set.
fn purge_dotenv(dir: &Path, options: &LoadOptions, staged: &mut Staged) {
    let dotenv = dir.join(DOTENV_FILE);
    if !exists(&dotenv) {
        return;
    }
    tracing::debug!("`purge_dotenv` enabled, unloading `{}` file...", DOTENV_FILE);

    match parse_files(&[&dotenv], &parse_options(options)) {
        Ok(parsed) => {
            let keys = loaded_keys(&parsed, &staged.snapshot);
            staged.remove(keys);
        }
        Err(e) if !options.silent => {
            tracing::warn!("unloading failed: {}", e);
        }
        Err(_) => {}
    }
}

fn explicit_files(files: &[PathBuf], dir: &Path) -> Vec<PathBuf> {
    files
        .iter()
        .map(|file| if file.is_absolute() { file.clone() } else { dir.join(file) })
        .filter(|path| {
            let found = exists(path);
            if !found {
                tracing::debug!("skipping missing file \"{}\"", path.display());
            }
            found
        })
        .collect()
}

fn dedupe(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files.into_iter().filter(|path| seen.insert(path.clone())).collect()
}

fn parse_options(options: &LoadOptions) -> ParseOptions {
    ParseOptions { encoding: options.encoding.clone(), merge: options.merge }
}

fn commit_files(
    files: &[PathBuf],
    options: &LoadOptions,
    store: &mut dyn EnvStore,
    staged: Staged,
) -> Result<EnvMap> {
    tracing::debug!("loading {} file(s)...", files.len());
    let mut parsed = parse_files(files, &parse_options(options))?;
    let Staged { snapshot, removals } = staged;

    resolve_in_place(&mut parsed, &snapshot)?;

    let rendered: EnvMap =
        parsed.iter().map(|(key, value)| (key.clone(), Value::String(render(value)))).collect();
    let shell: EnvMap =
        snapshot.iter().map(|(key, value)| (key.clone(), Value::String(value.clone()))).collect();
    let committed = Merger::new(options.merge).merge_maps(&rendered, &shell);

    for key in &removals {
        tracing::debug!("unsetting `{}`", key);
        store.remove(key);
    }
    for (key, value) in &committed {
        if snapshot.contains_key(key) || store.contains(key) {
            continue;
        }
        store.set(key, &render(value));
    }

    Ok(parsed)
}

/// Replace each raw value not shadowed by the store with its resolved value.
fn resolve_in_place(parsed: &mut EnvMap, snapshot: &BTreeMap<String, String>) -> Result<()> {
    let keys: Vec<String> = parsed.keys().cloned().collect();

    for key in keys {
        let raw = parsed.get(&key).map(render).unwrap_or_default();
        if let Some(current) = snapshot.get(&key) {
            if *current != raw {
                tracing::debug!("`{}` is predefined and not being overwritten", key);
            }
            continue;
        }
        let resolved = resolve(&key, &raw, snapshot, parsed)?;
        parsed.insert(key, resolved);
    }
    Ok(())
}

fn report(error: EnvError, options: &LoadOptions) -> EnvError {
    if !options.silent {
        tracing::warn!("\".env*\" files loading failed: {}", error);
    }
    error
}
