//! `$NAME` / `${NAME}` / `${NAME:-default}` substitution

use super::render;
use crate::domain::EnvMap;
use crate::error::{EnvError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

// Groups: 1 escape, 2 opening brace, 3 name, 4 default, 5 closing brace.
// Names are ASCII only, so `$NAMEé` is `$NAME` followed by `é`.
// Defaults may nest `${...}` up to three levels deep.
static SUBSTITUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(\\)?\$(\{?)([A-Za-z0-9_.]+)",
        r"(?::?-((?:\$\{(?:\$\{(?:\$\{[^}]*\}|[^}])*\}|[^}])*\}|[^}])+))?(\}?)",
    ))
    .expect("valid regex")
});

/// Expands references against an environment snapshot and the map being loaded.
pub struct Interpolator<'a> {
    env: &'a BTreeMap<String, String>,
    parsed: &'a EnvMap,
}

impl<'a> Interpolator<'a> {
    pub fn new(env: &'a BTreeMap<String, String>, parsed: &'a EnvMap) -> Self {
        Self { env, parsed }
    }

    /// Interpolate `raw`, the value of `key` (if it belongs to a key).
    ///
    /// Descending into a key that is already being expanded fails with
    /// [`EnvError::CyclicReference`].
    pub fn interpolate(&self, key: Option<&str>, raw: &str) -> Result<String> {
        let mut stack: Vec<String> = key.map(str::to_string).into_iter().collect();
        self.expand(raw, &mut stack)
    }

    fn expand(&self, value: &str, stack: &mut Vec<String>) -> Result<String> {
        let mut out = String::with_capacity(value.len());
        let mut last = 0;

        for captures in SUBSTITUTION.captures_iter(value) {
            let Some(whole) = captures.get(0) else { continue };
            out.push_str(&value[last..whole.start()]);
            last = whole.end();

            if captures.get(1).is_some() {
                out.push_str(&whole.as_str()[1..]);
                continue;
            }
            out.push_str(&self.substitute(value, &captures, stack)?);
        }

        out.push_str(&value[last..]);
        Ok(out)
    }

    fn substitute(
        &self,
        current: &str,
        captures: &Captures<'_>,
        stack: &mut Vec<String>,
    ) -> Result<String> {
        let name = &captures[3];
        let default = captures.get(4).map(|m| m.as_str()).filter(|d| !d.is_empty());

        if let Some(env_value) = self.env.get(name).filter(|v| !v.is_empty()) {
            // untouched shell value: nothing of ours to expand
            if self.parsed.get(name).and_then(|v| v.as_str()) == Some(env_value.as_str()) {
                return Ok(env_value.clone());
            }
            return self.descend(name, env_value, stack);
        }

        if let Some(parsed_value) = self.parsed.get(name).map(render).filter(|v| !v.is_empty()) {
            if parsed_value != current {
                return self.descend(name, &parsed_value, stack);
            }
        }

        match default {
            Some(default) if default.starts_with('$') => self.expand(default, stack),
            Some(default) => Ok(default.to_string()),
            None => Ok(String::new()),
        }
    }

    fn descend(&self, name: &str, value: &str, stack: &mut Vec<String>) -> Result<String> {
        if stack.iter().any(|key| key == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(EnvError::CyclicReference { chain });
        }
        stack.push(name.to_string());
        let expanded = self.expand(value, stack);
        stack.pop();
        expanded
    }
}
