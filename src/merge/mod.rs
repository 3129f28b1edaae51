//! Deep merge of JSON-like values
//!
//! Used to fold parsed env files together (later files override earlier ones)
//! and to combine the resolved map with a store snapshot on commit. Values own
//! their children, so `Value::clone` is already a deep clone.

use crate::domain::EnvMap;
use serde_json::{Map, Value};
use std::fmt;

/// Array merge strategy: receives the target's array (if the target held one)
/// and the source's array, returns the merged array.
pub type ArrayMerge = fn(Option<&[Value]>, &[Value]) -> Vec<Value>;

/// Knobs for [`Merger`]. The default replaces arrays wholesale and skips
/// `null` source values.
#[derive(Clone, Copy, Default)]
pub struct MergeConfig {
    pub array_merge: Option<ArrayMerge>,
    pub include_nulls: bool,
}

impl fmt::Debug for MergeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeConfig")
            .field("array_merge", &self.array_merge.map(|_| "custom"))
            .field("include_nulls", &self.include_nulls)
            .finish()
    }
}

impl MergeConfig {
    pub fn array_merge(mut self, strategy: ArrayMerge) -> Self {
        self.array_merge = Some(strategy);
        self
    }

    pub fn include_nulls(mut self, include: bool) -> Self {
        self.include_nulls = include;
        self
    }
}

/// Appends the source array to the target array.
pub fn concat_arrays(target: Option<&[Value]>, source: &[Value]) -> Vec<Value> {
    let mut merged = target.map(<[Value]>::to_vec).unwrap_or_default();
    merged.extend(source.iter().cloned());
    merged
}

/// Overwrite merge: on key collision the source value wins, nested objects
/// are merged recursively. Neither input is mutated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn merge(&self, target: &Value, source: &Value) -> Value {
        let target_map = match target {
            Value::Object(map) => Some(map),
            _ => None,
        };
        match source {
            Value::Object(source_map) => Value::Object(self.merge_objects(target_map, source_map)),
            _ => Value::Object(target_map.cloned().unwrap_or_default()),
        }
    }

    pub fn merge_maps(&self, target: &EnvMap, source: &EnvMap) -> EnvMap {
        self.merge_objects(Some(target), source)
    }

    fn merge_objects(
        &self,
        target: Option<&Map<String, Value>>,
        source: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut output = target.cloned().unwrap_or_default();

        for (key, source_value) in source {
            let target_value = target.and_then(|t| t.get(key));

            let merged = match source_value {
                Value::Null if !self.config.include_nulls => continue,
                Value::Array(source_items) => self.merge_arrays(target_value, source_items),
                Value::Object(source_map) => {
                    let nested = target_value.and_then(Value::as_object);
                    Value::Object(self.merge_objects(nested, source_map))
                }
                scalar => scalar.clone(),
            };
            output.insert(key.clone(), merged);
        }

        output
    }

    fn merge_arrays(&self, target: Option<&Value>, source: &[Value]) -> Value {
        match self.config.array_merge {
            Some(strategy) => {
                let target_items = target.and_then(Value::as_array).map(Vec::as_slice);
                Value::Array(strategy(target_items, source))
            }
            None => Value::Array(source.to_vec()),
        }
    }
}
