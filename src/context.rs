//! The accumulating key/value store shared by every task of a run.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ContextError, MissingPrerequisiteError};

/// Everything produced so far during a seed run, keyed by name.
///
/// Task bodies read from a `&Context` and return a new, usually small,
/// `Context` holding only what they produced. The executor folds that partial
/// context into the run's store with [`Context::merge`].
///
/// ```rust
/// use seedflow::Context;
/// use serde_json::json;
///
/// let mut store = Context::new().with("roles", json!([{ "id": 1 }]));
/// store.merge(Context::new().with("roles", json!([{ "id": 1 }, { "id": 2 }])));
///
/// assert_eq!(store.get("roles"), Some(&json!([{ "id": 1 }, { "id": 2 }])));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: Map<String, Value>,
}

impl Context {
    /// Creates a new, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Context::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Writes `value` under `key`, replacing whatever was stored there.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Deserializes the value under `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ContextError> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| ContextError::NotFound(key.to_string()))?;

        T::deserialize(value).map_err(|source| ContextError::WrongShape {
            key: key.to_string(),
            source,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds a partial context produced by a task into this one.
    ///
    /// * keys not present yet are added,
    /// * when both sides hold arrays, incoming elements are appended unless an
    ///   element with the same identity is already there,
    /// * anything else is overwritten by the incoming value.
    ///
    /// Two objects that both carry an `"id"` field are the same element when
    /// the ids match. Any other pair is compared as a whole.
    pub fn merge(&mut self, partial: Context) {
        for (key, incoming) in partial.entries {
            let incoming = match (self.entries.get_mut(&key), incoming) {
                (Some(Value::Array(existing)), Value::Array(items)) => {
                    for item in items {
                        if !existing.iter().any(|known| same_identity(known, &item)) {
                            existing.push(item);
                        }
                    }
                    continue;
                }
                (_, incoming) => incoming,
            };

            self.entries.insert(key, incoming);
        }
    }

    /// Checks that every key in `keys` is present and non-empty.
    ///
    /// Null, empty strings, empty arrays and empty objects count as missing.
    /// The error lists exactly the keys that failed, in request order.
    pub fn require<I, S>(&self, keys: I, caller: &str) -> Result<(), MissingPrerequisiteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: Vec<String> = keys
            .into_iter()
            .filter(|key| self.entries.get(key.as_ref()).is_none_or(is_empty_value))
            .map(|key| key.as_ref().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingPrerequisiteError {
                missing,
                caller: caller.to_string(),
            })
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for Context {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn id_of(value: &Value) -> Option<&Value> {
    value.as_object().and_then(|map| map.get("id"))
}

/// Ids are compared only when both elements carry one.
fn same_identity(a: &Value, b: &Value) -> bool {
    match (id_of(a), id_of(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
