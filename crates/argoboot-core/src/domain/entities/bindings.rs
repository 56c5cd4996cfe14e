//! Template bindings.

use serde::Serialize;
use serde_json::{Map, Value};

/// Values handed to the template renderer.
///
/// A **Value Object**: builder-style `with` returns a new instance, so the
/// bindings for one manifest cannot leak into the next.
///
/// Nested objects are addressed with dotted names (`app.name`). A `null`
/// value is treated exactly like an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bindings(Map<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a top-level binding.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Add `key` only when `value` is `Some`.
    pub fn with_optional<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Resolve a dotted path. `None` for missing keys and for `null`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.').map(str::trim);
        let first = parts.next()?;
        let mut current = self.0.get(first)?;

        for part in parts {
            current = current.as_object()?.get(part)?;
        }

        (!current.is_null()).then_some(current)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dotted_lookup_walks_objects() {
        let b = Bindings::new().with("app", json!({ "name": "svc", "meta": { "tier": 2 } }));
        assert_eq!(b.lookup("app.name"), Some(&json!("svc")));
        assert_eq!(b.lookup("app.meta.tier"), Some(&json!(2)));
        assert_eq!(b.lookup("app.missing"), None);
        assert_eq!(b.lookup("app.name.deeper"), None);
    }

    #[test]
    fn null_counts_as_absent() {
        let b = Bindings::new().with("deploy_plugin", Value::Null);
        assert_eq!(b.lookup("deploy_plugin"), None);
    }

    #[test]
    fn with_optional_skips_none() {
        let b = Bindings::new()
            .with_optional("a", Some("x"))
            .with_optional::<&str>("b", None);
        assert_eq!(b.keys().collect::<Vec<_>>(), ["a"]);
    }
}
