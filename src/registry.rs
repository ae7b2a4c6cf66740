use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::errors::HelperError;

/// A helper callable: positional dynamic arguments in, one value out
pub type HelperFn = Arc<dyn Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("helper not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Helper(#[from] HelperError),
}

/// Registry mapping template names to helper callables
///
/// A `FuncMap` is an ordinary value owned by the caller. Extending the
/// catalog means building another map and merging it in; on a name
/// conflict the entry merged last wins.
#[derive(Clone, Default)]
pub struct FuncMap {
    funcs: BTreeMap<String, HelperFn>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name`, returning the entry it replaced
    pub fn insert(&mut self, name: impl Into<String>, func: HelperFn) -> Option<HelperFn> {
        self.funcs.insert(name.into(), func)
    }

    /// Register a closure under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> Option<HelperFn>
    where
        F: Fn(&[Value]) -> Result<Value, HelperError> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(func))
    }

    /// Merge `other` into this map; entries from `other` win on conflict
    pub fn merge(&mut self, other: FuncMap) {
        for (name, func) in other.funcs {
            if self.funcs.insert(name.clone(), func).is_some() {
                tracing::debug!(helper = %name, "Helper overridden by merge");
            }
        }
    }

    pub fn merged(mut self, other: FuncMap) -> Self {
        self.merge(other);
        self
    }

    pub fn get(&self, name: &str) -> Option<&HelperFn> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Helper names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.funcs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HelperFn)> {
        self.funcs.iter().map(|(name, func)| (name.as_str(), func))
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Invoke a helper by name, the way a template engine would
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RegistryError> {
        let func = self
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(func(args)?)
    }
}

impl fmt::Debug for FuncMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.funcs.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constant(value: &'static str) -> HelperFn {
        Arc::new(move |_| Ok(json!(value)))
    }

    #[test]
    fn test_register_and_call() {
        let mut funcs = FuncMap::new();
        funcs.register("hello", |_| Ok(json!("Hello, World!")));

        assert!(funcs.contains("hello"));
        assert_eq!(funcs.call("hello", &[]).unwrap(), json!("Hello, World!"));
    }

    #[test]
    fn test_call_unknown_helper() {
        let funcs = FuncMap::new();
        assert!(matches!(
            funcs.call("missing", &[]),
            Err(RegistryError::NotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_call_propagates_helper_error() {
        let mut funcs = FuncMap::new();
        funcs.register("fail", |_| Err(HelperError::message("bad input")));

        let err = funcs.call("fail", &[]).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut base = FuncMap::new();
        base.insert("greet", constant("base"));
        base.insert("only_base", constant("kept"));

        let mut extension = FuncMap::new();
        extension.insert("greet", constant("extension"));
        extension.insert("only_extension", constant("added"));

        base.merge(extension);

        assert_eq!(base.len(), 3);
        assert_eq!(base.call("greet", &[]).unwrap(), json!("extension"));
        assert_eq!(base.call("only_base", &[]).unwrap(), json!("kept"));
        assert_eq!(base.call("only_extension", &[]).unwrap(), json!("added"));
    }

    #[test]
    fn test_merge_order_decides_conflicts() {
        let mut first = FuncMap::new();
        first.insert("name", constant("first"));
        let mut second = FuncMap::new();
        second.insert("name", constant("second"));

        let a = first.clone().merged(second.clone());
        let b = second.merged(first);

        assert_eq!(a.call("name", &[]).unwrap(), json!("second"));
        assert_eq!(b.call("name", &[]).unwrap(), json!("first"));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut funcs = FuncMap::new();
        funcs.insert("b", constant("b"));
        funcs.insert("a", constant("a"));
        funcs.insert("c", constant("c"));

        assert_eq!(funcs.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(format!("{:?}", funcs), r#"{"a", "b", "c"}"#);
    }
}
