//! Function references — typed names of remote queries and mutations.
//!
//! A [`FunctionReference`] carries the canonical `module:function` path of a
//! Convex function plus a zero-sized marker for its kind, so a query reference
//! cannot be handed to a mutation call by accident. Plain strings are resolved
//! through [`IntoFunctionReference`]; already-resolved references pass through
//! unchanged.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Runtime tag for the kind of a function reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionType {
    Query,
    Mutation,
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionType::Query => f.write_str("query"),
            FunctionType::Mutation => f.write_str("mutation"),
        }
    }
}

/// Type-level marker implemented by [`Query`] and [`Mutation`].
pub trait FunctionKind: Send + Sync + 'static {
    const TYPE: FunctionType;
}

/// Marker for query references.
#[derive(Debug)]
pub enum Query {}

/// Marker for mutation references.
#[derive(Debug)]
pub enum Mutation {}

impl FunctionKind for Query {
    const TYPE: FunctionType = FunctionType::Query;
}

impl FunctionKind for Mutation {
    const TYPE: FunctionType = FunctionType::Mutation;
}

/// A resolved reference to a remote function of kind `K`.
pub struct FunctionReference<K> {
    path: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K: FunctionKind> FunctionReference<K> {
    /// Resolve `name` into a canonical reference.
    ///
    /// `"messages"` becomes `"messages:default"`, `"messages.js:list"`
    /// becomes `"messages:list"`. Resolution is pure.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            path: canonicalize(name.as_ref()),
            _kind: PhantomData,
        }
    }

    /// The canonical `module:function` path.
    pub fn name(&self) -> &str {
        &self.path
    }

    /// The module part of the path (may contain `/` for nested modules).
    pub fn module_path(&self) -> &str {
        self.path
            .rsplit_once(':')
            .map(|(module, _)| module)
            .unwrap_or(&self.path)
    }

    /// The exported function name within its module.
    pub fn function_name(&self) -> &str {
        self.path
            .rsplit_once(':')
            .map(|(_, function)| function)
            .unwrap_or("default")
    }

    pub fn kind(&self) -> FunctionType {
        K::TYPE
    }
}

fn canonicalize(name: &str) -> String {
    let name = name.trim();
    let (module, function) = match name.rsplit_once(':') {
        Some((module, function)) => (module, function),
        None => (name, "default"),
    };
    let module = module.strip_suffix(".js").unwrap_or(module);
    format!("{module}:{function}")
}

impl<K> Clone for FunctionReference<K> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> PartialEq for FunctionReference<K> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<K> Eq for FunctionReference<K> {}

impl<K> Hash for FunctionReference<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl<K: FunctionKind> fmt::Debug for FunctionReference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionReference")
            .field("kind", &K::TYPE)
            .field("path", &self.path)
            .finish()
    }
}

impl<K> fmt::Display for FunctionReference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl<K: FunctionKind> FromStr for FunctionReference<K> {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl<K> Serialize for FunctionReference<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path)
    }
}

impl<'de, K: FunctionKind> Deserialize<'de> for FunctionReference<K> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(name))
    }
}

/// Anything that names a remote function: a string or an already-resolved
/// reference.
pub trait IntoFunctionReference<K> {
    fn into_function_reference(self) -> FunctionReference<K>;
}

impl<K: FunctionKind> IntoFunctionReference<K> for FunctionReference<K> {
    fn into_function_reference(self) -> FunctionReference<K> {
        self
    }
}

impl<K: FunctionKind> IntoFunctionReference<K> for &FunctionReference<K> {
    fn into_function_reference(self) -> FunctionReference<K> {
        self.clone()
    }
}

impl<K: FunctionKind> IntoFunctionReference<K> for &str {
    fn into_function_reference(self) -> FunctionReference<K> {
        FunctionReference::new(self)
    }
}

impl<K: FunctionKind> IntoFunctionReference<K> for String {
    fn into_function_reference(self) -> FunctionReference<K> {
        FunctionReference::new(self)
    }
}

impl<K: FunctionKind> IntoFunctionReference<K> for &String {
    fn into_function_reference(self) -> FunctionReference<K> {
        FunctionReference::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve<K: FunctionKind>(name: impl IntoFunctionReference<K>) -> FunctionReference<K> {
        name.into_function_reference()
    }

    #[test]
    fn test_string_resolves_to_same_reference() {
        let resolved = FunctionReference::<Query>::new("messages:list");
        let from_str: FunctionReference<Query> = resolve("messages:list");
        let from_ref: FunctionReference<Query> = resolve(&resolved);
        assert_eq!(from_str, resolved);
        assert_eq!(from_ref, resolved);
    }

    #[test]
    fn test_missing_function_defaults() {
        let r = FunctionReference::<Query>::new("messages");
        assert_eq!(r.name(), "messages:default");
        assert_eq!(r.module_path(), "messages");
        assert_eq!(r.function_name(), "default");
    }

    #[test]
    fn test_js_suffix_and_whitespace_stripped() {
        let r = FunctionReference::<Mutation>::new("  chat/messages.js:send ");
        assert_eq!(r.name(), "chat/messages:send");
        assert_eq!(r.module_path(), "chat/messages");
        assert_eq!(r.function_name(), "send");
    }

    #[test]
    fn test_already_canonical_is_unchanged() {
        let r = FunctionReference::<Query>::new("a/b:c");
        assert_eq!(FunctionReference::<Query>::new(r.name()), r);
    }

    #[test]
    fn test_kind_tag() {
        assert_eq!(FunctionReference::<Query>::new("x:y").kind(), FunctionType::Query);
        assert_eq!(
            FunctionReference::<Mutation>::new("x:y").kind(),
            FunctionType::Mutation
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let r = FunctionReference::<Query>::new("messages");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"messages:default\"");
        let back: FunctionReference<Query> = serde_json::from_str("\"messages.js\"").unwrap();
        assert_eq!(back, r);
    }
}
