use std::collections::HashSet;

use super::value::Value;

/// Keys that never resolve, whatever the context holds.
pub const DEFAULT_UNSAFE_KEYS: [&str; 3] = ["constructor", "__proto__", "prototype"];

/// Resolves dotted paths against a render context.
#[derive(Debug, Clone)]
pub struct PathResolver {
    denylist: HashSet<String>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_UNSAFE_KEYS)
    }
}

impl PathResolver {
    /// Denies `unsafe_keys` on top of [`DEFAULT_UNSAFE_KEYS`], which are
    /// always denied.
    pub fn new<S: Into<String>>(unsafe_keys: impl IntoIterator<Item = S>) -> Self {
        let mut denylist: HashSet<String> = DEFAULT_UNSAFE_KEYS.iter().map(|k| k.to_string()).collect();
        denylist.extend(unsafe_keys.into_iter().map(Into::into));
        Self { denylist }
    }

    pub fn is_unsafe(&self, key: &str) -> bool {
        self.denylist.contains(key)
    }

    /// Walks `segments` from `context`. Returns `Value::Undefined` as soon as
    /// a segment is denied, missing, or reached through a non-object.
    pub fn resolve(&self, context: &Value, segments: &[String]) -> Value {
        let mut current = context;
        for segment in segments {
            if self.is_unsafe(segment) {
                tracing::trace!(segment = %segment, "refusing unsafe path segment");
                return Value::Undefined;
            }
            match current.get(segment) {
                Some(value) => current = value,
                None => return Value::Undefined,
            }
        }
        current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segments(path: &str) -> Vec<String> {
        path.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_resolve_nested() {
        let context = Value::from(json!({ "foo": { "bar": { "baz": "Hi" } } }));
        let resolver = PathResolver::default();
        assert_eq!(
            resolver.resolve(&context, &segments("foo.bar.baz")),
            Value::from("Hi")
        );
        assert_eq!(
            resolver.resolve(&context, &segments("foo.bar")),
            Value::from(json!({ "baz": "Hi" }))
        );
        assert_eq!(resolver.resolve(&context, &[]), context);
    }

    #[test]
    fn test_missing_and_non_object() {
        let context = Value::from(json!({ "foo": "text", "list": [1, 2] }));
        let resolver = PathResolver::default();
        assert_eq!(resolver.resolve(&context, &segments("nope")), Value::Undefined);
        assert_eq!(
            resolver.resolve(&context, &segments("foo.length")),
            Value::Undefined
        );
        assert_eq!(
            resolver.resolve(&context, &segments("list.0")),
            Value::Undefined
        );
        assert_eq!(resolver.resolve(&Value::Null, &segments("a")), Value::Undefined);
    }

    #[test]
    fn test_unsafe_keys_never_resolve() {
        let context = Value::from(json!({
            "constructor": "own",
            "a": { "__proto__": { "x": 1 }, "prototype": 2 }
        }));
        let resolver = PathResolver::default();
        assert_eq!(
            resolver.resolve(&context, &segments("constructor")),
            Value::Undefined
        );
        assert_eq!(
            resolver.resolve(&context, &segments("a.__proto__.x")),
            Value::Undefined
        );
        assert_eq!(
            resolver.resolve(&context, &segments("a.prototype")),
            Value::Undefined
        );
    }

    #[test]
    fn test_custom_denylist() {
        let context = Value::from(json!({ "secret": 1, "constructor": 2, "public": 3 }));
        let resolver = PathResolver::new(["secret"]);
        assert_eq!(resolver.resolve(&context, &segments("secret")), Value::Undefined);
        assert_eq!(resolver.resolve(&context, &segments("public")), Value::from(3));
    }

    #[test]
    fn test_defaults_stay_denied() {
        let context = Value::from(json!({ "constructor": 1, "__proto__": 2, "prototype": 3 }));
        for resolver in [PathResolver::new(["secret"]), PathResolver::new(Vec::<String>::new())] {
            for key in DEFAULT_UNSAFE_KEYS {
                assert_eq!(resolver.resolve(&context, &segments(key)), Value::Undefined);
            }
        }
    }
}
