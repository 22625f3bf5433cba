use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use super::value::Value;

pub type HelperResult = Result<Value, HelperError>;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("{0}")]
    Message(String),
    #[error("invalid argument for `{helper}`: {message}")]
    InvalidArgument { helper: String, message: String },
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HelperError {
    pub fn message<S: Into<String>>(message: S) -> Self {
        HelperError::Message(message.into())
    }

    pub fn invalid_argument<S: Into<String>>(helper: &str, message: S) -> Self {
        HelperError::InvalidArgument {
            helper: helper.to_string(),
            message: message.into(),
        }
    }
}

/// A named function callable from templates.
///
/// Helpers receive their arguments already evaluated, left to right, and may
/// suspend; the render waits for the result before moving on.
#[async_trait]
pub trait Helper: Send + Sync {
    async fn call(&self, arguments: Vec<Value>) -> HelperResult;
}

/// Adapts an async closure into a [`Helper`].
pub struct FnHelper<F>(pub F);

#[async_trait]
impl<F, Fut> Helper for FnHelper<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HelperResult> + Send + 'static,
{
    async fn call(&self, arguments: Vec<Value>) -> HelperResult {
        (self.0)(arguments).await
    }
}

/// Adapts a plain closure into a [`Helper`].
pub struct SyncFnHelper<F>(pub F);

#[async_trait]
impl<F> Helper for SyncFnHelper<F>
where
    F: Fn(Vec<Value>) -> HelperResult + Send + Sync + 'static,
{
    async fn call(&self, arguments: Vec<Value>) -> HelperResult {
        (self.0)(arguments)
    }
}

/// Name to helper map shared by an engine and every template it compiled.
///
/// Lookups happen when a helper is invoked, so registrations made after
/// compiling a template are visible to it.
#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: Arc<DashMap<String, Arc<dyn Helper>>>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, helper: Arc<dyn Helper>) {
        let name = name.into();
        if self.helpers.insert(name.clone(), helper).is_some() {
            tracing::warn!(helper = %name, "helper replaced");
        } else {
            tracing::debug!(helper = %name, "helper registered");
        }
    }

    pub fn remove(&self, name: &str) -> bool {
        self.helpers.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Helper>> {
        self.helpers.get(name).map(|entry| entry.value().clone())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.helpers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperRegistry")
            .field("helpers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_helpers() {
        let registry = HelperRegistry::new();
        registry.register(
            "first",
            Arc::new(FnHelper(|args: Vec<Value>| async move {
                Ok::<_, HelperError>(args.into_iter().next().unwrap_or_default())
            })),
        );
        registry.register(
            "count",
            Arc::new(SyncFnHelper(|args: Vec<Value>| -> HelperResult {
                Ok(Value::from(args.len()))
            })),
        );

        let first = registry.get("first").unwrap();
        assert_eq!(
            first.call(vec![Value::from("a"), Value::from("b")]).await.unwrap(),
            Value::from("a")
        );
        let count = registry.get("count").unwrap();
        assert_eq!(count.call(vec![Value::Null; 3]).await.unwrap(), Value::from(3));
    }

    #[tokio::test]
    async fn test_replace_and_remove() {
        let registry = HelperRegistry::new();
        let shared = registry.clone();
        let constant = |n: i32| {
            Arc::new(SyncFnHelper(move |_: Vec<Value>| -> HelperResult {
                Ok(Value::from(n))
            }))
        };
        registry.register("x", constant(1));
        shared.register("x", constant(2));

        let helper = registry.get("x").unwrap();
        assert_eq!(helper.call(vec![]).await.unwrap(), Value::from(2));
        assert_eq!(registry.names(), vec!["x".to_string()]);

        assert!(registry.remove("x"));
        assert!(!shared.contains("x"));
        assert!(!registry.remove("x"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(HelperError::message("boom").to_string(), "boom");
        assert_eq!(
            HelperError::invalid_argument("upper", "expected a string").to_string(),
            "invalid argument for `upper`: expected a string"
        );
    }
}
