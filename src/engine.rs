//! # Engine: Compiling and Rendering Templates
//!
//! The engine ties the pipeline together and owns the helper registry:
//!
//! ```text
//! Source → Tokenizer → Analyzer → Syntax Tree → Evaluator → String
//! ```
//!
//! Templates compiled by an engine share its registry, so helpers added later
//! are visible to templates compiled earlier. Cloning an engine shares the
//! registry as well.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::analyzer;
use crate::ast::Template;
use crate::config::{self, EngineConfig};
use crate::error::StacheResult;
use crate::eval::{
    builtin::register_builtin_helpers,
    context::PathResolver,
    evaluator::Evaluator,
    helper::{FnHelper, Helper, HelperRegistry, HelperResult, SyncFnHelper},
    value::Value,
};

#[derive(Clone)]
pub struct Engine {
    helpers: HelperRegistry,
    evaluator: Arc<Evaluator>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("helpers", &self.helpers)
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    /// Engine with no helpers and the default unsafe key denylist.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let helpers = HelperRegistry::new();
        if config.builtin_helpers {
            register_builtin_helpers(&helpers);
        }
        let resolver = PathResolver::new(config.unsafe_keys.iter().cloned());
        Self {
            evaluator: Arc::new(Evaluator::new(helpers.clone(), resolver)),
            helpers,
            config,
        }
    }

    pub fn with_builtin_helpers() -> Self {
        Self::with_config(EngineConfig {
            builtin_helpers: true,
            ..EngineConfig::default()
        })
    }

    /// Loads an [`EngineConfig`] from a JSON file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> StacheResult<Self> {
        let config: EngineConfig = config::from_file(path)?;
        Ok(Self::with_config(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn helpers(&self) -> &HelperRegistry {
        &self.helpers
    }

    /// Registers an async helper. Replaces any helper with the same name.
    pub fn add_helper<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HelperResult> + Send + 'static,
    {
        self.helpers.register(name, Arc::new(FnHelper(f)));
    }

    pub fn add_sync_helper<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Vec<Value>) -> HelperResult + Send + Sync + 'static,
    {
        self.helpers.register(name, Arc::new(SyncFnHelper(f)));
    }

    pub fn register_helper(&self, name: impl Into<String>, helper: Arc<dyn Helper>) {
        self.helpers.register(name, helper);
    }

    pub fn remove_helper(&self, name: &str) -> bool {
        self.helpers.remove(name)
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains(name)
    }

    pub fn parse(&self, source: &str) -> StacheResult<Template> {
        Ok(analyzer::parse(source)?)
    }

    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn compile(&self, source: &str) -> StacheResult<CompiledTemplate> {
        let tree = self.parse(source)?;
        Ok(self.compile_tree(tree))
    }

    /// Binds an already built tree, e.g. one loaded with
    /// [`Template::from_json`], to this engine.
    pub fn compile_tree(&self, tree: Template) -> CompiledTemplate {
        CompiledTemplate {
            tree: Arc::new(tree),
            evaluator: self.evaluator.clone(),
        }
    }

    /// Renders a tree directly against `context`.
    pub async fn run(&self, tree: &Template, context: impl Into<Value>) -> StacheResult<String> {
        let context = context.into();
        Ok(self.evaluator.run(tree, &context).await?)
    }
}

/// A parsed template bound to the engine that compiled it.
///
/// Cheap to clone; every clone shares the same tree.
#[derive(Clone)]
pub struct CompiledTemplate {
    tree: Arc<Template>,
    evaluator: Arc<Evaluator>,
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("tree", &self.tree)
            .finish()
    }
}

impl CompiledTemplate {
    pub fn tree(&self) -> &Template {
        &self.tree
    }

    /// Renders with `context`; pass `()` for no context.
    pub async fn render(&self, context: impl Into<Value>) -> StacheResult<String> {
        let context = context.into();
        Ok(self.evaluator.run(&self.tree, &context).await?)
    }

    /// Renders with any serializable value as context.
    pub async fn render_serializable<T: Serialize + ?Sized>(&self, context: &T) -> StacheResult<String> {
        let context = Value::from_serializable(context)?;
        Ok(self.evaluator.run(&self.tree, &context).await?)
    }
}
