//! # Stache: Mustache-style Templates with Async Helpers
//!
//! Stache compiles text templates with `{{ }}` markers into a versioned syntax
//! tree and renders that tree against a context value. Helpers are plain
//! async functions, so a template can pull data from anywhere while it
//! renders.
//!
//! ## Template Syntax
//!
//! - `{{ path.to.value }}` interpolation, `{{ helper arg "literal" (nested arg) }}` helper calls
//! - `{{# expr }} ... {{else}} ... {{/ expr }}` sections, `{{^ expr }} ... {{/ expr }}` negated sections
//! - `{{! comment }}` and `{{!-- comment with }} inside --}}`
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source → Tokenizer → Analyzer → Syntax Tree → Evaluator → String
//! ```
//!
//! ### Stage 1: Tokenization
//!
//! The [`tokenizer`] module splits source into text, comments and marker
//! tokens, each carrying its line and column.
//!
//! ### Stage 2: Parsing
//!
//! The [`analyzer`] module builds the [`ast`] with parser combinators and
//! checks section nesting.
//!
//! ### Stage 3: Evaluation
//!
//! The [`eval`] module renders the tree. Paths are resolved against the
//! current context, sections iterate or switch context, and helper calls are
//! awaited in document order.
//!
//! The syntax tree serializes to JSON, so trees built elsewhere can be
//! rendered directly as long as their `version` is [`FORMAT_VERSION`].
//!
//! ## Usage Example
//!
//! ```rust
//! use stache::{Engine, Value};
//!
//! let engine = Engine::new();
//! engine.add_sync_helper("upper", |args: Vec<Value>| {
//!     Ok(Value::from(args[0].to_string().to_uppercase()))
//! });
//!
//! let template = engine.compile("Hello, {{ upper name }}!").unwrap();
//! let output = futures::executor::block_on(
//!     template.render(serde_json::json!({ "name": "world" })),
//! )
//! .unwrap();
//! assert_eq!(output, "Hello, WORLD!");
//! ```

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod tokenizer;

// Re-exports
pub use analyzer::SyntaxError;
pub use ast::{Expression, Statement, Template, FORMAT_VERSION, MAX_NESTING_DEPTH};
pub use config::EngineConfig;
pub use engine::{CompiledTemplate, Engine};
pub use error::*;
pub use eval::evaluator::EvalError;
pub use eval::helper::{Helper, HelperError, HelperResult};
pub use eval::value::Value;

/// Compiles `source` with a default engine (no helpers).
pub fn compile(source: &str) -> StacheResult<CompiledTemplate> {
    Engine::new().compile(source)
}

/// Parses `source` into a syntax tree without binding it to an engine.
pub fn parse(source: &str) -> StacheResult<Template> {
    Ok(analyzer::parse(source)?)
}

/// Renders a syntax tree with a default engine (no helpers).
pub async fn run(tree: &Template, context: impl Into<Value>) -> StacheResult<String> {
    Engine::new().run(tree, context).await
}
