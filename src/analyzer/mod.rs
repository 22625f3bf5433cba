//! # Template Analyzer (Parser)
//!
//! The analyzer turns the token stream produced by the
//! [`Tokenizer`](crate::tokenizer::token::Tokenizer) into a syntax tree using
//! a parser combinator pattern.
//!
//! ## Core Components
//!
//! * **Parser Trait**: Defines the core parsing interface
//! * **Combinators**: Building blocks for creating complex parsers
//! * **Grammar Parsers**: expressions, tags and nested sections
//!
//! ## Position in the Pipeline
//!
//! ```text
//! Source → Tokenizer → Analyzer → Syntax Tree → Evaluator
//! ```
//!
//! Section nesting is checked here: every `{{#name}}` or `{{^name}}` must be
//! closed by a matching `{{/name}}`, and `{{else}}` may appear at most once
//! directly inside a section.
//!
//! ## Usage Example
//!
//! ```rust
//! use stache::analyzer::parse;
//! use stache::ast::{Expression, Statement};
//!
//! let template = parse("Hello, {{ name }}!").unwrap();
//! assert_eq!(
//!     template.statements[1],
//!     Statement::Mustache { expression: Expression::path(["name"]) }
//! );
//! ```

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;
mod root;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;
pub use root::{parse, SyntaxError};

pub use crate::ast;
