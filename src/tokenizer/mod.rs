//! # Tokenizer Component
//!
//! Lexical analysis of template source. The tokenizer alternates between two
//! modes:
//!
//! * **text mode**: raw text is collected verbatim until the next `{{`.
//!   Comments (`{{! ... }}`, `{{!-- ... --}}`) are consumed whole in this mode.
//! * **marker mode**: entered on an opening marker (`{{`, `{{#`, `{{^`,
//!   `{{/`) and left on `}}`. Identifiers, dots, parentheses, quoted literals
//!   and whitespace are recognized here; anything else is an error.
//!
//! Every token carries its byte range plus 1-based line and column so the
//! parser can report syntax errors precisely.
//!
//! ## Component Structure
//!
//! * [`token`]: token types and the [`Tokenizer`](token::Tokenizer) loop
//! * [`marker`]: opening markers and the closing delimiter
//! * [`text`]: raw text and comments
//! * [`literal`]: double-quoted string literals
//! * [`symbol`]: `.`, `(` and `)`
//! * [`whitespace`]: whitespace inside markers
//!
//! ## Usage Example
//!
//! ```rust
//! use stache::tokenizer::token::{Token, Tokenizer};
//!
//! let tokens = Tokenizer::new().tokenize("Hello, {{ name }}!").unwrap();
//! assert_eq!(tokens[0].token, Token::Text("Hello, ".to_string()));
//! ```

pub mod literal;
pub mod marker;
pub mod symbol;
pub mod text;
pub mod token;
pub mod whitespace;
