use thiserror::Error;

use super::core::ParseError;
use super::parsers::parse_template;
use crate::ast::Template;
use crate::tokenizer::token::{Span, Token, TokenSpan, Tokenizer, TokenizerError};

/// Compile-time failure, located in the template source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error(transparent)]
    Tokenize(#[from] TokenizerError),
    #[error("{message} at {span}")]
    Parse { message: String, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> &Span {
        match self {
            SyntaxError::Tokenize(e) => e.span(),
            SyntaxError::Parse { span, .. } => span,
        }
    }

    fn from_parse_error(error: ParseError, spans: &[TokenSpan], source: &str) -> Self {
        let span = spans
            .get(error.get_position())
            .map(TokenSpan::span)
            .unwrap_or_else(|| end_of_source(source));
        SyntaxError::Parse {
            message: error.to_string(),
            span,
        }
    }
}

fn end_of_source(source: &str) -> Span {
    let line = source.matches('\n').count() + 1;
    let column = source
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;
    Span {
        start: source.len(),
        end: source.len(),
        line,
        column,
    }
}

/// Compiles template source into a syntax tree.
#[tracing::instrument(level = "debug", skip(source))]
pub fn parse(source: &str) -> Result<Template, SyntaxError> {
    let spans = Tokenizer::new().tokenize(source)?;
    let tokens: Vec<Token> = spans.iter().map(|span| span.token.clone()).collect();
    let template = parse_template(&tokens)
        .map_err(|e| SyntaxError::from_parse_error(e, &spans, source))?;
    tracing::debug!(statements = template.statements.len(), "parsed template");
    Ok(template)
}
