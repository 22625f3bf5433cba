use nom::{
    branch::alt,
    bytes::complete::take_while1,
    combinator::map,
    error::{context, VerboseError, VerboseErrorKind},
    IResult,
};
use thiserror::Error;

use super::{
    literal::parse_literal,
    marker::{parse_close_delimiter, parse_open_marker, Marker},
    symbol::parse_symbol,
    text::{parse_comment, parse_text},
    whitespace::parse_whitespace,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Outside markers
    Text(String),
    Comment(String),
    // Marker boundaries
    Open(Marker),
    CloseDelimiter,
    // Inside markers
    Identifier(String),
    Literal(String),
    Dot,
    LeftParen,
    RightParen,
    Whitespace(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Text(text) => write!(f, "text {:?}", text),
            Token::Comment(_) => write!(f, "comment"),
            Token::Open(marker) => write!(f, "`{}`", marker),
            Token::CloseDelimiter => write!(f, "`}}}}`"),
            Token::Identifier(id) => write!(f, "identifier `{}`", id),
            Token::Literal(value) => write!(f, "literal {:?}", value),
            Token::Dot => write!(f, "`.`"),
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::Whitespace(_) => write!(f, "whitespace"),
        }
    }
}

/// Splits template source into spanned tokens.
///
/// Text outside markers is kept verbatim. Inside a marker the tokenizer
/// switches to expression mode until the closing `}}`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    current_position: usize,
    current_line: usize,
    current_column: usize,
    open_marker: Option<Span>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            current_position: 0,
            current_line: 1,   // 1-based
            current_column: 1, // 1-based
            open_marker: None,
        }
    }

    #[tracing::instrument(level = "debug", skip(self, input))]
    pub fn tokenize(&mut self, input: &str) -> TokenizerResult<Vec<TokenSpan>> {
        // every call starts at the top of a fresh source
        *self = Self::new();
        let mut tokens = Vec::new();
        let mut remaining = input;

        while !remaining.is_empty() {
            let start_position = self.current_position;
            let start_line = self.current_line;
            let start_column = self.current_column;

            let result = if self.open_marker.is_some() {
                alt((
                    parse_whitespace,
                    parse_close_delimiter,
                    parse_literal,
                    parse_symbol,
                    parse_identifier,
                ))(remaining)
            } else {
                alt((parse_comment, parse_open_marker, parse_text))(remaining)
            };

            match result {
                Ok((new_remaining, token)) => {
                    let consumed = &remaining[..(remaining.len() - new_remaining.len())];
                    self.update_position(consumed);

                    let span = Span {
                        start: start_position,
                        end: self.current_position,
                        line: start_line,
                        column: start_column,
                    };
                    match token {
                        Token::Open(_) => self.open_marker = Some(span.clone()),
                        Token::CloseDelimiter => self.open_marker = None,
                        _ => {}
                    }

                    tokens.push(TokenSpan {
                        token,
                        start: span.start,
                        end: span.end,
                        line: span.line,
                        column: span.column,
                    });

                    remaining = new_remaining;
                }
                Err(e) => {
                    let found = remaining.chars().take(20).collect::<String>();
                    let span = Span {
                        start: self.current_position,
                        end: self.current_position + 1,
                        line: self.current_line,
                        column: self.current_column,
                    };
                    let message = match e {
                        nom::Err::Incomplete(needed) => {
                            format!("incomplete input, {:?}", needed)
                        }
                        nom::Err::Failure(e) => describe_failure(&e, &found),
                        nom::Err::Error(_) => unexpected_input(&found),
                    };
                    let error = TokenizerError::ParseError {
                        message,
                        found,
                        span,
                    };
                    tracing::debug!("{}", error);
                    return Err(error);
                }
            }
        }

        if let Some(span) = self.open_marker.take() {
            return Err(TokenizerError::UnclosedMarker { span });
        }

        Ok(tokens)
    }

    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.current_position += c.len_utf8();
            if c == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
        }
    }
}

// Innermost context label of a committed (cut) parser
fn describe_failure(error: &VerboseError<&str>, found: &str) -> String {
    error
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some(ctx.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| unexpected_input(found))
}

fn unexpected_input(found: &str) -> String {
    match found.chars().next() {
        Some(c) => format!("unexpected character `{}` inside marker", c),
        None => "unexpected end of input".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl TokenSpan {
    pub fn span(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Bare word used for path segments and helper names.
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_identifier(input: &str) -> ParserResult<Token> {
    context(
        "identifier",
        map(
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$' || c == '-'),
            |id: &str| Token::Identifier(id.to_string()),
        ),
    )(input)
}

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("{message} at {span}")]
    ParseError {
        message: String,
        found: String,
        span: Span,
    },
    #[error("marker opened at {span} is never closed with `}}}}`")]
    UnclosedMarker { span: Span },
}

impl TokenizerError {
    pub fn span(&self) -> &Span {
        match self {
            TokenizerError::ParseError { span, .. } => span,
            TokenizerError::UnclosedMarker { span } => span,
        }
    }
}
