use nom::{branch::alt, bytes::complete::tag, combinator::value, error::context};

use super::token::{ParserResult, Token};

/// Punctuation allowed inside a marker: path separator and sub-expression
/// parentheses.
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_symbol(input: &str) -> ParserResult<Token> {
    context(
        "symbol",
        alt((
            value(Token::Dot, tag(".")),
            value(Token::LeftParen, tag("(")),
            value(Token::RightParen, tag(")")),
        )),
    )(input)
}
