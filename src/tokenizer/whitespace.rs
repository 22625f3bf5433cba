//! # Whitespace inside markers
//!
//! Outside markers whitespace is part of the surrounding text token. Inside a
//! marker it separates helper arguments, so it is kept as its own token
//! instead of being discarded.

use nom::{bytes::complete::take_while1, combinator::map, error::context};

use super::token::{ParserResult, Token};

/// Parses spaces, tabs and line breaks inside a marker.
///
/// # Examples
///
/// ```
/// # use stache::tokenizer::whitespace::parse_whitespace;
/// # use stache::tokenizer::token::Token;
/// let (rest, token) = parse_whitespace("  \n name").unwrap();
/// assert_eq!(token, Token::Whitespace("  \n ".to_string()));
/// assert_eq!(rest, "name");
/// ```
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Token> {
    context(
        "whitespace expected",
        map(take_while1(char::is_whitespace), |ws: &str| {
            Token::Whitespace(ws.to_string())
        }),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        let (rest, token) = parse_whitespace("\t\t  hello").unwrap();
        assert_eq!(token, Token::Whitespace("\t\t  ".to_string()));
        assert_eq!(rest, "hello");

        let (rest, token) = parse_whitespace("\r\n}}").unwrap();
        assert_eq!(token, Token::Whitespace("\r\n".to_string()));
        assert_eq!(rest, "}}");
    }

    #[test]
    fn test_error() {
        assert!(parse_whitespace("hello").is_err());
    }
}
