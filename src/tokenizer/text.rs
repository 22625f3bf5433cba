//! Raw text and comments: everything the tokenizer sees outside of markers.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    combinator::{cut, map, rest, verify},
    error::context,
    sequence::{preceded, terminated},
};

use super::token::{ParserResult, Token};

/// Text up to the next `{{`, or to the end of input. Never trimmed.
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_text(input: &str) -> ParserResult<Token> {
    context(
        "text",
        map(
            verify(alt((take_until("{{"), rest)), |text: &str| !text.is_empty()),
            |text: &str| Token::Text(text.to_string()),
        ),
    )(input)
}

/// `{{!-- ... --}}` (may contain `}}`) or `{{! ... }}`.
#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_comment(input: &str) -> ParserResult<Token> {
    map(
        alt((
            preceded(tag("{{!--"), terminated(take_until("--}}"), tag("--}}"))),
            preceded(
                tag("{{!"),
                cut(context(
                    "unterminated comment",
                    terminated(take_until("}}"), tag("}}")),
                )),
            ),
        )),
        |content: &str| Token::Comment(content.trim().to_string()),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_until_marker() {
        let (rest, token) = parse_text("Hello, {{ name }}").unwrap();
        assert_eq!(token, Token::Text("Hello, ".to_string()));
        assert_eq!(rest, "{{ name }}");
    }

    #[test]
    fn test_text_keeps_whitespace() {
        let (rest, token) = parse_text("  a\n\tb  ").unwrap();
        assert_eq!(token, Token::Text("  a\n\tb  ".to_string()));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_text_stops_immediately_at_marker() {
        assert!(parse_text("{{x}}").is_err());
        assert!(parse_text("").is_err());
    }

    #[test]
    fn test_comment() {
        let (rest, token) = parse_comment("{{! ipsum }} dolor").unwrap();
        assert_eq!(token, Token::Comment("ipsum".to_string()));
        assert_eq!(rest, " dolor");
    }

    #[test]
    fn test_long_comment_may_contain_braces() {
        let (rest, token) = parse_comment("{{!-- {{ name }} --}}after").unwrap();
        assert_eq!(token, Token::Comment("{{ name }}".to_string()));
        assert_eq!(rest, "after");
    }

    #[test]
    fn test_unterminated_comment_is_failure() {
        assert!(matches!(
            parse_comment("{{! never closed"),
            Err(nom::Err::Failure(_))
        ));
    }
}
