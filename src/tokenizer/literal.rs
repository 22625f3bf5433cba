use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::char,
    combinator::{cut, map, opt, value},
    error::context,
    sequence::{preceded, terminated},
};

use super::token::{ParserResult, Token};

#[tracing::instrument(level = "trace", skip(input))]
fn parse_string_literal(input: &str) -> ParserResult<String> {
    context(
        "string literal",
        preceded(
            char('"'),
            cut(context(
                "unterminated string literal",
                terminated(
                    map(
                        opt(escaped_transform(
                            is_not("\\\""),
                            '\\',
                            cut(context(
                                "invalid escape sequence",
                                alt((
                                    value("\\", tag("\\")),
                                    value("\"", tag("\"")),
                                    value("\n", tag("n")),
                                    value("\t", tag("t")),
                                )),
                            )),
                        )),
                        Option::unwrap_or_default,
                    ),
                    char('"'),
                ),
            )),
        ),
    )(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_literal(input: &str) -> ParserResult<Token> {
    map(parse_string_literal, Token::Literal)(input)
}
