use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::token::{ParserResult, Token};

/// Opening marker forms. Comments are handled separately since their body is
/// not tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, AsRefStr)]
pub enum Marker {
    #[strum(serialize = "{{")]
    Mustache,
    #[strum(serialize = "{{#")]
    Section,
    #[strum(serialize = "{{^")]
    Inverted,
    #[strum(serialize = "{{/")]
    Close,
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_open_marker(input: &str) -> ParserResult<Token> {
    context(
        "opening marker",
        map(
            alt((
                value(Marker::Section, tag("{{#")),
                value(Marker::Inverted, tag("{{^")),
                value(Marker::Close, tag("{{/")),
                value(Marker::Mustache, tag("{{")),
            )),
            Token::Open,
        ),
    )(input)
}

#[tracing::instrument(level = "trace", skip(input))]
pub fn parse_close_delimiter(input: &str) -> ParserResult<Token> {
    context("closing marker", value(Token::CloseDelimiter, tag("}}")))(input)
}
