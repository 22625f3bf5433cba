use super::super::{core::*, prelude::*};
use super::expression::{parse_expression, parse_opt_whitespace, parse_path};
use crate::ast::{Expression, Statement, Template, MAX_NESTING_DEPTH};
use crate::tokenizer::{marker::Marker, token::Token};

/// Whole token stream into a template.
///
/// Anything left once the top-level block stops is a closing tag or an
/// `{{else}}` without an open section.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_template(input: &[Token]) -> Result<Template, ParseError> {
    check_nesting(input)?;
    let (pos, statements) = parse_block(input, 0)?;
    if pos < input.len() {
        let message = match parse_close_tag().parse(input, pos) {
            Ok((_, name)) => format!("unexpected closing tag `{}`", name),
            Err(_) => "`{{else}}` outside of a section".to_string(),
        };
        return Err(ParseError::failure(message, pos));
    }
    Ok(Template::new(statements))
}

/// Rejects sections, or parenthesized helper calls, nested deeper than
/// [`MAX_NESTING_DEPTH`] before the recursive descent sees them.
fn check_nesting(input: &[Token]) -> Result<(), ParseError> {
    let mut sections = 0usize;
    let mut calls = 0usize;
    for (pos, token) in input.iter().enumerate() {
        match token {
            Token::Open(Marker::Section | Marker::Inverted) => sections += 1,
            Token::Open(Marker::Close) => sections = sections.saturating_sub(1),
            Token::LeftParen => calls += 1,
            Token::RightParen => calls = calls.saturating_sub(1),
            Token::CloseDelimiter => calls = 0,
            _ => {}
        }
        if sections > MAX_NESTING_DEPTH {
            return Err(ParseError::failure(
                format!("sections nested deeper than {} levels", MAX_NESTING_DEPTH),
                pos,
            ));
        }
        // the outermost call has no parentheses
        if calls >= MAX_NESTING_DEPTH {
            return Err(ParseError::failure(
                format!("helper calls nested deeper than {} levels", MAX_NESTING_DEPTH),
                pos,
            ));
        }
    }
    Ok(())
}

/// Statements up to the end of input, a closing tag or an `{{else}}`.
/// The terminating tag is left for the caller.
pub fn parse_block(input: &[Token], pos: usize) -> ParseResult<Vec<Statement>> {
    let mut statements = Vec::new();
    let mut current_pos = pos;
    while current_pos < input.len()
        && parse_close_tag().parse(input, current_pos).is_err()
        && parse_else_tag().parse(input, current_pos).is_err()
    {
        let (next, statement) = parse_statement().parse(input, current_pos)?;
        statements.push(statement);
        current_pos = next;
    }
    Ok((current_pos, statements))
}

fn parse_statement() -> impl Parser<Token, Statement> {
    choice(vec![
        Box::new(parse_section),
        Box::new(parse_mustache()),
        Box::new(parse_text()),
        Box::new(parse_comment()),
    ])
}

fn parse_text() -> impl Parser<Token, Statement> {
    satisfy("text", |token: &Token| match token {
        Token::Text(value) => Some(Statement::text(value.clone())),
        _ => None,
    })
}

fn parse_comment() -> impl Parser<Token, Statement> {
    satisfy("comment", |token: &Token| match token {
        Token::Comment(value) => Some(Statement::Comment {
            value: value.clone(),
        }),
        _ => None,
    })
}

fn parse_close_delimiter() -> impl Parser<Token, ()> {
    preceded(parse_opt_whitespace(), as_unit(equal(Token::CloseDelimiter)))
}

fn parse_mustache() -> impl Parser<Token, Statement> {
    with_context(
        map(
            delimited(
                preceded(as_unit(equal(Token::Open(Marker::Mustache))), parse_opt_whitespace()),
                parse_expression(),
                parse_close_delimiter(),
            ),
            |expression| Statement::Mustache { expression },
        ),
        "mustache",
    )
}

fn parse_section_open() -> impl Parser<Token, (bool, Expression)> {
    tuple2(
        choice(vec![
            Box::new(map(equal(Token::Open(Marker::Section)), |_| false)),
            Box::new(map(equal(Token::Open(Marker::Inverted)), |_| true)),
        ]),
        delimited(
            parse_opt_whitespace(),
            parse_expression(),
            parse_close_delimiter(),
        ),
    )
}

fn parse_else_tag() -> impl Parser<Token, ()> {
    delimited(
        preceded(as_unit(equal(Token::Open(Marker::Mustache))), parse_opt_whitespace()),
        as_unit(equal(Token::Identifier("else".to_string()))),
        parse_close_delimiter(),
    )
}

fn parse_close_tag() -> impl Parser<Token, String> {
    delimited(
        preceded(as_unit(equal(Token::Open(Marker::Close))), parse_opt_whitespace()),
        map(parse_path(), |path: Expression| path.block_name()),
        parse_close_delimiter(),
    )
}

fn parse_section(input: &[Token], pos: usize) -> ParseResult<Statement> {
    let start = pos;
    let (pos, (negated, expression)) =
        with_context(parse_section_open(), "section").parse(input, pos)?;
    let name = expression.block_name();

    let (pos, body) = parse_block(input, pos)?;
    let (pos, else_body) = match parse_else_tag().parse(input, pos) {
        Ok((pos, ())) => {
            let (pos, else_body) = parse_block(input, pos)?;
            (pos, Some(else_body))
        }
        Err(_) => (pos, None),
    };
    if parse_else_tag().parse(input, pos).is_ok() {
        return Err(ParseError::failure(
            format!("section `{}` has more than one `{{{{else}}}}`", name),
            pos,
        ));
    }

    match parse_close_tag().parse(input, pos) {
        Ok((next, closing)) if closing == name => Ok((
            next,
            Statement::Section {
                expression,
                negated,
                body,
                else_body,
            },
        )),
        Ok((_, closing)) => Err(ParseError::failure(
            format!(
                "closing tag `{}` does not match opening tag `{}`",
                closing, name
            ),
            pos,
        )),
        Err(_) => Err(ParseError::failure(
            format!("section `{}` is never closed", name),
            start,
        )),
    }
}
