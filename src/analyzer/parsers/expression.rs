use super::super::{core::*, prelude::*};
use crate::ast::Expression;
use crate::tokenizer::token::Token;

/// Expression inside a marker: a helper call, a literal or a path.
///
/// A lone identifier is always a path; it only becomes a helper call when at
/// least one argument follows it.
pub fn parse_expression() -> impl Parser<Token, Expression> {
    with_context(
        choice(vec![
            Box::new(parse_helper_call()),
            Box::new(parse_literal()),
            Box::new(parse_path()),
        ]),
        "expression",
    )
}

pub fn parse_whitespace() -> impl Parser<Token, ()> {
    satisfy("whitespace", |token: &Token| match token {
        Token::Whitespace(_) => Some(()),
        _ => None,
    })
}

pub fn parse_opt_whitespace() -> impl Parser<Token, ()> {
    map(optional(parse_whitespace()), |_: Option<()>| ())
}

pub fn parse_identifier() -> impl Parser<Token, String> {
    satisfy("identifier", |token: &Token| match token {
        Token::Identifier(name) => Some(name.clone()),
        _ => None,
    })
}

pub fn parse_path() -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_identifier(),
                many(preceded(as_unit(equal(Token::Dot)), parse_identifier())),
            ),
            |(first, rest): (String, Vec<String>)| {
                Expression::path(std::iter::once(first).chain(rest))
            },
        ),
        "path",
    )
}

pub fn parse_literal() -> impl Parser<Token, Expression> {
    satisfy("string literal", |token: &Token| match token {
        Token::Literal(value) => Some(Expression::literal(value.clone())),
        _ => None,
    })
}

fn parse_helper_call() -> impl Parser<Token, Expression> {
    with_context(
        map(
            tuple2(
                parse_identifier(),
                many1(preceded(parse_whitespace(), parse_argument())),
            ),
            |(name, arguments): (String, Vec<Expression>)| Expression::HelperCall { name, arguments },
        ),
        "helper call",
    )
}

fn parse_argument() -> impl Parser<Token, Expression> {
    with_context(
        choice(vec![
            Box::new(parse_literal()),
            Box::new(parse_subexpression),
            Box::new(parse_path()),
        ]),
        "argument",
    )
}

// `(name arg ...)`; written as a function to break the recursion through
// `parse_argument`.
fn parse_subexpression(input: &[Token], pos: usize) -> ParseResult<Expression> {
    with_context(
        map(
            delimited(
                as_unit(equal(Token::LeftParen)),
                tuple2(
                    preceded(parse_opt_whitespace(), parse_identifier()),
                    many(preceded(parse_whitespace(), parse_argument())),
                ),
                preceded(parse_opt_whitespace(), as_unit(equal(Token::RightParen))),
            ),
            |(name, arguments): (String, Vec<Expression>)| Expression::HelperCall { name, arguments },
        ),
        "subexpression",
    )
    .parse(input, pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::token::Tokenizer;
    use pretty_assertions::assert_eq;

    // Tokens between the opening marker and `}}`
    fn marker_tokens(content: &str) -> Vec<Token> {
        let spans = Tokenizer::new()
            .tokenize(&format!("{{{{{}}}}}", content))
            .unwrap();
        spans[1..spans.len() - 1]
            .iter()
            .map(|span| span.token.clone())
            .collect()
    }

    fn parse_all(content: &str) -> Expression {
        let tokens = marker_tokens(content);
        let (pos, expression) = parse_expression().parse(&tokens, 0).unwrap();
        assert_eq!(pos, tokens.len(), "unconsumed tokens in {:?}", content);
        expression
    }

    #[test]
    fn test_lone_identifier_is_path() {
        assert_eq!(parse_all("name"), Expression::path(["name"]));
        assert_eq!(
            parse_all("foo.bar.baz"),
            Expression::path(["foo", "bar", "baz"])
        );
    }

    #[test]
    fn test_literal() {
        assert_eq!(parse_all("\"Hello\""), Expression::literal("Hello"));
    }

    #[test]
    fn test_helper_call_arguments() {
        assert_eq!(
            parse_all("concat \"a\" user.name b"),
            Expression::HelperCall {
                name: "concat".to_string(),
                arguments: vec![
                    Expression::literal("a"),
                    Expression::path(["user", "name"]),
                    Expression::path(["b"]),
                ],
            }
        );
    }

    #[test]
    fn test_nested_helper_call() {
        assert_eq!(
            parse_all("upper ( trim name ) (now)"),
            Expression::HelperCall {
                name: "upper".to_string(),
                arguments: vec![
                    Expression::HelperCall {
                        name: "trim".to_string(),
                        arguments: vec![Expression::path(["name"])],
                    },
                    Expression::HelperCall {
                        name: "now".to_string(),
                        arguments: vec![],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_dotted_helper_name_leaves_arguments() {
        let tokens = marker_tokens("a.b c");
        let (pos, expression) = parse_expression().parse(&tokens, 0).unwrap();
        assert_eq!(expression, Expression::path(["a", "b"]));
        assert_eq!(pos, 3);
    }

    #[test]
    fn test_unclosed_subexpression() {
        let tokens = marker_tokens("upper (trim name");
        let (pos, _) = parse_expression().parse(&tokens, 0).unwrap();
        // only the helper name is taken as a path
        assert_eq!(pos, 1);
    }

    #[test]
    fn test_empty_input() {
        let error = parse_expression().parse(&[], 0).unwrap_err();
        assert_eq!(error.get_position(), 0);
    }
}
