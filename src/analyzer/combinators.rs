//! # Parser Combinators
//!
//! Building blocks of the template parser. Each combinator is a small struct
//! implementing [`Parser`]; the [`prelude`](super::prelude) exposes one
//! constructor function per combinator.
//!
//! ## Combinator Types
//!
//! * **Basic Combinators**: `Equal`, `Satisfy`
//! * **Sequential Combinators**: `Preceded`, `Tuple2`, `Delimited`
//! * **Alternative Combinators**: `Choice`
//! * **Repetition Combinators**: `Many`, `Many1`
//! * **Transformation Combinators**: `Map`, `AsUnit`, `Optional`
//! * **Error Handling Combinators**: `WithContext`
//!
//! Recursive grammar rules are plain functions, which implement [`Parser`]
//! through the blanket impl for `Fn(&[I], usize) -> ParseResult<O>`.

use super::core::ParseError;
use super::core::ParseResult;
use super::core::Parser;
use std::fmt;
use std::marker::PhantomData;

fn end_of_input(position: usize, expected: &str) -> ParseError {
    ParseError::UnexpectedEOF {
        message: format!("expected {}", expected),
        position,
        context: None,
    }
}

/// Equal: consumes one input item if it equals `value`.
#[derive(Clone)]
pub struct Equal<I> {
    value: I,
}

impl<I> Equal<I> {
    pub fn new(value: I) -> Self {
        Self { value }
    }
}

impl<I: Clone + PartialEq + fmt::Display> Parser<I, I> for Equal<I> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<I> {
        match input.get(pos) {
            Some(found) if *found == self.value => Ok((pos + 1, found.clone())),
            Some(found) => Err(ParseError::Unexpected {
                expected: self.value.to_string(),
                found: found.to_string(),
                position: pos,
                context: None,
            }),
            None => Err(end_of_input(pos, &self.value.to_string())),
        }
    }
}

/// Satisfy: consumes one input item when `f` maps it to `Some`.
///
/// `expected` describes the accepted items in error messages.
#[derive(Clone)]
pub struct Satisfy<I, O, F> {
    expected: String,
    f: F,
    _phantom: PhantomData<(I, O)>,
}

impl<I, O, F> Satisfy<I, O, F> {
    pub fn new(expected: &str, f: F) -> Self {
        Self {
            expected: expected.to_string(),
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F> Parser<I, O> for Satisfy<I, O, F>
where
    I: fmt::Display,
    F: Fn(&I) -> Option<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        match input.get(pos) {
            Some(item) => (self.f)(item).map(|result| (pos + 1, result)).ok_or_else(|| {
                ParseError::Unexpected {
                    expected: self.expected.clone(),
                    found: item.to_string(),
                    position: pos,
                    context: None,
                }
            }),
            None => Err(end_of_input(pos, &self.expected)),
        }
    }
}

/// Choice: the first alternative that succeeds wins.
///
/// When every alternative fails, the error that got furthest into the input
/// is reported, since it describes what the author most likely meant.
pub struct Choice<I, O> {
    parsers: Vec<Box<dyn Parser<I, O>>>,
}

impl<I, O> Choice<I, O> {
    pub fn new(parsers: Vec<Box<dyn Parser<I, O>>>) -> Self {
        Self { parsers }
    }
}

impl<I, O> Parser<I, O> for Choice<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let mut furthest: Option<ParseError> = None;
        for parser in &self.parsers {
            match parser.parse(input, pos) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let further = furthest
                        .as_ref()
                        .map_or(true, |f| e.get_position() > f.get_position());
                    if further {
                        furthest = Some(e);
                    }
                }
            }
        }
        Err(furthest.unwrap_or(ParseError::NoAlternative {
            position: pos,
            context: None,
        }))
    }
}

#[derive(Clone)]
pub struct Preceded<P1, P2, I, O> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O)>,
}

impl<P1, P2, I, O> Preceded<P1, P2, I, O> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O> Parser<I, O> for Preceded<P1, P2, I, O>
where
    P1: Parser<I, ()>,
    P2: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, _) = self.parser1.parse(input, pos)?;
        self.parser2.parse(input, pos)
    }
}

/// Map: Transforms the output of a parser using a function
#[derive(Clone)]
pub struct Map<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> Map<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, A, B, P, F> Parser<I, B> for Map<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        self.parser
            .parse(input, pos)
            .map(|(pos, value)| (pos, (self.f)(value)))
    }
}

#[derive(Clone)]
pub struct AsUnit<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> AsUnit<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, P, O> Parser<I, ()> for AsUnit<P, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<()> {
        self.parser.parse(input, pos).map(|(pos, _)| (pos, ()))
    }
}

/// Many: Applies a parser zero or more times
///
/// Stops at the first failure or when the inner parser stops consuming input.
#[derive(Clone)]
pub struct Many<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Vec<O>> for Many<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();
        let mut current_pos = pos;

        loop {
            match self.parser.parse(input, current_pos) {
                Ok((new_pos, value)) if new_pos > current_pos => {
                    results.push(value);
                    current_pos = new_pos;
                }
                Ok(_) => break,
                Err(e) => {
                    tracing::trace!(
                        target: "parser::many",
                        error = ?e,
                        position = current_pos,
                        items_collected = results.len(),
                        "Many parser stopped collection"
                    );
                    break;
                }
            }
        }

        Ok((current_pos, results))
    }
}

/// Many1: Applies a parser one or more times
#[derive(Clone)]
pub struct Many1<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many1<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Vec<O>> for Many1<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        let (mut current_pos, first) = self.parser.parse(input, pos)?;
        let mut results = vec![first];
        while let Ok((new_pos, value)) = self.parser.parse(input, current_pos) {
            if new_pos == current_pos {
                break;
            }
            results.push(value);
            current_pos = new_pos;
        }
        Ok((current_pos, results))
    }
}

#[derive(Clone)]
pub struct Optional<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Optional<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Option<O>> for Optional<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Option<O>> {
        match self.parser.parse(input, pos) {
            Ok((new_pos, value)) => Ok((new_pos, Some(value))),
            Err(_) => Ok((pos, None)),
        }
    }
}

#[derive(Clone)]
pub struct Tuple2<P1, P2, I, O1, O2> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O1, O2)>,
}

impl<P1, P2, I, O1, O2> Tuple2<P1, P2, I, O1, O2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O1, O2> Parser<I, (O1, O2)> for Tuple2<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2)> {
        let (pos, result1) = self.parser1.parse(input, pos)?;
        let (pos, result2) = self.parser2.parse(input, pos)?;
        Ok((pos, (result1, result2)))
    }
}

/// Delimited: left delimiter, content, right delimiter; keeps the content.
#[derive(Clone)]
pub struct Delimited<L, P, R, I, O> {
    left: L,
    parser: P,
    right: R,
    _phantom: PhantomData<(I, O)>,
}

impl<L, P, R, I, O> Delimited<L, P, R, I, O> {
    pub fn new(left: L, parser: P, right: R) -> Self {
        Self {
            left,
            parser,
            right,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, L, P, R> Parser<I, O> for Delimited<L, P, R, I, O>
where
    L: Parser<I, ()>,
    P: Parser<I, O>,
    R: Parser<I, ()>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, _) = self.left.parse(input, pos)?;
        let (pos, value) = self.parser.parse(input, pos)?;
        let (pos, _) = self.right.parse(input, pos)?;
        Ok((pos, value))
    }
}

#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<I, O, P, C: ToString> Parser<I, O> for WithContext<P, C>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser
            .parse(input, pos)
            .map_err(|e| e.with_context(&self.context.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(expected: i32) -> Satisfy<i32, i32, impl Fn(&i32) -> Option<i32>> {
        Satisfy::new("digit", move |x: &i32| (*x == expected).then_some(*x))
    }

    #[test]
    fn test_equal() {
        let input = vec![1, 2, 3];
        assert_eq!(Equal::new(2).parse(&input, 1), Ok((2, 2)));
        assert_eq!(
            Equal::new(4).parse(&input, 1),
            Err(ParseError::Unexpected {
                expected: "4".to_string(),
                found: "2".to_string(),
                position: 1,
                context: None,
            })
        );
        assert!(matches!(
            Equal::new(1).parse(&input, 3),
            Err(ParseError::UnexpectedEOF { position: 3, .. })
        ));
    }

    #[test]
    fn test_satisfy() {
        let input = vec![1, 2, 3, 4, 5];
        let parser = Satisfy::new("even", |x: &i32| if *x % 2 == 0 { Some(*x) } else { None });
        assert_eq!(parser.parse(&input, 1), Ok((2, 2)));
        assert!(matches!(
            parser.parse(&input, 0),
            Err(ParseError::Unexpected { ref expected, .. }) if expected == "even"
        ));
        assert!(matches!(
            parser.parse(&input, 5),
            Err(ParseError::UnexpectedEOF { .. })
        ));
    }

    #[test]
    fn test_choice_reports_furthest_error() {
        let input = vec![1, 2, 9];
        let choice_parser: Choice<i32, i32> = Choice::new(vec![
            Box::new(digit(5)),
            Box::new(Map::new(Tuple2::new(digit(1), digit(3)), |(a, _): (i32, i32)| a)),
        ]);
        assert_eq!(choice_parser.parse(&input, 0).unwrap_err().get_position(), 1);

        let choice_parser: Choice<i32, i32> = Choice::new(vec![Box::new(digit(5)), Box::new(digit(1))]);
        assert_eq!(choice_parser.parse(&input, 0), Ok((1, 1)));

        let empty: Choice<i32, i32> = Choice::new(vec![]);
        assert_eq!(
            empty.parse(&input, 0),
            Err(ParseError::NoAlternative {
                position: 0,
                context: None
            })
        );
    }

    #[test]
    fn test_many() {
        let input = vec![1, 1, 1, 2];
        assert_eq!(Many::new(digit(1)).parse(&input, 0), Ok((3, vec![1, 1, 1])));
        assert_eq!(Many::new(digit(2)).parse(&input, 0), Ok((0, vec![])));
        assert_eq!(Many1::new(digit(1)).parse(&input, 1), Ok((3, vec![1, 1])));
        assert!(Many1::new(digit(2)).parse(&input, 0).is_err());
    }

    #[test]
    fn test_many_stops_without_progress() {
        let input = vec![1];
        let parser = Many::new(Optional::new(digit(7)));
        assert_eq!(parser.parse(&input, 0), Ok((0, vec![])));
    }

    #[test]
    fn test_delimited_and_preceded() {
        let input = vec![0, 5, 0];
        let zero = || AsUnit::new(digit(0));
        assert_eq!(
            Delimited::new(zero(), digit(5), zero()).parse(&input, 0),
            Ok((3, 5))
        );
        assert_eq!(Preceded::new(zero(), digit(5)).parse(&input, 0), Ok((2, 5)));
        assert!(Delimited::new(zero(), digit(5), zero()).parse(&input, 1).is_err());
    }

    #[test]
    fn test_with_context() {
        let input = vec![1];
        let error = WithContext::new(digit(2), "number").parse(&input, 0).unwrap_err();
        assert_eq!(error.get_context(), Some("number"));
    }
}
