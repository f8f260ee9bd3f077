use std::iter::Peekable;

use crate::{
    ast::{Expr, ExprRef},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
    },
};

/// Parses logical OR expressions.
///
/// Handles left-associative chains of `||`. Precedence is the lowest of
/// the value-producing operators, directly above `->`.
///
/// Grammar: `or := and ("||" and)*`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, position)` pairs.
///
/// # Returns
/// An `Or` call tree, or the single operand when no `||` is present.
pub(in crate::interpreter::parser) fn parse_or<'a, I>(tokens: &mut Peekable<I>)
                                                      -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_and(tokens)?;

    while let Some((Token::DoublePipe, _)) = tokens.peek() {
        tokens.next();
        let right = parse_and(tokens)?;
        left = Expr::call("Or", vec![left, right]);
    }

    Ok(left)
}

/// Parses logical AND expressions.
///
/// Handles left-associative chains of `&&`, binding tighter than `||`:
/// `True && False || True` groups as `(True && False) || True`.
///
/// Grammar: `and := comparison ("&&" comparison)*`
fn parse_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_comparison(tokens)?;

    while let Some((Token::DoubleAmp, _)) = tokens.peek() {
        tokens.next();
        let right = parse_comparison(tokens)?;
        left = Expr::call("And", vec![left, right]);
    }

    Ok(left)
}

/// Maps a comparison token to the head it produces.
const fn comparison_head(token: &Token) -> Option<&'static str> {
    match token {
        Token::EqualEqual => Some("Equal"),
        Token::BangEqual => Some("Unequal"),
        Token::Less => Some("Less"),
        Token::LessEqual => Some("LessEqual"),
        Token::Greater => Some("Greater"),
        Token::GreaterEqual => Some("GreaterEqual"),
        _ => None,
    }
}

/// Parses comparison expressions.
///
/// Comparisons are non-associative: at most one of `==`, `!=`, `<`, `<=`,
/// `>`, `>=` may appear at this level, so `a < b < c` leaves the second
/// `<` unconsumed and the caller reports it as trailing input.
///
/// Grammar: `comparison := concat (compare_op concat)?`
fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let left = parse_concat(tokens)?;

    if let Some((token, _)) = tokens.peek()
       && let Some(head) = comparison_head(token)
    {
        tokens.next();
        let right = parse_concat(tokens)?;
        return Ok(Expr::call(head, vec![left, right]));
    }

    Ok(left)
}

/// Parses string concatenation.
///
/// `<>` chains flatten into a single n-ary `StringJoin`:
/// `"a" <> "b" <> "c"` is `StringJoin["a", "b", "c"]`, not a nested pair.
///
/// Grammar: `concat := additive ("<>" additive)*`
fn parse_concat<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_additive(tokens)?;

    while let Some((Token::Concat, _)) = tokens.peek() {
        tokens.next();
        let right = parse_additive(tokens)?;
        left = flattened("StringJoin", left, right);
    }

    Ok(left)
}

/// Parses addition and subtraction.
///
/// `+` is left-associative and flattens consecutive operands into one
/// n-ary `Plus`; binary `-` produces `Subtract` and interrupts the
/// flattening, so `a - b + c` is `Plus[Subtract[a, b], c]`.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;

    loop {
        match tokens.peek() {
            Some((Token::Plus, _)) => {
                tokens.next();
                let right = parse_multiplicative(tokens)?;
                left = flattened("Plus", left, right);
            },
            Some((Token::Minus, _)) => {
                tokens.next();
                let right = parse_multiplicative(tokens)?;
                left = Expr::call("Subtract", vec![left, right]);
            },
            _ => break,
        }
    }

    Ok(left)
}

/// `true` when a token can begin an implicit-multiplication factor:
/// an identifier (symbol or function call) or an opening parenthesis.
const fn starts_implicit_factor(token: &Token) -> bool {
    matches!(token, Token::Identifier(_) | Token::LParen)
}

/// Parses multiplication, division and implicit multiplication.
///
/// `*` flattens into an n-ary `Times`, and plain adjacency does the same:
/// `2x`, `2(3 + x)` and `b C` all multiply. `/` produces `Divide`; its
/// right operand greedily absorbs an adjacent implicit product, so
/// `x/2y` is `Divide[x, Times[2, y]]` while `x/2*y` is
/// `Times[Divide[x, 2], y]`.
///
/// Grammar:
/// ```text
///     multiplicative := unary (("*" unary) | ("/" divisor) | unary')*
/// ```
/// where `unary'` is an adjacent factor starting with an identifier or
/// `(`.
fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_unary(tokens)?;

    loop {
        match tokens.peek() {
            Some((Token::Star, _)) => {
                tokens.next();
                let right = parse_unary(tokens)?;
                left = flattened("Times", left, right);
            },
            Some((Token::Slash, _)) => {
                tokens.next();
                let right = parse_divisor(tokens)?;
                left = Expr::call("Divide", vec![left, right]);
            },
            Some((token, _)) if starts_implicit_factor(token) => {
                let right = parse_unary(tokens)?;
                left = flattened("Times", left, right);
            },
            _ => break,
        }
    }

    Ok(left)
}

/// Parses the right operand of `/`.
///
/// The divisor is one unary operand together with any directly adjacent
/// implicit factors, but no explicit operators: the implicit product in
/// the denominator binds tighter than a following `*` or `/`.
fn parse_divisor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut divisor = parse_unary(tokens)?;

    while let Some((token, _)) = tokens.peek() {
        if !starts_implicit_factor(token) {
            break;
        }
        let right = parse_unary(tokens)?;
        divisor = flattened("Times", divisor, right);
    }

    Ok(divisor)
}

/// Combines two operands under an n-ary head, splicing in the arguments
/// of any operand that already carries the same head. This keeps `Plus`,
/// `Times` and `StringJoin` chains flat regardless of grouping, which the
/// canonical printer relies on for stable round trips.
fn flattened(head: &str, left: ExprRef, right: ExprRef) -> ExprRef {
    let mut args = Vec::new();
    splice(&mut args, left, head);
    splice(&mut args, right, head);
    Expr::call(head, args)
}

/// Appends an operand, splicing same-head calls instead of nesting them.
fn splice(args: &mut Vec<ExprRef>, operand: ExprRef, head: &str) {
    match &*operand {
        Expr::FunctionCall { head: h, args: inner } if h == head => {
            args.extend(inner.iter().cloned());
        },
        _ => args.push(operand),
    }
}
