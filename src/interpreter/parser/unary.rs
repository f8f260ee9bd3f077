use std::iter::Peekable;

use crate::{
    ast::{Expr, ExprRef},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{parse_argument, parse_comma_separated},
        },
    },
    util::num::i64_to_f64_checked,
};

/// Parses a unary expression.
///
/// Supports the prefix operators `-` (negation) and `!` (logical not).
///
/// Negation folds into a directly following numeric literal, so `-2` is
/// the literal `Number(-2)` rather than `Times[-1, 2]` and `-2x` becomes
/// `Times[-2, x]`. The fold is suppressed when the literal is the base of
/// a `^`, because exponentiation binds tighter than the sign: `-2^3`
/// parses as `Times[-1, Power[2, 3]]`.
///
/// All other negations produce `Times[-1, operand]`, with the operand
/// parsed at this same level so that `-x^2` negates the whole power.
///
/// Grammar:
/// ```text
///     unary := ("-" | "!") unary
///            | power
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// The parsed operand with any prefix operators applied.
pub(in crate::interpreter::parser) fn parse_unary<'a, I>(tokens: &mut Peekable<I>)
                                                         -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::Minus, _)) => {
            tokens.next();

            if let Some((Token::Integer(_) | Token::Real(_), _)) = tokens.peek() {
                let mut lookahead = tokens.clone();
                lookahead.next();

                if !matches!(lookahead.peek(), Some((Token::Caret, _))) {
                    let value = parse_number_literal(tokens)?;
                    return Ok(Expr::number(-value));
                }
            }

            let operand = parse_unary(tokens)?;
            Ok(Expr::call("Times", vec![Expr::number(-1.0), operand]))
        },
        Some((Token::Bang, _)) => {
            tokens.next();
            let operand = parse_unary(tokens)?;
            Ok(Expr::call("Not", vec![operand]))
        },
        _ => parse_power(tokens),
    }
}

/// Parses exponentiation.
///
/// `^` is right-associative and binds tighter than the unary operators:
/// `a^b^c` parses as `a^(b^c)`. The exponent is parsed at the unary
/// level so that `2^-3` works without parentheses.
///
/// Grammar: `power := primary ("^" unary)?`
fn parse_power<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_primary(tokens)?;

    if let Some((Token::Caret, _)) = tokens.peek() {
        tokens.next();
        let exponent = parse_unary(tokens)?;
        return Ok(Expr::call("Power", vec![base, exponent]));
    }

    Ok(base)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the grammar:
/// - numeric, boolean and string literals
/// - symbols and bracketed function calls `f[a, b]`
/// - parenthesized expressions
/// - list literals `{a, b, c}`
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier ("[" arguments "]")?
///              | "(" expression ")"
///              | "{" elements "}"
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary
///   expression.
///
/// # Returns
/// The parsed primary expression, or a `ParseError` on failure.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.peek() {
        Some((Token::Integer(_) | Token::Real(_), _)) => {
            let value = parse_number_literal(tokens)?;
            Ok(Expr::number(value))
        },
        Some((Token::Boolean(b), _)) => {
            let b = *b;
            tokens.next();
            Ok(Expr::boolean(b))
        },
        Some((Token::Str(s), _)) => {
            let s = s.clone();
            tokens.next();
            Ok(Expr::string(s))
        },
        Some((Token::LParen, _)) => parse_grouping(tokens),
        Some((Token::LBrace, _)) => parse_list_literal(tokens),
        Some((Token::Identifier(_), _)) => parse_identifier_or_call(tokens),
        Some((tok, position)) => Err(ParseError::UnexpectedToken { token:    format!("{tok:?}"),
                                                                   position: *position, }),
        None => Err(ParseError::UnexpectedEndOfInput { position: 0 }),
    }
}

/// Consumes a numeric literal token and returns its value.
///
/// Integer literals are promoted with `i64_to_f64_checked`, so a literal
/// outside the exactly-representable range fails instead of silently
/// losing precision.
fn parse_number_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<f64>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    match tokens.next() {
        Some((Token::Integer(n), position)) => {
            i64_to_f64_checked(*n, ParseError::LiteralTooLarge { position: *position, })
        },
        Some((Token::Real(r), _)) => Ok(*r),
        _ => unreachable!(),
    }
}

/// Parses a parenthesized expression.
///
/// The function consumes the opening parenthesis, parses the enclosed
/// expression, and requires a closing `)`. The inner expression is
/// returned as-is, with no wrapper node.
///
/// Grammar: `grouping := "(" expression ")"`
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (_, position) = *tokens.next().unwrap();
    let expr = parse_expression(tokens)?;
    match tokens.next() {
        Some((Token::RParen, _)) => Ok(expr),
        _ => Err(ParseError::ExpectedClosingParen { position }),
    }
}

/// Parses a list literal of the form `{expr1, expr2, ..., exprN}`.
///
/// The empty list `{}` is permitted. The parser represents list literals
/// as `FunctionCall("List", ...)`; evaluation normalizes them to the
/// dedicated `List` variant.
fn parse_list_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (_, position) = *tokens.next().unwrap();
    let elements = parse_comma_separated(tokens, parse_expression, &Token::RBrace, position)?;
    Ok(Expr::call("List", elements))
}

/// Parses a symbol or a bracketed function call.
///
/// Identifiers are maximal `[A-Za-z_][A-Za-z0-9_]*` runs, so `bC` is a
/// single symbol while `b C` multiplies. The case of a head is preserved
/// exactly: `Sin[x]` and `sin[x]` are different calls.
///
/// # Returns
/// - `FunctionCall` when `[` directly follows the identifier,
/// - `Symbol` otherwise.
fn parse_identifier_or_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (name, _) = match tokens.next() {
        Some((Token::Identifier(n), position)) => (n.clone(), *position),
        _ => unreachable!(),
    };

    if let Some((Token::LBracket, position)) = tokens.peek() {
        let position = *position;
        tokens.next();
        let args = parse_comma_separated(tokens, parse_argument, &Token::RBracket, position)?;
        return Ok(Expr::call(name, args));
    }

    Ok(Expr::symbol(name))
}
