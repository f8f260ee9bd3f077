use std::iter::Peekable;

use crate::{
    ast::{Expr, ExprRef},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, parse_expression},
    },
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals and function argument lists.
/// It repeatedly calls `parse_item` to parse one element, expecting either
/// a comma to continue the list or the specified closing token to end it.
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing
///   token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (`]` or `}`).
/// - `open_position`: Byte position of the opening bracket, used when the
///   closing token never arrives.
///
/// # Returns
/// A vector of parsed items. The closing token is consumed.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, an unexpected token
/// is encountered, or the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    open_position: usize)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && *tok == *closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if *tok == *closing => {
                tokens.next();
                break;
            },
            Some((tok, position)) => {
                return Err(ParseError::UnexpectedToken { token:    format!("{tok:?}"),
                                                         position: *position, });
            },
            None => return Err(missing_closing(closing, open_position)),
        }
    }
    Ok(items)
}

/// Builds the error for a sequence whose closing token never arrived.
fn missing_closing(closing: &Token, open_position: usize) -> ParseError {
    match closing {
        Token::RBracket => ParseError::ExpectedClosingBracket { position: open_position, },
        Token::RBrace => ParseError::ExpectedClosingBrace { position: open_position, },
        _ => ParseError::UnexpectedEndOfInput { position: open_position, },
    }
}

/// Parses one function-call argument, which may be a default-carrying
/// parameter pattern.
///
/// A plain argument is a full expression. When the expression is a
/// pattern symbol like `x_` and a `:` follows, the default expression is
/// parsed and the pair is wrapped into an internal `Optional[x_, default]`
/// call. Only the definition classifier in `core` consumes that wrapper;
/// a `:` after anything other than a pattern symbol is a parse error.
///
/// # Errors
/// Returns `InvalidParameterPattern` when `:` follows a non-pattern
/// argument, or any error from the underlying expression parsers.
pub(in crate::interpreter::parser) fn parse_argument<'a, I>(tokens: &mut Peekable<I>)
                                                            -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let expr = parse_expression(tokens)?;

    if let Some((Token::Colon, position)) = tokens.peek() {
        let position = *position;
        if !is_pattern_symbol(&expr) {
            return Err(ParseError::InvalidParameterPattern { pattern: expr.to_string(),
                                                             position });
        }
        tokens.next();

        let default = parse_expression(tokens)?;
        return Ok(Expr::call("Optional", vec![expr, default]));
    }

    Ok(expr)
}

/// `true` when the expression is a parameter pattern symbol (`x_`).
pub(in crate::interpreter::parser) fn is_pattern_symbol(expr: &Expr) -> bool {
    matches!(expr, Expr::Symbol(name) if name.len() > 1 && name.ends_with('_'))
}
