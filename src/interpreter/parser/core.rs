use std::iter::Peekable;

use crate::{
    ast::{Expr, ExprRef, FunctionDef, Parameter},
    error::ParseError,
    interpreter::{lexer::Token, parser::binary::parse_or},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, the assignment operators `=` and `:=`, and
/// recursively descends through the precedence hierarchy.
///
/// Grammar: `expression := set`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, position)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_set(tokens)
}

/// Parses the assignment level.
///
/// `=` and `:=` are right-associative and bind loosest of all operators.
/// The left side is not an arbitrary expression: it must be a bare symbol
/// (assignment) or a function-call pattern such as `f[x_, y_:0]`
/// (function definition). Classification happens after the right side is
/// parsed, so the target is validated exactly once.
///
/// Grammar: `set := rule (("=" | ":=") set)?`
///
/// # Errors
/// - `InvalidAssignmentTarget` when the left side fits neither form.
/// - `InvalidParameterPattern` when a definition argument is not a
///   `name_` / `name_:default` pattern.
fn parse_set<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let lhs = parse_rule(tokens)?;

    let (delayed, position) = match tokens.peek() {
        Some((Token::Equals, position)) => (false, *position),
        Some((Token::ColonEquals, position)) => (true, *position),
        _ => return Ok(lhs),
    };
    tokens.next();

    let body = parse_set(tokens)?;

    match &*lhs {
        Expr::Symbol(name) if !delayed => Ok(Expr::assignment(name.clone(), body)),
        Expr::FunctionCall { head, args } if head != "List" => {
            let params = into_parameters(args, position)?;
            Ok(Expr::definition(FunctionDef { name: head.clone(),
                                              params,
                                              body,
                                              delayed }))
        },
        _ => Err(ParseError::InvalidAssignmentTarget { position }),
    }
}

/// Converts the argument list of a definition target into parameters.
///
/// Accepts `name_` symbols and the `Optional[name_, default]` wrappers
/// produced for `name_:default` arguments; anything else fails.
fn into_parameters(args: &[ExprRef], position: usize) -> ParseResult<Vec<Parameter>> {
    let mut params = Vec::with_capacity(args.len());

    for arg in args {
        match &**arg {
            Expr::Symbol(name) if name.len() > 1 && name.ends_with('_') => {
                params.push(Parameter { name:    name[..name.len() - 1].to_string(),
                                        default: None, });
            },
            Expr::FunctionCall { head, args: inner } if head == "Optional" && inner.len() == 2 => {
                if let Expr::Symbol(name) = &*inner[0] {
                    params.push(Parameter { name:    name[..name.len() - 1].to_string(),
                                            default: Some(inner[1].clone()), });
                } else {
                    return Err(ParseError::InvalidParameterPattern { pattern: inner[0].to_string(),
                                                                     position });
                }
            },
            other => {
                return Err(ParseError::InvalidParameterPattern { pattern: other.to_string(),
                                                                 position });
            },
        }
    }

    Ok(params)
}

/// Parses the rule level.
///
/// `->` is right-associative and sits between assignment and logical OR:
/// `a -> b -> c` parses as `a -> (b -> c)`, and `"a" <> "b" -> "c"`
/// groups the concatenation on the left.
///
/// Grammar: `rule := or ("->" rule)?`
pub(in crate::interpreter::parser) fn parse_rule<'a, I>(tokens: &mut Peekable<I>)
                                                        -> ParseResult<ExprRef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let lhs = parse_or(tokens)?;

    if let Some((Token::Arrow, _)) = tokens.peek() {
        tokens.next();
        let rhs = parse_rule(tokens)?;
        return Ok(Expr::rule(lhs, rhs));
    }

    Ok(lhs)
}
