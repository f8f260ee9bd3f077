//! # cassia
//!
//! cassia is a small computer algebra system written in Rust.
//! It parses mathematical expressions in a bracket-function notation,
//! represents them as immutable shared trees, and evaluates them under a
//! mutable binding environment with exact rational arithmetic, list
//! broadcasting, and symbolic simplification: whatever cannot be reduced
//! comes back unevaluated instead of failing.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::lexer::Token;

/// Defines the expression tree shared by all components.
///
/// This module declares the `Expr` enum, the reference-counted `ExprRef`
/// handle, factory constructors for every variant, and the two printers:
/// the canonical surface form and the literal tree form.
///
/// # Responsibilities
/// - Defines the closed tagged union of expression variants.
/// - Guarantees immutability and acyclic sharing of subtrees.
/// - Renders stable canonical output that reparses to the same tree.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing,
/// parsing, or evaluating expressions. Parse errors carry byte positions;
/// evaluation errors describe type, arity and domain violations.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates lexing, parsing and evaluation.
///
/// This module ties together the lexer, the precedence parser and the
/// tree-rewriting evaluator, and exposes the building blocks behind the
/// crate-level entry points.
///
/// # Responsibilities
/// - Coordinates the core components across the phases.
/// - Manages the flow of data and errors between them.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// # Responsibilities
/// - Convert between integer and floating-point types without silent
///   data loss.
/// - Provide the integer arithmetic backing exact rationals.
pub mod util;

pub use ast::{Expr, ExprRef, to_string, to_string_raw};
pub use error::{EvalError, ParseError};
pub use interpreter::evaluator::core::{EvaluationContext, evaluate};

/// Parses a single top-level expression.
///
/// The whole input must form exactly one expression: leftover tokens are
/// rejected, as is empty input. On success the expression tree is
/// returned; no partial trees are ever produced.
///
/// # Errors
/// Returns a [`ParseError`] carrying the byte position of the offending
/// token for malformed input, unmatched brackets, trailing input, or an
/// empty source string.
///
/// # Examples
/// ```
/// use cassia::parse_expression;
///
/// let expr = parse_expression("2 + 3 * x").unwrap();
/// assert_eq!(expr.to_string(), "2 + 3*x");
///
/// assert!(parse_expression("2 +").is_err());
/// assert!(parse_expression("2 ) 3").is_err());
/// ```
pub fn parse_expression(source: &str) -> Result<ExprRef, ParseError> {
    let tokens = interpreter::lexer::tokenize(source)?;
    let mut iter = tokens.iter().peekable();

    if iter.peek().is_none() {
        return Err(ParseError::EmptyInput);
    }

    let expr = interpreter::parser::core::parse_expression(&mut iter)?;

    if let Some((token, position)) = iter.peek() {
        let token = match token {
            Token::Identifier(name) => name.clone(),
            other => format!("{other:?}"),
        };
        return Err(ParseError::TrailingInput { token,
                                               position: *position, });
    }

    Ok(expr)
}

/// Parses and evaluates one expression under the given context.
///
/// This is the convenience entry point used by the command-line front
/// end and the documentation examples: assignments and definitions made
/// by earlier calls are visible to later ones through the shared
/// context.
///
/// # Errors
/// Returns the parse or evaluation error as a boxed `std::error::Error`.
///
/// # Examples
/// ```
/// use cassia::{EvaluationContext, eval_source};
///
/// let mut ctx = EvaluationContext::new();
/// eval_source("x = 2", &mut ctx).unwrap();
///
/// let result = eval_source("x^3 + 1", &mut ctx).unwrap();
/// assert_eq!(result.to_string(), "9");
/// ```
pub fn eval_source(source: &str,
                   ctx: &mut EvaluationContext)
                   -> Result<ExprRef, Box<dyn std::error::Error>> {
    let expr = parse_expression(source)?;
    let result = evaluate(&expr, ctx)?;
    Ok(result)
}
