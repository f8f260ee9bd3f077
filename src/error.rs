/// Parsing errors.
///
/// Defines all error types that can occur while lexing and parsing surface
/// syntax. Parse errors carry the byte position of the offending token and
/// never come with a partial tree.
pub mod parse_error;
/// Evaluation errors.
///
/// Contains all error types that can be raised while evaluating an
/// expression tree: wrong operand types, wrong argument counts, and
/// operations applied outside their domain. Symbolic residues are not
/// errors; division by zero materializes as a marker expression rather
/// than an error.
pub mod eval_error;

pub use eval_error::EvalError;
pub use parse_error::ParseError;
