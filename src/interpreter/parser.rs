/// Precedence levels for infix operators: rules, logic, comparisons,
/// string concatenation, sums and products, including implicit
/// multiplication and the product-absorbing right side of `/`.
pub mod binary;
/// The parser entry point and the assignment level: classification of
/// `=` and `:=` targets into assignments and function definitions.
pub mod core;
/// Prefix operators, exponentiation, and primary expressions: literals,
/// symbols, grouping, bracketed function application and list literals.
pub mod unary;
/// Shared helpers: comma-separated sequences and argument patterns.
pub mod utils;
