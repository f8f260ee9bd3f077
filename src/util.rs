/// Numeric helpers shared by the parser and the evaluator.
///
/// This module provides safe conversions between integer and
/// floating-point types and the integer arithmetic used to keep rationals
/// reduced. Conversions never lose data silently: values that cannot be
/// represented exactly are rejected through the caller-supplied error.
pub mod num;
