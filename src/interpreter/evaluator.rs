/// Arithmetic built-ins: sums, products, quotients, powers, rounding and
/// the elementary functions, with exact rational reduction.
pub mod arithmetic;
/// The evaluation context, the `evaluate` entry point, and the
/// per-variant evaluation rules including the special forms.
pub mod core;
/// The built-in dispatch table and user-defined function application.
pub mod functions;
/// List broadcasting for elementwise arithmetic, and `Length`.
pub mod lists;
/// Comparison and boolean built-ins.
pub mod logic;
/// String built-ins: join, length, replace and take.
pub mod strings;
