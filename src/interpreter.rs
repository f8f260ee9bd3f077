/// The evaluator module rewrites expression trees into normal form.
///
/// The evaluator walks an expression bottom-up, performs exact and
/// floating-point arithmetic, applies algebraic identities, broadcasts
/// over lists, resolves bindings, and returns anything irreducible as a
/// symbolic residue. It is the core rewriting engine of the system.
///
/// # Responsibilities
/// - Reduces function calls through the built-in dispatch table.
/// - Applies user-defined functions and variable bindings.
/// - Reports evaluation errors such as type or domain violations.
pub mod evaluator;
/// The lexer module tokenizes source text for further parsing.
///
/// The lexer reads the raw input and produces a stream of tokens, each
/// corresponding to a meaningful element of the surface syntax: numeric,
/// boolean and string literals, identifiers, operators and brackets.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with byte positions.
/// - Handles literal escapes and greedy operator matching.
/// - Reports lexical errors for unrecognized characters.
pub mod lexer;
/// The parser module builds expression trees from tokens.
///
/// The parser processes the token stream through a precedence-climbing
/// grammar, handling operator precedence and associativity, implicit
/// multiplication, bracketed function application, list literals, and the
/// classification of `=`/`:=` targets into assignments and function
/// definitions.
///
/// # Responsibilities
/// - Converts tokens into `Expr` trees.
/// - Validates the grammar, reporting errors with byte positions.
/// - Never returns a partial tree.
pub mod parser;
