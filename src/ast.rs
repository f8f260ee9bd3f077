use std::rc::Rc;

/// Shared handle to an immutable expression node.
///
/// Subtrees are reference counted and may appear in any number of parents.
/// Constructors never install a parent into one of its descendants, so
/// expression trees are acyclic by construction.
pub type ExprRef = Rc<Expr>;

/// A node in the expression tree.
///
/// `Expr` is the single data model shared by the parser, the evaluator and
/// the printers. It covers atomic values (numbers, rationals, booleans,
/// strings), symbols, lists, applied functions, and the binding forms
/// produced by `=`, `:=` and `->`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An IEEE-754 double. Integer literals are numbers with zero
    /// fractional part.
    Number(f64),
    /// An exact quotient of 64-bit integers. The evaluator only constructs
    /// reduced rationals with a positive denominator.
    Rational {
        /// Signed numerator.
        numerator:   i64,
        /// Denominator, never zero.
        denominator: i64,
    },
    /// A complex number. Carried by the data model but not yet produced by
    /// any built-in.
    Complex {
        /// Real part.
        re: f64,
        /// Imaginary part.
        im: f64,
    },
    /// `True` or `False`.
    Boolean(bool),
    /// A UTF-8 string literal.
    Str(String),
    /// An identifier: a bound variable, a named constant such as `Pi`, or
    /// a free symbol.
    Symbol(String),
    /// An ordered sequence of expressions. The parser emits
    /// `FunctionCall("List", ...)`; evaluation normalizes to this variant.
    /// Use [`Expr::as_list`] to accept both.
    List(Vec<ExprRef>),
    /// An applied function: a head name and its argument sequence.
    FunctionCall {
        /// Operation name, e.g. `Plus` or `Sin`.
        head: String,
        /// Ordered arguments.
        args: Vec<ExprRef>,
    },
    /// A user function definition produced by `f[x_] = body` or
    /// `f[x_] := body`.
    FunctionDefinition(FunctionDef),
    /// A variable assignment produced by `name = value`.
    Assignment {
        /// Target variable name.
        name:  String,
        /// Assigned expression.
        value: ExprRef,
    },
    /// A replacement rule produced by `lhs -> rhs`.
    Rule {
        /// Pattern side.
        lhs: ExprRef,
        /// Replacement side.
        rhs: ExprRef,
    },
    /// The unsigned infinity marker.
    Infinity,
    /// The undefined-result marker produced by forms such as `0/0`.
    Indeterminate,
}

/// One parameter of a user-defined function.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name, without the trailing `_` of the surface pattern.
    pub name:    String,
    /// Default expression used when the caller omits the argument.
    pub default: Option<ExprRef>,
}

/// A user-defined function: name, parameters, body and evaluation mode.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name.
    pub name:    String,
    /// Declared parameters in order.
    pub params:  Vec<Parameter>,
    /// The body expression.
    pub body:    ExprRef,
    /// `true` for `:=` (body stored unevaluated, evaluated per call),
    /// `false` for `=` (body evaluated once at definition time).
    pub delayed: bool,
}

impl Expr {
    /// Creates a number node.
    #[must_use]
    pub fn number(value: f64) -> ExprRef {
        Rc::new(Self::Number(value))
    }

    /// Creates a rational node as given. The evaluator's arithmetic always
    /// reduces before constructing, so rationals it returns are in lowest
    /// terms with a positive denominator.
    #[must_use]
    pub fn rational(numerator: i64, denominator: i64) -> ExprRef {
        Rc::new(Self::Rational { numerator,
                                 denominator })
    }

    /// Creates a complex node.
    #[must_use]
    pub fn complex(re: f64, im: f64) -> ExprRef {
        Rc::new(Self::Complex { re, im })
    }

    /// Creates a boolean node.
    #[must_use]
    pub fn boolean(value: bool) -> ExprRef {
        Rc::new(Self::Boolean(value))
    }

    /// Creates a string node.
    #[must_use]
    pub fn string(value: impl Into<String>) -> ExprRef {
        Rc::new(Self::Str(value.into()))
    }

    /// Creates a symbol node.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> ExprRef {
        Rc::new(Self::Symbol(name.into()))
    }

    /// Creates a list node.
    #[must_use]
    pub fn list(elements: Vec<ExprRef>) -> ExprRef {
        Rc::new(Self::List(elements))
    }

    /// Creates a function-call node.
    #[must_use]
    pub fn call(head: impl Into<String>, args: Vec<ExprRef>) -> ExprRef {
        Rc::new(Self::FunctionCall { head: head.into(),
                                     args })
    }

    /// Creates a function-definition node.
    #[must_use]
    pub fn definition(def: FunctionDef) -> ExprRef {
        Rc::new(Self::FunctionDefinition(def))
    }

    /// Creates an assignment node.
    #[must_use]
    pub fn assignment(name: impl Into<String>, value: ExprRef) -> ExprRef {
        Rc::new(Self::Assignment { name: name.into(),
                                   value })
    }

    /// Creates a rule node.
    #[must_use]
    pub fn rule(lhs: ExprRef, rhs: ExprRef) -> ExprRef {
        Rc::new(Self::Rule { lhs, rhs })
    }

    /// Returns the infinity marker.
    #[must_use]
    pub fn infinity() -> ExprRef {
        Rc::new(Self::Infinity)
    }

    /// Returns the indeterminate marker.
    #[must_use]
    pub fn indeterminate() -> ExprRef {
        Rc::new(Self::Indeterminate)
    }

    /// Views this expression as a list, accepting both the dedicated
    /// `List` variant and the parser's `FunctionCall("List", ...)` form.
    ///
    /// # Example
    /// ```
    /// use cassia::ast::Expr;
    ///
    /// let dedicated = Expr::list(vec![Expr::number(1.0)]);
    /// let parsed = Expr::call("List", vec![Expr::number(1.0)]);
    ///
    /// assert_eq!(dedicated.as_list().unwrap().len(), 1);
    /// assert_eq!(dedicated.as_list(), parsed.as_list());
    /// ```
    #[must_use]
    pub fn as_list(&self) -> Option<&[ExprRef]> {
        match self {
            Self::List(elements) => Some(elements),
            Self::FunctionCall { head, args } if head == "List" => Some(args),
            _ => None,
        }
    }

    /// Returns `true` if the expression is a `Number` or a `Rational`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Rational { .. })
    }

    /// Returns the numeric value of a `Number` or `Rational` as `f64`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Rational { numerator,
                             denominator, } => Some(*numerator as f64 / *denominator as f64),
            _ => None,
        }
    }
}

// Printing. `Display` renders the canonical surface form, which reparses
// to the same tree for every non-ambiguous input; `to_string_raw` renders
// the tree shape literally.

/// Binding strengths used by the canonical printer. Mirrors the parser's
/// precedence chain; a child is parenthesized when its own level is below
/// the level its context requires.
mod prec {
    pub const SET: u8 = 1;
    pub const RULE: u8 = 2;
    pub const OR: u8 = 3;
    pub const AND: u8 = 4;
    pub const COMPARE: u8 = 5;
    pub const CONCAT: u8 = 6;
    pub const ADD: u8 = 7;
    pub const MUL: u8 = 8;
    pub const UNARY: u8 = 9;
    pub const POWER: u8 = 10;
    pub const ATOM: u8 = 11;
}

/// Maps comparison heads to their surface operator.
fn comparison_operator(head: &str) -> Option<&'static str> {
    match head {
        "Equal" => Some("=="),
        "Unequal" => Some("!="),
        "Less" => Some("<"),
        "LessEqual" => Some("<="),
        "Greater" => Some(">"),
        "GreaterEqual" => Some(">="),
        _ => None,
    }
}

/// Writes a numeric literal, omitting the fractional part when the value
/// is integral.
#[allow(clippy::cast_possible_truncation)]
fn write_number(f: &mut std::fmt::Formatter<'_>, value: f64) -> std::fmt::Result {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

/// Writes a string literal with escapes re-applied.
fn write_quoted(f: &mut std::fmt::Formatter<'_>, value: &str) -> std::fmt::Result {
    write!(f, "\"")?;
    for c in value.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            _ => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

impl Expr {
    /// The binding strength of this expression's printed form.
    fn print_level(&self) -> u8 {
        match self {
            Self::Assignment { .. } | Self::FunctionDefinition(_) => prec::SET,
            Self::Rule { .. } => prec::RULE,
            Self::Rational { .. } => prec::MUL,
            Self::Number(v) if *v < 0.0 => prec::UNARY,
            Self::FunctionCall { head, args } => match head.as_str() {
                "Or" if args.len() >= 2 => prec::OR,
                "And" if args.len() >= 2 => prec::AND,
                "StringJoin" if args.len() >= 2 => prec::CONCAT,
                "Plus" if !args.is_empty() => prec::ADD,
                "Subtract" if args.len() == 2 => prec::ADD,
                "Times" if is_negation(args) => prec::UNARY,
                "Times" if !args.is_empty() => prec::MUL,
                "Divide" if args.len() == 2 => prec::MUL,
                "Not" if args.len() == 1 => prec::UNARY,
                "Power" if args.len() == 2 => prec::POWER,
                _ if comparison_operator(head).is_some() && args.len() == 2 => prec::COMPARE,
                _ => prec::ATOM,
            },
            _ => prec::ATOM,
        }
    }

    /// Writes the canonical form, parenthesizing when this expression
    /// binds more loosely than `min_level` requires.
    fn fmt_level(&self, f: &mut std::fmt::Formatter<'_>, min_level: u8) -> std::fmt::Result {
        if self.print_level() < min_level {
            write!(f, "(")?;
            self.fmt_level(f, 0)?;
            return write!(f, ")");
        }

        match self {
            Self::Number(v) => write_number(f, *v),
            Self::Rational { numerator,
                             denominator, } => write!(f, "{numerator}/{denominator}"),
            Self::Complex { re, im } => {
                write!(f, "Complex[")?;
                write_number(f, *re)?;
                write!(f, ", ")?;
                write_number(f, *im)?;
                write!(f, "]")
            },
            Self::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Self::Str(s) => write_quoted(f, s),
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Infinity => write!(f, "Infinity"),
            Self::Indeterminate => write!(f, "Indeterminate"),
            Self::List(elements) => write_braced(f, elements),
            Self::Assignment { name, value } => {
                write!(f, "{name} = ")?;
                value.fmt_level(f, prec::SET)
            },
            Self::Rule { lhs, rhs } => {
                lhs.fmt_level(f, prec::OR)?;
                write!(f, " -> ")?;
                rhs.fmt_level(f, prec::RULE)
            },
            Self::FunctionDefinition(def) => {
                write_definition_head(f, def)?;
                write!(f, " {} ", if def.delayed { ":=" } else { "=" })?;
                def.body.fmt_level(f, prec::SET)
            },
            Self::FunctionCall { head, args } => fmt_call(f, head, args),
        }
    }
}

/// Writes `{a, b, c}`.
fn write_braced(f: &mut std::fmt::Formatter<'_>, elements: &[ExprRef]) -> std::fmt::Result {
    write!(f, "{{")?;
    for (i, e) in elements.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        e.fmt_level(f, 0)?;
    }
    write!(f, "}}")
}

/// Writes the `f[x_, y_:d]` head of a definition.
fn write_definition_head(f: &mut std::fmt::Formatter<'_>, def: &FunctionDef) -> std::fmt::Result {
    write!(f, "{}[", def.name)?;
    for (i, p) in def.params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}_", p.name)?;
        if let Some(default) = &p.default {
            write!(f, ":")?;
            default.fmt_level(f, prec::ATOM)?;
        }
    }
    write!(f, "]")
}

/// `true` when a `Times` argument list encodes a unary negation.
fn is_negation(args: &[ExprRef]) -> bool {
    args.len() == 2 && matches!(*args[0], Expr::Number(v) if v == -1.0)
}

/// Writes an infix chain `a <op> b <op> c` with the given child level.
fn fmt_infix(f: &mut std::fmt::Formatter<'_>,
             args: &[ExprRef],
             operator: &str,
             child_level: u8)
             -> std::fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, "{operator}")?;
        }
        arg.fmt_level(f, child_level)?;
    }
    Ok(())
}

/// Canonical rendering of an applied function, using operator notation for
/// the heads the surface grammar can express.
fn fmt_call(f: &mut std::fmt::Formatter<'_>, head: &str, args: &[ExprRef]) -> std::fmt::Result {
    if let Some(op) = comparison_operator(head)
       && args.len() == 2
    {
        args[0].fmt_level(f, prec::CONCAT)?;
        write!(f, " {op} ")?;
        return args[1].fmt_level(f, prec::CONCAT);
    }

    match (head, args) {
        ("List", _) => write_braced(f, args),
        ("Plus", _) if !args.is_empty() => fmt_infix(f, args, " + ", prec::ADD),
        ("Subtract", [a, b]) => {
            a.fmt_level(f, prec::ADD)?;
            write!(f, " - ")?;
            b.fmt_level(f, prec::MUL)
        },
        ("Times", _) if is_negation(args) => {
            write!(f, "-")?;
            args[1].fmt_level(f, prec::UNARY)
        },
        ("Times", _) if !args.is_empty() => fmt_infix(f, args, "*", prec::UNARY),
        ("Divide", [a, b]) => {
            a.fmt_level(f, prec::MUL)?;
            write!(f, "/")?;
            b.fmt_level(f, prec::UNARY)
        },
        ("Power", [base, exponent]) => {
            // A negative numeric base binds like a unary minus, so the
            // ATOM requirement parenthesizes it: (-2)^3, not -2^3.
            base.fmt_level(f, prec::ATOM)?;
            write!(f, "^")?;
            exponent.fmt_level(f, prec::UNARY)
        },
        ("And", _) if args.len() >= 2 => fmt_infix(f, args, " && ", prec::AND),
        ("Or", _) if args.len() >= 2 => fmt_infix(f, args, " || ", prec::OR),
        ("Not", [x]) => {
            write!(f, "!")?;
            x.fmt_level(f, prec::POWER)
        },
        ("StringJoin", _) if args.len() >= 2 => fmt_infix(f, args, " <> ", prec::CONCAT),
        _ => {
            write!(f, "{head}[")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                arg.fmt_level(f, 0)?;
            }
            write!(f, "]")
        },
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_level(f, 0)
    }
}

/// Renders the canonical surface form of an expression.
///
/// Equal trees always render equally, and reparsing the result yields the
/// original tree for every non-ambiguous input.
#[must_use]
pub fn to_string(expr: &Expr) -> String {
    expr.to_string()
}

/// Renders the literal tree shape, e.g. `Plus[2, x]`.
///
/// Operator sugar is not used: every function call prints in bracket form,
/// assignments print as `Set[...]`, delayed definitions as
/// `SetDelayed[...]`, and rules as `Rule[...]`.
#[must_use]
pub fn to_string_raw(expr: &Expr) -> String {
    let mut out = String::new();
    write_raw(&mut out, expr);
    out
}

#[allow(clippy::cast_possible_truncation)]
fn write_raw(out: &mut String, expr: &Expr) {
    use std::fmt::Write;

    match expr {
        Expr::Number(v) => {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                let _ = write!(out, "{}", *v as i64);
            } else {
                let _ = write!(out, "{v}");
            }
        },
        Expr::Rational { numerator,
                         denominator, } => {
            let _ = write!(out, "Rational[{numerator}, {denominator}]");
        },
        Expr::Complex { re, im } => {
            let _ = write!(out, "Complex[{re}, {im}]");
        },
        Expr::Boolean(b) => out.push_str(if *b { "True" } else { "False" }),
        Expr::Str(s) => {
            let _ = write!(out, "{s:?}");
        },
        Expr::Symbol(name) => out.push_str(name),
        Expr::Infinity => out.push_str("Infinity"),
        Expr::Indeterminate => out.push_str("Indeterminate"),
        Expr::List(elements) => write_raw_call(out, "List", elements),
        Expr::FunctionCall { head, args } => write_raw_call(out, head, args),
        Expr::Assignment { name, value } => {
            out.push_str("Set[");
            out.push_str(name);
            out.push_str(", ");
            write_raw(out, value);
            out.push(']');
        },
        Expr::Rule { lhs, rhs } => {
            out.push_str("Rule[");
            write_raw(out, lhs);
            out.push_str(", ");
            write_raw(out, rhs);
            out.push(']');
        },
        Expr::FunctionDefinition(def) => {
            out.push_str(if def.delayed { "SetDelayed[" } else { "Set[" });
            out.push_str(&def.name);
            out.push('[');
            for (i, p) in def.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&p.name);
                out.push('_');
                if let Some(default) = &p.default {
                    out.push(':');
                    write_raw(out, default);
                }
            }
            out.push_str("], ");
            write_raw(out, &def.body);
            out.push(']');
        },
    }
}

fn write_raw_call(out: &mut String, head: &str, args: &[ExprRef]) {
    out.push_str(head);
    out.push('[');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_raw(out, arg);
    }
    out.push(']');
}
