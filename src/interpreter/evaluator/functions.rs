use std::collections::HashMap;

use crate::{
    ast::{Expr, ExprRef, FunctionDef},
    error::EvalError,
    interpreter::evaluator::{
        arithmetic,
        core::{EvalResult, EvaluationContext},
        lists, logic, strings,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the slice of evaluated argument expressions and
/// returns the reduced expression, which may be a symbolic residue.
type BuiltinFn = fn(&[ExprRef]) -> EvalResult<ExprRef>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name
/// list.
///
/// Each entry provides:
/// - a head name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin head names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        pub(crate) struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "Plus"          => { arity: Arity::AtLeast(1), func: arithmetic::plus },
    "Times"         => { arity: Arity::AtLeast(1), func: arithmetic::times },
    "Subtract"      => { arity: Arity::Exact(2), func: arithmetic::subtract },
    "Divide"        => { arity: Arity::Exact(2), func: arithmetic::divide },
    "Power"         => { arity: Arity::Exact(2), func: arithmetic::power },
    "Floor"         => { arity: Arity::Exact(1), func: |args| arithmetic::unary_numeric("Floor", args, f64::floor) },
    "Ceiling"       => { arity: Arity::Exact(1), func: |args| arithmetic::unary_numeric("Ceiling", args, f64::ceil) },
    "Round"         => { arity: Arity::Exact(1), func: |args| arithmetic::unary_numeric("Round", args, f64::round) },
    "Sqrt"          => { arity: Arity::Exact(1), func: arithmetic::sqrt },
    "Exp"           => { arity: Arity::Exact(1), func: |args| arithmetic::unary_numeric("Exp", args, f64::exp) },
    "Sin"           => { arity: Arity::Exact(1), func: |args| arithmetic::unary_numeric("Sin", args, f64::sin) },
    "Cos"           => { arity: Arity::Exact(1), func: |args| arithmetic::unary_numeric("Cos", args, f64::cos) },
    "Not"           => { arity: Arity::Exact(1), func: logic::not },
    "Equal"         => { arity: Arity::Exact(2), func: |args| logic::compare("Equal", args) },
    "Unequal"       => { arity: Arity::Exact(2), func: |args| logic::compare("Unequal", args) },
    "Less"          => { arity: Arity::Exact(2), func: |args| logic::compare("Less", args) },
    "LessEqual"     => { arity: Arity::Exact(2), func: |args| logic::compare("LessEqual", args) },
    "Greater"       => { arity: Arity::Exact(2), func: |args| logic::compare("Greater", args) },
    "GreaterEqual"  => { arity: Arity::Exact(2), func: |args| logic::compare("GreaterEqual", args) },
    "Length"        => { arity: Arity::Exact(1), func: lists::length },
    "StringJoin"    => { arity: Arity::AtLeast(1), func: strings::string_join },
    "StringLength"  => { arity: Arity::Exact(1), func: strings::string_length },
    "StringReplace" => { arity: Arity::Exact(2), func: strings::string_replace },
    "StringTake"    => { arity: Arity::Exact(2), func: strings::string_take },
}

/// Heads whose built-ins lift elementwise over `List` operands.
const BROADCAST_HEADS: &[&str] = &["Plus", "Times", "Subtract", "Divide", "Power"];

/// Named constants recognized by the evaluator, with the value used when
/// a numeric built-in consumes them. The symbols themselves stay
/// symbolic in arithmetic residues.
pub const CONSTANTS: &[(&str, f64)] = &[("Pi", std::f64::consts::PI),
                                        ("E", std::f64::consts::E),
                                        ("Degree", std::f64::consts::PI / 180.0),
                                        ("GoldenRatio", 1.618_033_988_749_894_8),
                                        ("Catalan", 0.915_965_594_177_219),
                                        ("EulerGamma", 0.577_215_664_901_532_9)];

/// Looks up the numeric value of a named constant.
#[must_use]
pub fn constant_value(name: &str) -> Option<f64> {
    CONSTANTS.iter()
             .find(|(constant, _)| *constant == name)
             .map(|(_, value)| *value)
}

/// `true` for symbols that may not be assigned or redefined: the named
/// constants and the singleton markers.
#[must_use]
pub fn is_reserved_symbol(name: &str) -> bool {
    name == "Infinity" || name == "Indeterminate" || constant_value(name).is_some()
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity
    /// constraint.
    const fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::AtLeast(m) => n >= *m,
        }
    }
}

/// Finds the builtin definition for a head name.
pub(crate) fn lookup(head: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|b| b.name == head)
}

/// Executes a builtin on already-evaluated arguments.
///
/// Arity is verified first. For the arithmetic heads, a `List` among the
/// arguments routes the call through elementwise broadcasting, which
/// recurses back into this function per element.
pub(crate) fn apply(def: &'static BuiltinDef, args: &[ExprRef]) -> EvalResult<ExprRef> {
    if !def.arity.check(args.len()) {
        return Err(EvalError::ArityError { head:  def.name.to_string(),
                                           found: args.len(), });
    }

    if BROADCAST_HEADS.contains(&def.name) && args.iter().any(|a| a.as_list().is_some()) {
        return lists::broadcast(def.name, args);
    }

    (def.func)(args)
}

/// Applies a head to evaluated arguments by name: builtins reduce,
/// anything else stays a symbolic call. Used by the broadcasting
/// recursion, where a nested list re-enters the same dispatch.
pub(crate) fn apply_by_name(head: &str, args: &[ExprRef]) -> EvalResult<ExprRef> {
    match lookup(head) {
        Some(def) => apply(def, args),
        None => Ok(Expr::call(head, args.to_vec())),
    }
}

impl EvaluationContext {
    /// Executes a user-defined function.
    ///
    /// Each declared parameter binds the corresponding evaluated
    /// argument; missing trailing arguments fall back to the parameter's
    /// default, which is evaluated at call time. The stored body is then
    /// evaluated under those bindings. For immediate (`=`) definitions
    /// the stored body was already reduced at definition time.
    ///
    /// # Errors
    /// - `ArityError` on surplus arguments or a missing argument without
    ///   a default.
    pub(crate) fn apply_user_function(&mut self,
                                      def: &FunctionDef,
                                      args: &[ExprRef])
                                      -> EvalResult<ExprRef> {
        if args.len() > def.params.len() {
            return Err(EvalError::ArityError { head:  def.name.clone(),
                                               found: args.len(), });
        }

        let mut local = HashMap::with_capacity(def.params.len());
        for (i, param) in def.params.iter().enumerate() {
            let value = if let Some(arg) = args.get(i) {
                arg.clone()
            } else if let Some(default) = &param.default {
                self.eval(default, None)?
            } else {
                return Err(EvalError::ArityError { head:  def.name.clone(),
                                                   found: args.len(), });
            };
            local.insert(param.name.clone(), value);
        }

        let body = def.body.clone();
        self.eval(&body, Some(&local))
    }
}
