use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::{
    ast::{Expr, ExprRef, to_string_raw},
    interpreter::evaluator::{core::EvalResult, functions::constant_value},
    util::num::f64_as_exact_i64,
};

// Exact arithmetic runs over i128 quotients so intermediate products
// cannot overflow for any pair of in-range operands; the result must fit
// back into the i64 Rational fields or the computation falls back to f64.
type Exact = (i128, i128);

/// Views a `Number` with integral value or a `Rational` as an exact
/// quotient.
pub(crate) fn exact_of(expr: &Expr) -> Option<Exact> {
    match expr {
        Expr::Number(v) => f64_as_exact_i64(*v).map(|n| (i128::from(n), 1)),
        Expr::Rational { numerator,
                         denominator, } => {
            Some((i128::from(*numerator), i128::from(*denominator)))
        },
        _ => None,
    }
}

const fn gcd128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    if a == 0 { 1 } else { a }
}

/// Normalizes an exact quotient: positive denominator, lowest terms.
#[allow(clippy::cast_possible_wrap)]
fn reduce((n, d): Exact) -> Exact {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    let g = gcd128(n.unsigned_abs(), d.unsigned_abs()) as i128;
    (n / g, d / g)
}

/// Converts an exact quotient back into an expression: a `Number` when
/// the reduced denominator is 1, a `Rational` otherwise. Returns `None`
/// when the reduced parts do not fit `i64`, in which case callers fall
/// back to floating point.
#[allow(clippy::cast_precision_loss)]
fn exact_to_expr(value: Exact) -> Option<ExprRef> {
    let (n, d) = reduce(value);
    let numerator = i64::try_from(n).ok()?;
    let denominator = i64::try_from(d).ok()?;
    if denominator == 1 {
        Some(Expr::number(numerator as f64))
    } else {
        Some(Expr::rational(numerator, denominator))
    }
}

/// Builds a reduced rational expression from an `i64` quotient.
///
/// The sign is normalized onto the numerator and a denominator of 1
/// collapses to a `Number`, so `make_rational(2, -6)` yields
/// `Rational[-1, 3]` and `make_rational(4, 2)` yields `2`.
///
/// # Panics
/// Panics if `denominator` is zero; division built-ins screen zero
/// denominators before reaching exact arithmetic.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn make_rational(numerator: i64, denominator: i64) -> ExprRef {
    assert!(denominator != 0, "rational with zero denominator");
    exact_to_expr((i128::from(numerator), i128::from(denominator)))
        .unwrap_or_else(|| Expr::number(numerator as f64 / denominator as f64))
}

fn add_exact(a: Exact, b: Exact) -> Option<Exact> {
    let n = a.0.checked_mul(b.1)?.checked_add(b.0.checked_mul(a.1)?)?;
    let d = a.1.checked_mul(b.1)?;
    Some(reduce((n, d)))
}

fn mul_exact(a: Exact, b: Exact) -> Option<Exact> {
    let n = a.0.checked_mul(b.0)?;
    let d = a.1.checked_mul(b.1)?;
    Some(reduce((n, d)))
}

/// Splices arguments that already carry `head` into one flat list.
fn flatten(args: &[ExprRef], head: &str) -> Vec<ExprRef> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match &**arg {
            Expr::FunctionCall { head: h, args: inner } if h == head => {
                out.extend(inner.iter().cloned());
            },
            _ => out.push(arg.clone()),
        }
    }
    out
}

/// Accumulates the numeric operands of an n-ary `Plus` or `Times`:
/// exactly while every operand is an integral `Number` or a `Rational`
/// and nothing overflows, in `f64` otherwise.
struct NumericFold {
    exact:   Option<Exact>,
    approx:  f64,
    count:   usize,
    combine: fn(Exact, Exact) -> Option<Exact>,
}

impl NumericFold {
    fn new(identity: Exact, combine: fn(Exact, Exact) -> Option<Exact>) -> Self {
        Self { exact: Some(identity),
               approx: 0.0,
               count: 0,
               combine }
    }

    fn push(&mut self, operand: &Expr, value: f64, fold_approx: fn(f64, f64) -> f64) {
        self.approx = if self.count == 0 { value } else { fold_approx(self.approx, value) };
        self.count += 1;
        self.exact = match (self.exact, exact_of(operand)) {
            (Some(acc), Some(e)) => (self.combine)(acc, e),
            _ => None,
        };
    }

    /// The folded numeric term, exact when possible.
    fn total(&self) -> ExprRef {
        self.exact
            .and_then(exact_to_expr)
            .unwrap_or_else(|| Expr::number(self.approx))
    }
}

fn is_value(expr: &Expr, value: f64) -> bool {
    expr.numeric_value() == Some(value)
}

/// Evaluates `Plus`.
///
/// Nested `Plus` arguments are flattened, numeric operands fold into a
/// single term (exactly over integers and rationals, in `f64`
/// otherwise), and a zero term drops unless it is the entire sum. The
/// residue places the numeric term first and the symbolic operands in
/// canonical order.
pub(crate) fn plus(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let mut fold = NumericFold::new((0, 1), add_exact);
    let mut rest = Vec::new();

    for arg in flatten(args, "Plus") {
        match arg.numeric_value() {
            Some(v) => fold.push(&arg, v, |a, b| a + b),
            None => rest.push(arg),
        }
    }
    rest.sort_by(|a, b| canonical_cmp(a, b));

    if rest.is_empty() {
        return Ok(fold.total());
    }

    let total = fold.total();
    if fold.count == 0 || is_value(&total, 0.0) {
        if rest.len() == 1 {
            return Ok(rest.remove(0));
        }
        return Ok(Expr::call("Plus", rest));
    }

    let mut operands = Vec::with_capacity(rest.len() + 1);
    operands.push(total);
    operands.extend(rest);
    Ok(Expr::call("Plus", operands))
}

/// Evaluates `Times`.
///
/// Nested `Times` arguments are flattened and numeric factors fold into
/// a single coefficient. Any numeric zero collapses the whole product to
/// `0`; a coefficient of one drops. A coefficient of `-1` is kept, since
/// it is how unary negation is represented.
pub(crate) fn times(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let mut fold = NumericFold::new((1, 1), mul_exact);
    let mut rest = Vec::new();

    for arg in flatten(args, "Times") {
        match arg.numeric_value() {
            Some(v) => {
                if v == 0.0 {
                    return Ok(Expr::number(0.0));
                }
                fold.push(&arg, v, |a, b| a * b);
            },
            None => rest.push(arg),
        }
    }
    rest.sort_by(|a, b| canonical_cmp(a, b));

    if rest.is_empty() {
        return Ok(fold.total());
    }

    let total = fold.total();
    if fold.count == 0 || is_value(&total, 1.0) {
        if rest.len() == 1 {
            return Ok(rest.remove(0));
        }
        return Ok(Expr::call("Times", rest));
    }

    let mut operands = Vec::with_capacity(rest.len() + 1);
    operands.push(total);
    operands.extend(rest);
    Ok(Expr::call("Times", operands))
}

/// Evaluates `Subtract[a, b]` as `a + (-1 * b)`, reduced.
pub(crate) fn subtract(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let (a, b) = (&args[0], &args[1]);

    if let (Some(ea), Some(eb)) = (exact_of(a), exact_of(b))
        && let Some(difference) = add_exact(ea, (-eb.0, eb.1)).and_then(exact_to_expr)
    {
        return Ok(difference);
    }
    if let (Some(av), Some(bv)) = (a.numeric_value(), b.numeric_value()) {
        return Ok(Expr::number(av - bv));
    }

    let negated = times(&[Expr::number(-1.0), b.clone()])?;
    plus(&[a.clone(), negated])
}

/// Evaluates `Divide[a, b]`.
///
/// A zero divisor never raises: `0/0` reduces to `Indeterminate` and
/// anything else over zero to the `Infinity` marker. Integral and
/// rational operands divide exactly into a reduced `Rational` (or a
/// `Number` when the denominator cancels); a unit divisor returns the
/// numerator; remaining numeric pairs divide in `f64`; everything else
/// stays a symbolic quotient.
pub(crate) fn divide(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let (a, b) = (&args[0], &args[1]);

    if is_value(b, 0.0) {
        if is_value(a, 0.0) {
            return Ok(Expr::indeterminate());
        }
        return Ok(Expr::infinity());
    }
    if is_value(b, 1.0) {
        return Ok(a.clone());
    }

    if let (Some(ea), Some(eb)) = (exact_of(a), exact_of(b))
        && let Some(quotient) = mul_exact(ea, (eb.1, eb.0)).and_then(exact_to_expr)
    {
        return Ok(quotient);
    }
    if let (Some(av), Some(bv)) = (a.numeric_value(), b.numeric_value()) {
        return Ok(Expr::number(av / bv));
    }

    Ok(Expr::call("Divide", vec![a.clone(), b.clone()]))
}

/// Evaluates `Power[b, e]`.
///
/// `e = 0` reduces to `1` and `e = 1` to the base regardless of the
/// base's form; numeric pairs exponentiate in `f64`; anything else stays
/// symbolic.
pub(crate) fn power(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let (base, exponent) = (&args[0], &args[1]);

    if is_value(exponent, 0.0) {
        return Ok(Expr::number(1.0));
    }
    if is_value(exponent, 1.0) {
        return Ok(base.clone());
    }

    if let (Some(bv), Some(ev)) = (base.numeric_value(), exponent.numeric_value()) {
        return Ok(Expr::number(bv.powf(ev)));
    }

    Ok(Expr::call("Power", vec![base.clone(), exponent.clone()]))
}

/// Shared shape of the numeric one-argument built-ins (`Floor`, `Round`,
/// `Sin`, `Exp`, ...): apply `f` to a numeric operand, including the
/// named constants at their values, and stay symbolic otherwise.
///
/// `Round` relies on `f64::round` rounding half away from zero, so
/// `Round[3.5]` is `4` and `Round[-3.5]` is `-4`.
pub(crate) fn unary_numeric(head: &'static str,
                            args: &[ExprRef],
                            f: fn(f64) -> f64)
                            -> EvalResult<ExprRef> {
    match numeric_or_constant(&args[0]) {
        Some(v) => Ok(Expr::number(f(v))),
        None => Ok(Expr::call(head, vec![args[0].clone()])),
    }
}

/// Evaluates `Sqrt[x]` for non-negative numeric operands; negative and
/// symbolic operands stay symbolic (the principal complex root is out of
/// scope).
pub(crate) fn sqrt(args: &[ExprRef]) -> EvalResult<ExprRef> {
    match numeric_or_constant(&args[0]) {
        Some(v) if v >= 0.0 => Ok(Expr::number(v.sqrt())),
        _ => Ok(Expr::call("Sqrt", vec![args[0].clone()])),
    }
}

/// The numeric value of an operand, treating the named constants (`Pi`,
/// `E`, ...) as numbers.
fn numeric_or_constant(expr: &Expr) -> Option<f64> {
    expr.numeric_value().or_else(|| match expr {
                             Expr::Symbol(name) => constant_value(name),
                             _ => None,
                         })
}

/// Coarse variant order used by [`canonical_cmp`].
const fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(_) | Expr::Rational { .. } => 0,
        Expr::Symbol(_) => 1,
        Expr::Str(_) => 2,
        Expr::Boolean(_) => 3,
        Expr::FunctionCall { .. } => 4,
        Expr::List(_) => 5,
        _ => 6,
    }
}

/// Total order on expressions, used to sort the symbolic operands of
/// `Plus` and `Times` residues.
///
/// Numbers order by value, symbols by name, calls by head and then
/// argument-wise; everything else falls back to the raw rendering. The
/// order is total, so equal residues always print identically.
pub(crate) fn canonical_cmp(a: &ExprRef, b: &ExprRef) -> Ordering {
    let by_rank = rank(a).cmp(&rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }

    match (&**a, &**b) {
        (Expr::Number(_) | Expr::Rational { .. }, Expr::Number(_) | Expr::Rational { .. }) => {
            let av = a.numeric_value().unwrap_or(f64::NAN);
            let bv = b.numeric_value().unwrap_or(f64::NAN);
            OrderedFloat(av).cmp(&OrderedFloat(bv))
        },
        (Expr::Symbol(x), Expr::Symbol(y)) => x.cmp(y),
        (Expr::Str(x), Expr::Str(y)) => x.cmp(y),
        (Expr::Boolean(x), Expr::Boolean(y)) => x.cmp(y),
        (Expr::FunctionCall { head: ha, args: aa },
         Expr::FunctionCall { head: hb, args: ab }) => {
            ha.cmp(hb)
              .then(aa.len().cmp(&ab.len()))
              .then_with(|| {
                  for (x, y) in aa.iter().zip(ab.iter()) {
                      let c = canonical_cmp(x, y);
                      if c != Ordering::Equal {
                          return c;
                      }
                  }
                  Ordering::Equal
              })
        },
        (Expr::List(la), Expr::List(lb)) => {
            la.len().cmp(&lb.len()).then_with(|| {
                                       for (x, y) in la.iter().zip(lb.iter()) {
                                           let c = canonical_cmp(x, y);
                                           if c != Ordering::Equal {
                                               return c;
                                           }
                                       }
                                       Ordering::Equal
                                   })
        },
        _ => to_string_raw(a).cmp(&to_string_raw(b)),
    }
}
