use std::cmp::Ordering;

use crate::{
    ast::{Expr, ExprRef},
    interpreter::evaluator::{arithmetic::exact_of, core::EvalResult},
};

/// Evaluates `Not`: negates a boolean, stays symbolic otherwise.
pub(crate) fn not(args: &[ExprRef]) -> EvalResult<ExprRef> {
    match &*args[0] {
        Expr::Boolean(b) => Ok(Expr::boolean(!b)),
        _ => Ok(Expr::call("Not", vec![args[0].clone()])),
    }
}

/// Numeric ordering of two operands, exact for integral numbers and
/// rationals (cross-multiplied so no precision is lost), floating-point
/// otherwise. `None` when either operand is non-numeric or the
/// comparison is undefined (NaN).
fn numeric_ordering(a: &Expr, b: &Expr) -> Option<Ordering> {
    if let (Some((n1, d1)), Some((n2, d2))) = (exact_of(a), exact_of(b)) {
        // Denominators are positive, so the cross product preserves order.
        return Some((n1 * d2).cmp(&(n2 * d1)));
    }
    match (a.numeric_value(), b.numeric_value()) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => None,
    }
}

/// Evaluates the comparison heads `Equal`, `Unequal`, `Less`,
/// `LessEqual`, `Greater` and `GreaterEqual`.
///
/// Numeric operands compare by value. `Equal`/`Unequal` additionally
/// decide booleans, strings, and identical symbols. Everything else
/// stays a symbolic comparison with evaluated operands: the evaluator
/// cannot know whether two distinct free symbols are equal.
pub(crate) fn compare(head: &'static str, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let (a, b) = (&args[0], &args[1]);

    if let Some(ordering) = numeric_ordering(a, b) {
        let truth = match head {
            "Equal" => ordering == Ordering::Equal,
            "Unequal" => ordering != Ordering::Equal,
            "Less" => ordering == Ordering::Less,
            "LessEqual" => ordering != Ordering::Greater,
            "Greater" => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        };
        return Ok(Expr::boolean(truth));
    }

    if head == "Equal" || head == "Unequal" {
        let decided = match (&**a, &**b) {
            (Expr::Boolean(x), Expr::Boolean(y)) => Some(x == y),
            (Expr::Str(x), Expr::Str(y)) => Some(x == y),
            (Expr::Symbol(x), Expr::Symbol(y)) if x == y => Some(true),
            _ => None,
        };
        if let Some(equal) = decided {
            return Ok(Expr::boolean(if head == "Equal" { equal } else { !equal }));
        }
    }

    Ok(Expr::call(head, vec![a.clone(), b.clone()]))
}
