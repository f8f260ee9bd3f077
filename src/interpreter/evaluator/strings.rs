use crate::{
    ast::{Expr, ExprRef},
    error::EvalError,
    interpreter::evaluator::core::EvalResult,
    util::num::f64_as_exact_i64,
};

const TAKE_MESSAGE: &str = "StringTake expects a valid index or range";

/// Evaluates `StringJoin`: concatenates string arguments, also reached
/// through the `<>` operator.
///
/// # Errors
/// `TypeError` when any argument is not a string.
pub(crate) fn string_join(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let mut out = String::new();
    for arg in args {
        match &**arg {
            Expr::Str(s) => out.push_str(s),
            _ => return Err(EvalError::type_error("StringJoin expects string arguments")),
        }
    }
    Ok(Expr::string(out))
}

/// Evaluates `StringLength`: the codepoint count of a string.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn string_length(args: &[ExprRef]) -> EvalResult<ExprRef> {
    match &*args[0] {
        Expr::Str(s) => Ok(Expr::number(s.chars().count() as f64)),
        _ => Err(EvalError::type_error("StringLength expects a string argument")),
    }
}

/// Evaluates `StringReplace[s, from -> to]`: non-overlapping
/// left-to-right substring replacement. A pattern that never matches
/// returns the subject unchanged.
pub(crate) fn string_replace(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let Expr::Str(subject) = &*args[0] else {
        return Err(EvalError::type_error("StringReplace expects a string and a replacement \
                                          rule"));
    };
    let Expr::Rule { lhs, rhs } = &*args[1] else {
        return Err(EvalError::type_error("StringReplace expects a string and a replacement \
                                          rule"));
    };
    let (Expr::Str(from), Expr::Str(to)) = (&**lhs, &**rhs) else {
        return Err(EvalError::type_error("StringReplace expects a string and a replacement \
                                          rule"));
    };

    if from.is_empty() {
        return Ok(args[0].clone());
    }
    Ok(Expr::string(subject.replace(from.as_str(), to)))
}

/// Integer value of an index operand, if it is an integral number.
fn index_of(expr: &Expr) -> Option<i64> {
    expr.numeric_value().and_then(f64_as_exact_i64)
}

/// Evaluates `StringTake`.
///
/// - `StringTake[s, n]` with `n > 0`: the first `n` codepoints.
/// - `StringTake[s, n]` with `n < 0`: the last `|n|` codepoints.
/// - `StringTake[s, {i, j}]`: the 1-based inclusive range `[i, j]`.
///
/// # Errors
/// - `TypeError` when the subject is not a string.
/// - `DomainError` for `n = 0`, an out-of-range index, or an index form
///   that is neither an integer nor a two-element integer list.
pub(crate) fn string_take(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let Expr::Str(subject) = &*args[0] else {
        return Err(EvalError::type_error("StringTake expects a string argument"));
    };
    let len = subject.chars().count();

    if let Some(items) = args[1].as_list() {
        let (Some(first), Some(second)) = (items.first(), items.get(1)) else {
            return Err(EvalError::domain_error(TAKE_MESSAGE));
        };
        let (Some(i), Some(j)) = (index_of(first), index_of(second)) else {
            return Err(EvalError::domain_error(TAKE_MESSAGE));
        };
        if items.len() != 2 || i < 1 || j < i || usize::try_from(j).is_ok_and(|j| j > len) {
            return Err(EvalError::domain_error(TAKE_MESSAGE));
        }

        #[allow(clippy::cast_sign_loss)]
        let (start, count) = ((i - 1) as usize, (j - i + 1) as usize);
        return Ok(Expr::string(subject.chars()
                                      .skip(start)
                                      .take(count)
                                      .collect::<String>()));
    }

    let Some(n) = index_of(&args[1]) else {
        return Err(EvalError::domain_error(TAKE_MESSAGE));
    };
    if n == 0 || n.unsigned_abs() as usize > len {
        return Err(EvalError::domain_error(TAKE_MESSAGE));
    }

    #[allow(clippy::cast_sign_loss)]
    let taken: String = if n > 0 {
        subject.chars().take(n as usize).collect()
    } else {
        subject.chars().skip(len - n.unsigned_abs() as usize).collect()
    };
    Ok(Expr::string(taken))
}
