use crate::{
    ast::{Expr, ExprRef},
    error::EvalError,
    interpreter::evaluator::{core::EvalResult, functions},
};

/// Applies an arithmetic head elementwise over `List` operands.
///
/// This function unifies all broadcasting paths:
/// - List with list: elementwise, sizes must match.
/// - List with scalar, scalar with list: the scalar repeats.
/// - Nested lists: each element re-enters the same dispatch, so inner
///   lists broadcast recursively.
///
/// It works uniformly for any arity, so a flattened `Plus` with several
/// list operands zips them all in one pass.
///
/// # Parameters
/// - `head`: The arithmetic head being applied.
/// - `args`: Evaluated arguments, at least one of which is a list.
///
/// # Returns
/// A `List` whose elements are the reduced elementwise combinations.
///
/// # Errors
/// `DomainError` when two list operands have different lengths.
pub(crate) fn broadcast(head: &str, args: &[ExprRef]) -> EvalResult<ExprRef> {
    let mut size = None;
    for items in args.iter().filter_map(|a| a.as_list()) {
        match size {
            None => size = Some(items.len()),
            Some(s) if s != items.len() => {
                return Err(EvalError::domain_error("List sizes must match for elementwise \
                                                    operation"));
            },
            Some(_) => {},
        }
    }
    let Some(size) = size else {
        return functions::apply_by_name(head, args);
    };

    let mut out = Vec::with_capacity(size);
    for i in 0..size {
        let element_args: Vec<ExprRef> =
            args.iter()
                .map(|arg| arg.as_list().map_or_else(|| arg.clone(), |items| items[i].clone()))
                .collect();
        out.push(functions::apply_by_name(head, &element_args)?);
    }
    Ok(Expr::list(out))
}

/// Evaluates `Length`: element count for lists, codepoint count for
/// strings, symbolic residue for anything else.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn length(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let arg = &args[0];

    if let Some(items) = arg.as_list() {
        return Ok(Expr::number(items.len() as f64));
    }
    if let Expr::Str(s) = &**arg {
        return Ok(Expr::number(s.chars().count() as f64));
    }
    Ok(Expr::call("Length", vec![arg.clone()]))
}
