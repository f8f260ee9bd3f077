use std::collections::HashMap;

use crate::{
    ast::{Expr, ExprRef, FunctionDef},
    error::EvalError,
    interpreter::evaluator::functions,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvalError` describing the failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// Parameter bindings threaded through the evaluation of a user-defined
/// function body. `None` outside of function bodies.
pub(crate) type Bindings<'a> = Option<&'a HashMap<String, ExprRef>>;

/// Stores the mutable evaluation state.
///
/// This struct holds the interpreter state for one session: all variable
/// assignments and user-defined functions. It is owned by the caller and
/// accessed non-reentrantly for the duration of one [`evaluate`] call.
///
/// ## Usage
///
/// An `EvaluationContext` is created once and reused across expressions,
/// so assignments made by one evaluation are visible to the next.
#[derive(Default)]
pub struct EvaluationContext {
    /// A mapping from variable names to their bound expressions.
    pub variables: HashMap<String, ExprRef>,
    /// A mapping from function names to their definitions. Populated by
    /// declarations like `square[x_] := x * x`.
    pub functions: HashMap<String, FunctionDef>,
}

impl EvaluationContext {
    /// Creates an empty context with no bindings and no user-defined
    /// functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable directly, without evaluation.
    pub fn set(&mut self, name: impl Into<String>, value: ExprRef) {
        self.variables.insert(name.into(), value);
    }

    /// Returns the expression bound to a variable, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExprRef> {
        self.variables.get(name)
    }
}

/// Evaluates an expression under a context and returns its normal form.
///
/// Evaluation is applicative: arguments reduce before their call does,
/// except for the special forms `If`, `And` and `Or`. Anything the
/// evaluator cannot reduce comes back as a symbolic residue rather than
/// an error, so free symbols survive untouched. After the reduction, a
/// result that still differs structurally from its input is evaluated
/// once more; assignments and definitions are exempt so their returned
/// name symbol is not immediately resolved again.
///
/// # Parameters
/// - `expr`: Expression to evaluate. Shared subtrees are reused freely in
///   the result.
/// - `ctx`: The session context; assignments and definitions mutate it.
///
/// # Errors
/// Returns an `EvalError` for ill-typed built-in calls, wrong argument
/// counts, domain violations, and assignments to reserved names.
///
/// # Example
/// ```
/// use cassia::{evaluate, parse_expression};
/// use cassia::interpreter::evaluator::core::EvaluationContext;
///
/// let mut ctx = EvaluationContext::new();
/// let expr = parse_expression("2 + 3").unwrap();
/// let result = evaluate(&expr, &mut ctx).unwrap();
///
/// assert_eq!(result.to_string(), "5");
/// ```
pub fn evaluate(expr: &ExprRef, ctx: &mut EvaluationContext) -> EvalResult<ExprRef> {
    let result = ctx.eval(expr, None)?;

    if matches!(&**expr, Expr::Assignment { .. } | Expr::FunctionDefinition(_)) || result == *expr {
        return Ok(result);
    }
    ctx.eval(&result, None)
}

impl EvaluationContext {
    /// Evaluates one expression node.
    ///
    /// Dispatches on the variant: literals are self-evaluating, symbols
    /// resolve through bindings and the context, lists evaluate
    /// elementwise, the binding forms mutate the context, and function
    /// calls go through the special forms, the builtin table, and the
    /// user-function fallthrough in that order.
    pub(crate) fn eval(&mut self, expr: &ExprRef, bindings: Bindings<'_>) -> EvalResult<ExprRef> {
        match &**expr {
            Expr::Number(_)
            | Expr::Rational { .. }
            | Expr::Complex { .. }
            | Expr::Boolean(_)
            | Expr::Str(_)
            | Expr::Infinity
            | Expr::Indeterminate => Ok(expr.clone()),
            Expr::Symbol(name) => self.eval_symbol(expr, name, bindings),
            Expr::List(elements) => {
                let mut evaluated = Vec::with_capacity(elements.len());
                for element in elements {
                    evaluated.push(self.eval(element, bindings)?);
                }
                Ok(Expr::list(evaluated))
            },
            Expr::Rule { lhs, rhs } => {
                let lhs = self.eval(lhs, bindings)?;
                let rhs = self.eval(rhs, bindings)?;
                Ok(Expr::rule(lhs, rhs))
            },
            Expr::Assignment { name, value } => self.eval_assignment(name, value, bindings),
            Expr::FunctionDefinition(def) => self.eval_definition(def),
            Expr::FunctionCall { head, args } => match head.as_str() {
                "If" => self.eval_if(args, bindings),
                "And" | "Or" => self.eval_short_circuit(head, args, bindings),
                _ => {
                    let mut evaluated = Vec::with_capacity(args.len());
                    for arg in args {
                        evaluated.push(self.eval(arg, bindings)?);
                    }
                    self.apply(head, evaluated)
                },
            },
        }
    }

    /// Resolves a symbol.
    ///
    /// Lookup order: function-parameter bindings, the singleton markers,
    /// the named constants (which self-evaluate), then session variables.
    /// A bound variable's value is re-evaluated under the current global
    /// context. Unbound symbols are free and return unchanged.
    fn eval_symbol(&mut self,
                   expr: &ExprRef,
                   name: &str,
                   bindings: Bindings<'_>)
                   -> EvalResult<ExprRef> {
        if let Some(map) = bindings
           && let Some(value) = map.get(name)
        {
            return Ok(value.clone());
        }

        if name == "Infinity" {
            return Ok(Expr::infinity());
        }
        if name == "Indeterminate" {
            return Ok(Expr::indeterminate());
        }
        if functions::constant_value(name).is_some() {
            return Ok(expr.clone());
        }

        if let Some(bound) = self.variables.get(name) {
            let bound = bound.clone();
            return self.eval(&bound, None);
        }

        Ok(expr.clone())
    }

    /// Performs `name = value`: evaluates the right side eagerly, stores
    /// it, and returns the name symbol as feedback.
    fn eval_assignment(&mut self,
                       name: &str,
                       value: &ExprRef,
                       bindings: Bindings<'_>)
                       -> EvalResult<ExprRef> {
        if functions::is_reserved_symbol(name) {
            return Err(EvalError::ReservedSymbol { name: name.to_string(), });
        }

        let value = self.eval(value, bindings)?;
        self.variables.insert(name.to_string(), value);
        Ok(Expr::symbol(name))
    }

    /// Registers a user-defined function and returns its name symbol.
    ///
    /// Immediate (`=`) definitions reduce the body once, now; delayed
    /// (`:=`) definitions store it verbatim. Redefining a builtin or a
    /// reserved constant is rejected.
    fn eval_definition(&mut self, def: &FunctionDef) -> EvalResult<ExprRef> {
        if functions::is_reserved_symbol(&def.name) || functions::lookup(&def.name).is_some() {
            return Err(EvalError::ReservedSymbol { name: def.name.clone(), });
        }

        let stored = if def.delayed {
            def.clone()
        } else {
            FunctionDef { body: self.eval(&def.body, None)?,
                          ..def.clone() }
        };
        self.functions.insert(stored.name.clone(), stored);
        Ok(Expr::symbol(&def.name))
    }

    /// Evaluates `If[cond, then, else]`.
    ///
    /// Exactly one branch evaluates, chosen by the condition. A
    /// non-boolean condition leaves the form symbolic with both branches
    /// unevaluated.
    fn eval_if(&mut self, args: &[ExprRef], bindings: Bindings<'_>) -> EvalResult<ExprRef> {
        if args.len() != 3 {
            return Err(EvalError::ArityError { head:  "If".to_string(),
                                               found: args.len(), });
        }

        let condition = self.eval(&args[0], bindings)?;
        match &*condition {
            Expr::Boolean(true) => self.eval(&args[1], bindings),
            Expr::Boolean(false) => self.eval(&args[2], bindings),
            _ => Ok(Expr::call("If", vec![condition, args[1].clone(), args[2].clone()])),
        }
    }

    /// Evaluates `And` and `Or` with short-circuiting.
    ///
    /// Operands evaluate left to right; a literal `False` in `And` or
    /// `True` in `Or` terminates immediately. When every operand reduced
    /// to a boolean the result is decided; otherwise the call returns
    /// symbolically with all evaluated operands in place.
    fn eval_short_circuit(&mut self,
                          head: &str,
                          args: &[ExprRef],
                          bindings: Bindings<'_>)
                          -> EvalResult<ExprRef> {
        let terminator = head == "Or";

        let mut evaluated = Vec::with_capacity(args.len());
        let mut all_boolean = true;
        for arg in args {
            let value = self.eval(arg, bindings)?;
            match &*value {
                Expr::Boolean(b) => {
                    if *b == terminator {
                        return Ok(Expr::boolean(terminator));
                    }
                },
                _ => all_boolean = false,
            }
            evaluated.push(value);
        }

        if all_boolean {
            return Ok(Expr::boolean(!terminator));
        }
        Ok(Expr::call(head, evaluated))
    }

    /// Dispatches an applied head over evaluated arguments.
    ///
    /// `List` normalizes to the dedicated variant, builtins reduce via
    /// the table, user definitions apply with parameter bindings, and an
    /// unknown head returns unchanged as a symbolic residue.
    fn apply(&mut self, head: &str, args: Vec<ExprRef>) -> EvalResult<ExprRef> {
        if head == "List" {
            return Ok(Expr::list(args));
        }

        if let Some(def) = functions::lookup(head) {
            return functions::apply(def, &args);
        }

        if let Some(def) = self.functions.get(head).cloned() {
            return self.apply_user_function(&def, &args);
        }

        Ok(Expr::call(head, args))
    }
}
