use cassia::{
    EvalError, EvaluationContext, Expr, ExprRef, evaluate, parse_expression, to_string_raw,
};

fn eval_in(source: &str, ctx: &mut EvaluationContext) -> ExprRef {
    let expr = parse_expression(source).unwrap_or_else(|e| panic!("parse {source:?}: {e}"));
    evaluate(&expr, ctx).unwrap_or_else(|e| panic!("evaluate {source:?}: {e}"))
}

/// Evaluates under an empty context and renders the raw tree.
fn eval_raw(source: &str) -> String {
    let mut ctx = EvaluationContext::new();
    to_string_raw(&eval_in(source, &mut ctx))
}

fn eval_err(source: &str) -> EvalError {
    let mut ctx = EvaluationContext::new();
    let expr = parse_expression(source).unwrap_or_else(|e| panic!("parse {source:?}: {e}"));
    match evaluate(&expr, &mut ctx) {
        Ok(result) => panic!("{source:?} evaluated to {result} but an error was expected"),
        Err(e) => e,
    }
}

fn numeric(source: &str) -> f64 {
    let mut ctx = EvaluationContext::new();
    let result = eval_in(source, &mut ctx);
    result.numeric_value()
          .unwrap_or_else(|| panic!("{source:?} evaluated to non-numeric {result}"))
}

#[test]
fn basic_arithmetic() {
    assert_eq!(eval_raw("2 + 3"), "5");
    assert_eq!(eval_raw("2 * (3 + 4)"), "14");
    assert_eq!(eval_raw("2 + 3 + 4"), "9");
    assert_eq!(eval_raw("2 * 3 * 0"), "0");
    assert_eq!(eval_raw("2^3"), "8");
    assert_eq!(eval_raw("2 * (3 + (4 * (5 - 1)))"), "38");
    assert_eq!(eval_raw("8 - 5"), "3");
}

#[test]
fn trigonometric_and_exponential_functions() {
    assert!(numeric("Sin[0]").abs() < 1e-6);
    assert!((numeric("Cos[0]") - 1.0).abs() < 1e-6);
    assert!((numeric("Sqrt[9]") - 3.0).abs() < 1e-6);
    assert!((numeric("Exp[1]") - std::f64::consts::E).abs() < 1e-6);
    assert!((numeric("Exp[0]") - 1.0).abs() < 1e-6);
}

#[test]
fn rounding_functions() {
    assert_eq!(eval_raw("Floor[3.7]"), "3");
    assert_eq!(eval_raw("Floor[-3.7]"), "-4");
    assert_eq!(eval_raw("Ceiling[3.2]"), "4");
    assert_eq!(eval_raw("Ceiling[-3.2]"), "-3");
    // Round goes half away from zero.
    assert_eq!(eval_raw("Round[3.5]"), "4");
    assert_eq!(eval_raw("Round[3.4]"), "3");
    assert_eq!(eval_raw("Round[-3.5]"), "-4");
    assert_eq!(eval_raw("Round[-3.4]"), "-3");
}

#[test]
fn variables_resolve_through_context() {
    let mut ctx = EvaluationContext::new();
    ctx.set("x", Expr::number(10.0));
    ctx.set("y", Expr::number(5.0));

    assert_eq!(to_string_raw(&eval_in("x + y", &mut ctx)), "15");
    assert_eq!(to_string_raw(&eval_in("x * y", &mut ctx)), "50");
}

#[test]
fn additive_and_multiplicative_identities() {
    assert_eq!(eval_raw("0 + x"), "x");
    assert_eq!(eval_raw("x + 0"), "x");
    assert_eq!(eval_raw("1 * x"), "x");
    assert_eq!(eval_raw("x * 1"), "x");
    assert_eq!(eval_raw("0 * x"), "0");
    assert_eq!(eval_raw("x * 0"), "0");
    assert_eq!(eval_raw("x^0"), "1");
    assert_eq!(eval_raw("x^1"), "x");
    assert_eq!(eval_raw("0 + (1 * x)"), "x");
    assert_eq!(eval_raw("(x * 0) + 1"), "1");
    assert_eq!(eval_raw("x / 1"), "x");
}

#[test]
fn residues_put_the_numeric_term_first() {
    assert_eq!(eval_raw("z + 1"), "Plus[1, z]");
    assert_eq!(eval_raw("z + 1 + a"), "Plus[1, a, z]");
    assert_eq!(eval_raw("y * 3"), "Times[3, y]");
}

#[test]
fn assignment_stores_and_returns_the_name() {
    let mut ctx = EvaluationContext::new();

    let feedback = eval_in("x = 2", &mut ctx);
    assert_eq!(*feedback, Expr::Symbol("x".to_string()));
    assert_eq!(ctx.get("x").map(|e| to_string_raw(e)), Some("2".to_string()));

    assert_eq!(to_string_raw(&eval_in("x", &mut ctx)), "2");
}

#[test]
fn free_symbols_are_preserved() {
    assert_eq!(eval_raw("x"), "x");
    assert_eq!(eval_raw("foo[x, 1]"), "foo[x, 1]");
}

#[test]
fn division_by_zero_materializes_markers() {
    let mut ctx = EvaluationContext::new();
    assert!(matches!(*eval_in("0 / 0", &mut ctx), Expr::Indeterminate));
    assert!(matches!(*eval_in("1 / 0", &mut ctx), Expr::Infinity));
    assert!(matches!(*eval_in("-1 / 0", &mut ctx), Expr::Infinity));
}

#[test]
fn exact_rational_arithmetic() {
    assert_eq!(eval_raw("2/4"), "Rational[1, 2]");
    assert_eq!(eval_raw("4/2"), "2");
    assert_eq!(eval_raw("1/3 + 1/6"), "Rational[1, 2]");
    assert_eq!(eval_raw("1/3 * 3"), "1");
    assert_eq!(eval_raw("7/2 - 3"), "Rational[1, 2]");
    assert_eq!(eval_raw("0.5 + 0.25"), "0.75");
}

#[test]
fn equality_comparisons() {
    let mut ctx = EvaluationContext::new();
    ctx.set("x", Expr::number(5.0));
    assert_eq!(to_string_raw(&eval_in("x == 5", &mut ctx)), "True");

    let mut ctx = EvaluationContext::new();
    ctx.set("x", Expr::number(3.0));
    assert_eq!(to_string_raw(&eval_in("x == 5", &mut ctx)), "False");

    assert_eq!(eval_raw("x == y"), "Equal[x, y]");
    assert_eq!(eval_raw("x == x"), "True");
    assert_eq!(eval_raw("2 != 3"), "True");
    assert_eq!(eval_raw("1/2 == 0.5"), "True");
    assert_eq!(eval_raw("2 < 3"), "True");
    assert_eq!(eval_raw("2 >= 3"), "False");
    assert_eq!(eval_raw("x < 1"), "Less[x, 1]");
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(eval_raw("True && False"), "False");
    assert_eq!(eval_raw("True && True"), "True");
    assert_eq!(eval_raw("True && x"), "And[True, x]");
    assert_eq!(eval_raw("False && x"), "False");

    assert_eq!(eval_raw("True || False"), "True");
    assert_eq!(eval_raw("False || False"), "False");
    assert_eq!(eval_raw("False || x"), "Or[False, x]");
    assert_eq!(eval_raw("x || True"), "True");

    assert_eq!(eval_raw("!True"), "False");
    assert_eq!(eval_raw("!x"), "Not[x]");
}

#[test]
fn if_evaluates_exactly_one_branch() {
    assert_eq!(eval_raw("If[2 < 3, 1, 2]"), "1");
    assert_eq!(eval_raw("If[2 > 3, 1, 2]"), "2");
    // Only the taken branch runs: the untaken one would divide by zero
    // into a marker, not an error, but it must not leak into the result.
    assert_eq!(eval_raw("If[True, 7, 0/0]"), "7");
    assert_eq!(eval_raw("If[x > 1, 1, 2]"), "If[Greater[x, 1], 1, 2]");
}

#[test]
fn string_join() {
    assert_eq!(eval_raw("\"Hello\" <> \" \" <> \"World\""), "\"Hello World\"");
    assert_eq!(eval_raw("\"\" <> \"Hello\""), "\"Hello\"");

    let err = eval_err("\"Hello\" <> 123");
    assert!(matches!(&err, EvalError::TypeError { details }
                     if details == "StringJoin expects string arguments"));
}

#[test]
fn string_length() {
    assert_eq!(eval_raw("StringLength[\"Hello\"]"), "5");
    assert_eq!(eval_raw("StringLength[\"\"]"), "0");
    assert_eq!(eval_raw("StringLength[\"Hello World\"]"), "11");
}

#[test]
fn string_replace() {
    assert_eq!(eval_raw("StringReplace[\"Hello World\", \"World\" -> \"cassia\"]"),
               "\"Hello cassia\"");
    assert_eq!(eval_raw("StringReplace[\"abcabc\", \"abc\" -> \"x\"]"), "\"xx\"");
    assert_eq!(eval_raw("StringReplace[\"Hello\", \"x\" -> \"y\"]"), "\"Hello\"");
}

#[test]
fn string_take() {
    assert_eq!(eval_raw("StringTake[\"Hello\", 3]"), "\"Hel\"");
    assert_eq!(eval_raw("StringTake[\"Hello\", -2]"), "\"lo\"");
    assert_eq!(eval_raw("StringTake[\"Hello\", {2, 4}]"), "\"ell\"");

    for source in ["StringTake[\"Hello\", 0]",
                   "StringTake[\"Hello\", 9]",
                   "StringTake[\"Hello\", {4, 2}]"] {
        let err = eval_err(source);
        assert!(matches!(&err, EvalError::DomainError { details }
                         if details == "StringTake expects a valid index or range"),
                "unexpected error for {source:?}: {err}");
    }
}

#[test]
fn list_arithmetic_is_elementwise() {
    assert_eq!(eval_raw("{1, 2, 3} + {4, 5, 6}"), "List[5, 7, 9]");
    assert_eq!(eval_raw("{1, 2, 3} * {4, 5, 6}"), "List[4, 10, 18]");
    assert_eq!(eval_raw("{1, 2, 3} - {1, 1, 1}"), "List[0, 1, 2]");
    assert_eq!(eval_raw("{2, 4, 6} / 2"), "List[1, 2, 3]");
    assert_eq!(eval_raw("{1, 2, 3}^2"), "List[1, 4, 9]");
}

#[test]
fn scalars_broadcast_over_lists() {
    assert_eq!(eval_raw("10 + {1, 2, 3}"), "List[11, 12, 13]");
    assert_eq!(eval_raw("{1, 2, 3} + 10"), "List[11, 12, 13]");
    assert_eq!(eval_raw("2 * {4, 5, 6}"), "List[8, 10, 12]");
    assert_eq!(eval_raw("{4, 5, 6} * 2"), "List[8, 10, 12]");
}

#[test]
fn nested_lists_broadcast_recursively() {
    assert_eq!(eval_raw("{{1, 2}, {3, 4}} + {{10, 20}, {30, 40}}"),
               "List[List[11, 22], List[33, 44]]");
    assert_eq!(eval_raw("{{1, 2}, {3, 4}} * 2"), "List[List[2, 4], List[6, 8]]");
}

#[test]
fn mismatched_list_sizes_fail() {
    let err = eval_err("{1, 2} + {3, 4, 5}");
    assert!(matches!(&err, EvalError::DomainError { details }
                     if details == "List sizes must match for elementwise operation"));
}

#[test]
fn symbolic_list_elements_stay_symbolic() {
    assert_eq!(eval_raw("{x, y, 3} + {1, 2, z}"),
               "List[Plus[1, x], Plus[2, y], Plus[3, z]]");
}

#[test]
fn length_of_lists_and_strings() {
    assert_eq!(eval_raw("Length[{1, 2, 3, 4}]"), "4");
    assert_eq!(eval_raw("Length[{}]"), "0");
    assert_eq!(eval_raw("Length[\"Hello\"]"), "5");
    assert_eq!(eval_raw("Length[x]"), "Length[x]");
}

#[test]
fn division_by_products_under_bindings() {
    let cases: &[(&str, &[(&str, f64)], f64)] = &[("x/-3x", &[("x", 2.0)], -1.0 / 3.0),
                                                  ("y/2y", &[("y", 5.0)], 0.5),
                                                  ("a/-b", &[("a", 6.0), ("b", 2.0)], -3.0),
                                                  ("z/4w", &[("z", 8.0), ("w", 2.0)], 1.0),
                                                  ("t/-7t", &[("t", 7.0)], -1.0 / 7.0),
                                                  ("m/(-2m)", &[("m", 10.0)], -0.5),
                                                  ("p/(-q)", &[("p", 9.0), ("q", 3.0)], -3.0)];

    for (source, env, expected) in cases {
        let mut ctx = EvaluationContext::new();
        for (name, value) in *env {
            ctx.set(*name, Expr::number(*value));
        }
        let result = eval_in(source, &mut ctx);
        let value = result.numeric_value()
                          .unwrap_or_else(|| panic!("{source:?} gave non-numeric {result}"));
        assert!((value - expected).abs() < 1e-12,
                "{source:?} gave {value}, expected {expected}");
    }
}

#[test]
fn user_defined_functions() {
    let mut ctx = EvaluationContext::new();

    eval_in("square[t_] := t^2", &mut ctx);
    assert_eq!(to_string_raw(&eval_in("square[5]", &mut ctx)), "25");

    eval_in("add[a_, b_] := a + b", &mut ctx);
    assert_eq!(to_string_raw(&eval_in("add[2, 5]", &mut ctx)), "7");

    // Defaults fill missing trailing arguments.
    eval_in("pow[x_, n_:2] := x^n", &mut ctx);
    assert_eq!(to_string_raw(&eval_in("pow[3]", &mut ctx)), "9");
    assert_eq!(to_string_raw(&eval_in("pow[2, 3]", &mut ctx)), "8");
}

#[test]
fn immediate_definitions_capture_at_definition_time() {
    let mut ctx = EvaluationContext::new();
    eval_in("c = 3", &mut ctx);
    eval_in("f[x_] = x * c", &mut ctx);
    eval_in("g[x_] := x * c", &mut ctx);

    eval_in("c = 100", &mut ctx);
    // `=` reduced its body while c was 3; `:=` sees the current binding.
    assert_eq!(to_string_raw(&eval_in("f[2]", &mut ctx)), "6");
    assert_eq!(to_string_raw(&eval_in("g[2]", &mut ctx)), "200");
}

#[test]
fn wrong_user_function_arity_fails() {
    let mut ctx = EvaluationContext::new();
    eval_in("add[a_, b_] := a + b", &mut ctx);

    let expr = parse_expression("add[1]").unwrap();
    assert!(matches!(evaluate(&expr, &mut ctx), Err(EvalError::ArityError { .. })));

    let expr = parse_expression("add[1, 2, 3]").unwrap();
    assert!(matches!(evaluate(&expr, &mut ctx), Err(EvalError::ArityError { .. })));
}

#[test]
fn reserved_names_are_protected() {
    assert!(matches!(eval_err("Pi = 3"), EvalError::ReservedSymbol { .. }));
    assert!(matches!(eval_err("Sin[x_] := x"), EvalError::ReservedSymbol { .. }));
}

#[test]
fn constants_stay_symbolic_but_feed_numeric_builtins() {
    assert_eq!(eval_raw("Pi"), "Pi");
    assert_eq!(eval_raw("Pi + 1"), "Plus[1, Pi]");
    assert_eq!(eval_raw("Floor[Pi]"), "3");
    assert!((numeric("Cos[Pi]") + 1.0).abs() < 1e-12);

    let mut ctx = EvaluationContext::new();
    assert!(matches!(*eval_in("Infinity", &mut ctx), Expr::Infinity));
}

#[test]
fn evaluation_is_idempotent_on_pure_expressions() {
    let fixtures = ["2 + 3",
                    "z + 1",
                    "{x, y, 3} + {1, 2, z}",
                    "True && x",
                    "x/-3x",
                    "Sin[x]",
                    "StringTake[\"Hello\", {2, 4}]"];

    for source in fixtures {
        let mut ctx = EvaluationContext::new();
        let once = eval_in(source, &mut ctx);
        let twice = evaluate(&once, &mut ctx).unwrap();
        assert_eq!(once, twice, "re-evaluation changed the result of {source:?}");
    }
}

#[test]
fn list_variant_and_list_call_are_interchangeable() {
    let mut ctx = EvaluationContext::new();

    // The parser emits FunctionCall("List", ...); evaluation normalizes.
    let parsed = parse_expression("{1, 2}").unwrap();
    assert!(matches!(&*parsed, Expr::FunctionCall { head, .. } if head == "List"));
    let evaluated = evaluate(&parsed, &mut ctx).unwrap();
    assert!(matches!(&*evaluated, Expr::List(_)));

    // Both shapes broadcast the same way.
    let sum = Expr::call("Plus", vec![parsed, Expr::list(vec![Expr::number(10.0),
                                                              Expr::number(20.0)])]);
    assert_eq!(to_string_raw(&evaluate(&sum, &mut ctx).unwrap()), "List[11, 22]");
}
