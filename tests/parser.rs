use cassia::{ExprRef, ParseError, parse_expression, to_string_raw};

fn parse(source: &str) -> ExprRef {
    parse_expression(source).unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"))
}

/// The literal tree shape of a parse, e.g. `Plus[2, 3]`.
fn raw(source: &str) -> String {
    to_string_raw(&parse(source))
}

/// The canonical rendering of a parse.
fn printed(source: &str) -> String {
    parse(source).to_string()
}

#[test]
fn basic_expressions() {
    assert_eq!(raw("2 + 3"), "Plus[2, 3]");
    assert_eq!(printed("2 + 3"), "2 + 3");
    assert_eq!(raw("x + 1"), "Plus[x, 1]");
    assert_eq!(printed("x + 1"), "x + 1");
}

#[test]
fn negative_numbers_fold_into_literals() {
    assert_eq!(raw("-2"), "-2");
    assert_eq!(raw("-2 + 3"), "Plus[-2, 3]");
    assert_eq!(printed("-2 + 3"), "-2 + 3");
    assert_eq!(raw("2 + -3"), "Plus[2, -3]");
    assert_eq!(printed("2 + -3"), "2 + -3");
    assert_eq!(raw("-2 + -3"), "Plus[-2, -3]");
}

#[test]
fn function_calls_preserve_head_case() {
    assert_eq!(raw("sin[x]"), "sin[x]");
    assert_eq!(printed("sin[x]"), "sin[x]");
    assert_eq!(raw("Sin[x]"), "Sin[x]");
    assert_eq!(raw("max[2, min[3, 4]]"), "max[2, min[3, 4]]");
    assert_eq!(printed("max[2, min[3, 4]]"), "max[2, min[3, 4]]");
}

#[test]
fn negative_arguments_in_function_calls() {
    assert_eq!(raw("sin[-x]"), "sin[Times[-1, x]]");
    assert_eq!(printed("sin[-x]"), "sin[-x]");
    assert_eq!(raw("max[-2, min[-3, -4]]"), "max[-2, min[-3, -4]]");
}

#[test]
fn power_binds_tighter_than_unary_minus() {
    assert_eq!(raw("2^3"), "Power[2, 3]");
    assert_eq!(printed("2^3"), "2^3");
    assert_eq!(raw("-2^3"), "Times[-1, Power[2, 3]]");
    assert_eq!(printed("-2^3"), "-2^3");
    assert_eq!(raw("2^-3"), "Power[2, -3]");
    assert_eq!(printed("2^-3"), "2^-3");
    assert_eq!(raw("a^b^c"), "Power[a, Power[b, c]]");
}

#[test]
fn implicit_multiplication() {
    assert_eq!(raw("2x"), "Times[2, x]");
    assert_eq!(raw("-2x"), "Times[-2, x]");
    assert_eq!(raw("3X"), "Times[3, X]");
    assert_eq!(raw("2(3 + x)"), "Times[2, Plus[3, x]]");
    assert_eq!(raw("b C"), "Times[b, C]");
}

#[test]
fn plus_and_times_flatten() {
    assert_eq!(raw("a + b + c"), "Plus[a, b, c]");
    assert_eq!(raw("a + (b + c)"), "Plus[a, b, c]");
    assert_eq!(raw("2 * 3 * x"), "Times[2, 3, x]");
    assert_eq!(raw("2x y"), "Times[2, x, y]");
    assert_eq!(raw("a - b + c"), "Plus[Subtract[a, b], c]");
    assert_eq!(raw("a + b - c"), "Subtract[Plus[a, b], c]");
}

#[test]
fn division_binds_adjacent_products() {
    assert_eq!(raw("x/-3x"), "Divide[x, Times[-3, x]]");
    assert_eq!(raw("y/2y"), "Divide[y, Times[2, y]]");
    assert_eq!(raw("a/-b"), "Divide[a, Times[-1, b]]");
    assert_eq!(raw("z/4w"), "Divide[z, Times[4, w]]");
    assert_eq!(raw("t/-7t"), "Divide[t, Times[-7, t]]");
    assert_eq!(raw("m/(-2m)"), "Divide[m, Times[-2, m]]");
    assert_eq!(raw("p/(-q)"), "Divide[p, Times[-1, q]]");
    // Explicit operators are not absorbed into the denominator.
    assert_eq!(raw("x/2*y"), "Times[Divide[x, 2], y]");
}

#[test]
fn division_with_negative_numerators() {
    assert_eq!(raw("-52/(3X)"), "Divide[-52, Times[3, X]]");
    assert_eq!(raw("-7/(2y)"), "Divide[-7, Times[2, y]]");
    assert_eq!(raw("-a/(bC)"), "Divide[Times[-1, a], bC]");
    assert_eq!(raw("-a/(b C)"), "Divide[Times[-1, a], Times[b, C]]");
    assert_eq!(raw("-1/(4z)"), "Divide[-1, Times[4, z]]");
    assert_eq!(raw("-2/(x^2)"), "Divide[-2, Power[x, 2]]");
    assert_eq!(raw("-x/(y+z)"), "Divide[Times[-1, x], Plus[y, z]]");
    assert_eq!(raw("-3/(Sin[x])"), "Divide[-3, Sin[x]]");
    assert_eq!(raw("-a/(b_c)"), "Divide[Times[-1, a], b_c]");
}

#[test]
fn assignments_and_definitions() {
    assert_eq!(raw("x = 2"), "Set[x, 2]");
    assert_eq!(raw("x = y = 2"), "Set[x, Set[y, 2]]");
    assert_eq!(raw("f[x_] = x"), "Set[f[x_], x]");
    assert_eq!(raw("f[x_, y_] := x + y"), "SetDelayed[f[x_, y_], Plus[x, y]]");
    assert_eq!(raw("g[x_:0] := x"), "SetDelayed[g[x_:0], x]");
}

#[test]
fn invalid_assignment_targets() {
    assert!(matches!(parse_expression("2 = 3"),
                     Err(ParseError::InvalidAssignmentTarget { .. })));
    assert!(matches!(parse_expression("x := 2"),
                     Err(ParseError::InvalidAssignmentTarget { .. })));
    assert!(matches!(parse_expression("f[2] := x"),
                     Err(ParseError::InvalidParameterPattern { .. })));
}

#[test]
fn if_parses_as_plain_call() {
    assert_eq!(raw("If[x == 0, 1, 2]"), "If[Equal[x, 0], 1, 2]");
}

#[test]
fn comparisons_are_non_associative() {
    assert_eq!(raw("x == 0"), "Equal[x, 0]");
    assert_eq!(raw("x != 0"), "Unequal[x, 0]");
    assert_eq!(raw("x <= y"), "LessEqual[x, y]");
    assert!(matches!(parse_expression("a < b < c"),
                     Err(ParseError::TrailingInput { .. })));
}

#[test]
fn logical_operator_precedence() {
    assert_eq!(raw("True && False"), "And[True, False]");
    assert_eq!(raw("True || False"), "Or[True, False]");
    assert_eq!(raw("True && False || True"), "Or[And[True, False], True]");
    assert_eq!(raw("x && y"), "And[x, y]");
    assert_eq!(raw("(True || False) && x"), "And[Or[True, False], x]");
    assert_eq!(raw("!x"), "Not[x]");
}

#[test]
fn string_concatenation_flattens() {
    assert_eq!(raw("\"a\" <> \"b\""), "StringJoin[\"a\", \"b\"]");
    assert_eq!(raw("\"Hello\" <> \" \" <> \"World\""),
               "StringJoin[\"Hello\", \" \", \"World\"]");
}

#[test]
fn rules_bind_below_concatenation() {
    assert_eq!(raw("\"World\" -> \"x\""), "Rule[\"World\", \"x\"]");
    assert_eq!(raw("\"a\" <> \"b\" -> \"c\""), "Rule[StringJoin[\"a\", \"b\"], \"c\"]");
    assert_eq!(raw("a -> b -> c"), "Rule[a, Rule[b, c]]");
    assert_eq!(raw("StringReplace[\"Hello World\", \"World\" -> \"x\"]"),
               "StringReplace[\"Hello World\", Rule[\"World\", \"x\"]]");
}

#[test]
fn list_literals() {
    assert_eq!(raw("{1, 2, 3}"), "List[1, 2, 3]");
    assert_eq!(raw("{}"), "List[]");
    assert_eq!(raw("{{}, {}}"), "List[List[], List[]]");
    assert_eq!(raw("{1, {2, 3}, 4}"), "List[1, List[2, 3], 4]");
    assert_eq!(raw("{1, \"hello\", True, x}"), "List[1, \"hello\", True, x]");
    assert_eq!(raw("{1+2, x^2, f[3]}"), "List[Plus[1, 2], Power[x, 2], f[3]]");
    assert_eq!(raw("f[{1, 2}, 3]"), "f[List[1, 2], 3]");
    assert_eq!(raw("Length[{1, 2, 3}]"), "Length[List[1, 2, 3]]");
}

#[test]
fn constants_parse_as_symbols() {
    for name in ["Pi", "E", "Degree", "GoldenRatio", "Catalan", "EulerGamma", "Infinity"] {
        assert_eq!(raw(name), name, "constant {name} should parse as a bare symbol");
    }
}

#[test]
fn parse_errors_carry_positions() {
    assert!(matches!(parse_expression(""), Err(ParseError::EmptyInput)));
    assert!(matches!(parse_expression("2 +"),
                     Err(ParseError::UnexpectedEndOfInput { .. })));
    assert!(matches!(parse_expression("(2 + 3"),
                     Err(ParseError::ExpectedClosingParen { position: 0 })));
    assert!(matches!(parse_expression("{1, 2"),
                     Err(ParseError::ExpectedClosingBrace { position: 0 })));
    assert!(matches!(parse_expression("f[1, 2"),
                     Err(ParseError::ExpectedClosingBracket { position: 1 })));
    assert!(matches!(parse_expression("2 ) 3"),
                     Err(ParseError::TrailingInput { .. })));
    assert!(matches!(parse_expression("2 3"), Err(ParseError::TrailingInput { .. })));

    let err = parse_expression("2 + $x").unwrap_err();
    assert_eq!(err.position(), 4);
}

#[test]
fn canonical_form_is_stable() {
    // parse(print(parse(s))) == parse(s) for representative inputs.
    let fixtures = ["2 + 3",
                    "-2 + 3",
                    "2 + -3",
                    "sin[-x]",
                    "2x",
                    "-2x y",
                    "2(3 + x)",
                    "-2^3",
                    "2^-3",
                    "x/-3x",
                    "x/2*y",
                    "a - b + c",
                    "{1, {2, 3}, {}}",
                    "\"a\" <> \"b\" -> \"c\"",
                    "True && False || !x",
                    "x == y",
                    "f[x_, y_:1] := x^y",
                    "Length[{1, 2}]"];

    for source in fixtures {
        let once = parse(source);
        let twice = parse(&once.to_string());
        assert_eq!(once, twice, "round trip changed the tree for {source:?}");
    }
}
