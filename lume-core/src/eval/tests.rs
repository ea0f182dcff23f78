use crate::environment::prelude::{Value, FALSE, NULL, TRUE};
use crate::parser::prelude::parse;

use super::{eval, new_root_env};

fn run(input: &str) -> Value {
    let (program, errors) = parse(input);

    assert!(errors.is_empty(), "parse errors for {input:?}: {errors:?}");

    eval(&program, new_root_env())
}

fn assert_int(input: &str, expected: i64) {
    assert_eq!(run(input), Value::Integer { value: expected }, "eval of {input:?}");
}

fn assert_float(input: &str, expected: f64) {
    assert_eq!(run(input), Value::Float { value: expected }, "eval of {input:?}");
}

fn assert_string(input: &str, expected: &str) {
    assert_eq!(
        run(input),
        Value::String { value: expected.to_string() },
        "eval of {input:?}"
    );
}

fn assert_bool(input: &str, expected: bool) {
    assert_eq!(run(input), Value::Boolean { value: expected }, "eval of {input:?}");
}

fn assert_error(input: &str, message: &str) {
    match run(input) {
        Value::Error { message: found } => assert_eq!(found, message, "error for {input:?}"),
        value => panic!("expected error {message:?} for {input:?}, got {value:?}")
    }
}

#[test]
fn test_integer_arithmetic() {
    assert_int("1 + 2 * 3", 7);
    assert_int("(1 + 2) * 3", 9);
    assert_int("10 - 2 - 3", 5);
    assert_int("10 / 2", 5);
    assert_int("7 / 2", 3);
    assert_int("-5", -5);
    assert_int("-(2 + 3)", -5);
    assert_int("2 * -3", -6);
}

#[test]
fn test_float_arithmetic() {
    assert_float("1.5 + 2.25", 3.75);
    assert_float("2.0 * 3.5", 7.0);
    assert_float("-1.5", -1.5);
    assert_float("1.0 / 4.0", 0.25);
    // IEEE 754 semantics for float division by zero.
    assert_float("1.0 / 0.0", f64::INFINITY);
}

#[test]
fn test_string_operations() {
    assert_string("\"foo\" + \"bar\"", "foobar");
    assert_string("\"\" + \"x\"", "x");
    assert_bool("\"a\" == \"a\"", true);
    assert_bool("\"a\" != \"b\"", true);
    assert_error(
        "\"a\" - \"b\"",
        "unsupported operator '-' for type string"
    );
}

#[test]
fn test_comparisons() {
    assert_bool("1 < 2", true);
    assert_bool("2 <= 2", true);
    assert_bool("3 > 4", false);
    assert_bool("4 >= 4", true);
    assert_bool("1.5 < 2.5", true);
    assert_bool("1 == 1", true);
    assert_bool("1 != 1", false);
    assert_bool("true == true", true);
    assert_bool("true != false", true);
}

#[test]
fn test_bang_follows_truthiness() {
    assert_bool("!true", false);
    assert_bool("!false", true);
    assert_bool("!5", false);
    assert_bool("!\"\"", false);
    assert_bool("!!5", true);
    // An if with no taken branch yields null, which is falsy.
    assert_bool("!(if false { 1 })", true);
}

#[test]
fn test_type_mismatches() {
    assert_error("1 + true", "invalid operation 1 + true (mismatched types int and bool)");
    assert_error("1 + 2.0", "invalid operation 1 + 2.0 (mismatched types int and float)");
    assert_error("\"a\" + 1", "invalid operation a + 1 (mismatched types string and int)");
    assert_error("true + false", "unsupported operator '+' for type bool");
    assert_error("-true", "unsupported operator '-' for type bool");
}

#[test]
fn test_division_by_zero() {
    assert_error("1 / 0", "division by zero");
    assert_error("x = 0; 10 / x", "division by zero");
}

#[test]
fn test_if_expressions() {
    assert_int("if (1 < 2) { 10 } else { 20 }", 10);
    assert_int("if (1 > 2) { 10 } else { 20 }", 20);
    assert_eq!(run("if false { 10 }"), NULL);
    assert_int("if 5 { 1 } else { 2 }", 1);
    assert_int("x = 3; if x == 1 { 10 } else if x == 2 { 20 } else if x == 3 { 30 } else { 40 }", 30);
    assert_int("if true { 1; 2; 3 }", 3);
}

#[test]
fn test_logical_operators_short_circuit() {
    assert_bool("true && true", true);
    assert_bool("true && false", false);
    assert_bool("false || true", true);
    assert_bool("false || false", false);
    assert_bool("1 && 2", true);

    // A decisive boolean left operand skips the right operand entirely.
    assert_bool("false && boom", false);
    assert_bool("true || boom", true);
    assert_int("x = 1; false && (x = 2); x", 1);
    assert_int("x = 1; true || (x = 2); x", 1);

    // A falsy non-boolean left operand is not decisive; the right operand
    // still runs.
    assert_error("(if false { 1 }) && boom", "identifier not found: boom");
    assert_bool("(if false { 1 }) && true", false);
}

#[test]
fn test_identifiers_and_assignment() {
    assert_int("x = 5; x", 5);
    assert_int("x = 5; x = x + 1; x", 6);
    assert_int("x = 5", 5);
    // Assignment is left associative, so a chain folds its own assignment
    // into the target and fails as a non-lvalue.
    assert_error("y = x = 3", "cannot assign to (y = x)");
    assert_error("missing", "identifier not found: missing");
    assert_error("1 = 2", "cannot assign to 1");
}

#[test]
fn test_compound_assignment() {
    assert_int("x = 5; x += 2; x", 7);
    assert_int("x = 5; x -= 2; x", 3);
    assert_int("x = 5; x *= 2; x", 10);
    assert_int("x = 6; x /= 2; x", 3);
    assert_int("x = 5; x += 2", 7);
    assert_error("y += 1", "identifier not found: y");
    assert_error("x = 1; x += true", "invalid operation 1 + true (mismatched types int and bool)");
}

#[test]
fn test_functions_and_calls() {
    assert_int("fn(x, y){ x + y }(3, 4)", 7);
    assert_int("add = fn(a, b) { a + b }; add(1, add(2, 3))", 6);
    assert_int("id = fn(x) { x }; id(42)", 42);
    assert_int("fn() { 99 }()", 99);
    assert_error("fn(x) { x }(1, 2)", "wrong number of arguments: expected 1, got 2");
    assert_error("fn(x, y) { x }(1)", "wrong number of arguments: expected 2, got 1");
    assert_error("5(1)", "not a function: int");
    assert_error("boom(1)", "identifier not found: boom");
}

#[test]
fn test_closures() {
    // Lookup goes through the live environment chain, not a snapshot.
    assert_int("x = 1; f = fn() { x }; x = 2; f()", 2);
    assert_int("fn(n){ if (n < 2) { n } else { fn(){ n }() } }(5)", 5);
    assert_int(
        "make = fn() { c = 0; fn() { c += 1; c } }; counter = make(); counter(); counter()",
        2
    );
    // Separate calls get separate scopes.
    assert_int(
        "make = fn() { c = 0; fn() { c += 1; c } }; a = make(); b = make(); a(); a(); b()",
        1
    );
    assert_int(
        "adder = fn(x) { fn(y) { x + y } }; add2 = adder(2); add2(40)",
        42
    );
}

#[test]
fn test_recursion() {
    assert_int(
        "fact = fn(n) { if n < 2 { 1 } else { n * fact(n - 1) } }; fact(5)",
        120
    );
    assert_int(
        "fib = fn(n) { if n < 2 { n } else { fib(n - 1) + fib(n - 2) } }; fib(10)",
        55
    );
}

#[test]
fn test_return_unwraps_at_call_boundary() {
    assert_int("f = fn() { return 10; 20 }; f()", 10);
    assert_int("f = fn() { if true { return 1; }; 2 }; f()", 1);
    assert_int("f = fn() { if true { if true { return 1; } }; 2 }; f()", 1);
    // Only the nearest call unwraps.
    assert_int("outer = fn() { inner = fn() { return 1; }; inner(); 2 }; outer()", 2);
}

#[test]
fn test_return_at_top_level_stays_wrapped() {
    assert_eq!(
        run("return 5"),
        Value::ReturnValue { value: Box::new(Value::Integer { value: 5 }) }
    );
    // The block stops at the return.
    assert_eq!(
        run("return 5; 6"),
        Value::ReturnValue { value: Box::new(Value::Integer { value: 5 }) }
    );
}

#[test]
fn test_lists() {
    assert_int("[1, 2, 3][1]", 2);
    assert_int("[1, 2, 3][0]", 1);
    assert_error("[1, 2, 3][5]", "index out of range");
    assert_error("[1, 2, 3][-1]", "index out of range");
    assert_int("xs = [1, [2, 3]]; xs[1][0]", 2);
    assert_bool("[1, 2] == [1, 2]", true);
    assert_bool("[1] == [2]", false);
    assert_bool("[1] != [1, 2]", true);
    assert_eq!(run("[1, \"two\", 3.0]").to_string(), "[1, two, 3.0]");
}

#[test]
fn test_string_indexing() {
    assert_string("\"abc\"[0]", "a");
    assert_string("\"abc\"[2]", "c");
    assert_error("\"abc\"[3]", "index out of range");
    assert_error("\"abc\"[-1]", "index out of range");
    assert_error("1[0]", "unsupported operator '[]' for types int and int");
    assert_error("[1][\"a\"]", "unsupported operator '[]' for types list and string");
}

#[test]
fn test_index_assignment_mutates_the_slot() {
    assert_int("xs = [1, 2, 3]; xs[0] = 9; xs[0]", 9);
    assert_int("xs = [1, 2, 3]; xs[1] += 10; xs[1]", 12);
    assert_int("xs = [1, 2, 3]; xs[0] = 9", 9);
    assert_error("xs = [1]; xs[5] = 2", "index out of range");
    assert_error("\"abc\"[0] = \"x\"", "cannot assign to index of type string");
    assert_int("xs = [[1], [2]]; xs[0][0] = 7; xs[0][0]", 7);
}

#[test]
fn test_lists_share_their_elements() {
    assert_int("xs = [1]; ys = xs; ys[0] = 2; xs[0]", 2);
    assert_int("f = fn(list) { list[0] = 5 }; xs = [1]; f(xs); xs[0]", 5);
}

#[test]
fn test_function_equality_is_by_identity() {
    assert_bool("f = fn() { 1 }; f == f", true);
    assert_bool("f = fn() { 1 }; g = f; f == g", true);
    assert_bool("fn() { 1 } == fn() { 1 }", false);
}

#[test]
fn test_errors_short_circuit_compound_evaluation() {
    assert_error("(1 + true) + 2", "invalid operation 1 + true (mismatched types int and bool)");
    assert_error("2 + (1 + true)", "invalid operation 1 + true (mismatched types int and bool)");
    assert_error("[1, boom, 2]", "identifier not found: boom");
    assert_error("len(boom)", "identifier not found: boom");
    assert_error("boom[0]", "identifier not found: boom");
    assert_error("[1][boom]", "identifier not found: boom");
    assert_error("if boom { 1 }", "identifier not found: boom");
    assert_error("-boom", "identifier not found: boom");
    assert_error("return boom", "identifier not found: boom");

    // The leftmost failure wins.
    assert_error("first + second", "identifier not found: first");
}

#[test]
fn test_errors_stop_the_block() {
    assert_error("x = 1; boom; x = 2", "identifier not found: boom");
    assert_int("x = 1; f = fn() { boom }; x", 1);
}

#[test]
fn test_arguments_evaluate_left_to_right() {
    assert_int("x = 0; f = fn(a, b) { x }; f(x = 1, x = 2); x", 2);
    assert_error("f = fn(a, b) { a }; f(boom, other)", "identifier not found: boom");
}

#[test]
fn test_builtin_len() {
    assert_int("len(\"\")", 0);
    assert_int("len(\"abc\")", 3);
    assert_int("len([1, 2, 3])", 3);
    assert_int("len([])", 0);
    assert_error("len(1)", "unsupported argument of type int for len");
    assert_error("len()", "wrong number of arguments: expected 1, got 0");
    assert_error("len(\"a\", \"b\")", "wrong number of arguments: expected 1, got 2");
}

#[test]
fn test_builtin_type() {
    assert_string("type(1)", "int");
    assert_string("type(1.5)", "float");
    assert_string("type(\"x\")", "string");
    assert_string("type(true)", "bool");
    assert_string("type([])", "list");
    assert_string("type(fn() { 1 })", "fn");
    assert_string("type(len)", "builtin");
    assert_string("type(if false { 1 })", "null");
}

#[test]
fn test_builtin_append() {
    assert_int("len(append([1], 2, 3))", 3);
    assert_int("append([1], 2)[1]", 2);
    // append copies; the original list is untouched.
    assert_int("xs = [1]; ys = append(xs, 2); len(xs)", 1);
    assert_error("append(1, 2)", "unsupported argument of type int for append");
}

#[test]
fn test_builtin_println_yields_null() {
    assert_eq!(run("println(\"hi\")"), NULL);
    assert_eq!(run("print(\"hi\")"), NULL);
}

#[test]
fn test_empty_program_yields_null() {
    assert_eq!(run(""), NULL);
}

#[test]
fn test_truthiness_constants() {
    assert_eq!(run("true"), TRUE);
    assert_eq!(run("false"), FALSE);
    assert!(run("0").is_truthy());
    assert!(run("\"\"").is_truthy());
    assert!(!run("false").is_truthy());
    assert!(!run("if false { 1 }").is_truthy());
}

#[test]
fn test_caller_supplied_environment() {
    use std::{cell::RefCell, rc::Rc};
    use crate::environment::prelude::Environment;

    let (program, errors) = parse("x + 1");
    assert!(errors.is_empty());

    let mut env = Environment::new();
    env.set("x".to_string(), Value::Integer { value: 41 });

    let result = eval(&program, Rc::new(RefCell::new(env)));

    assert_eq!(result, Value::Integer { value: 42 });
}
