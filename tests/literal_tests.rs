// tests/literal_tests.rs

use zq_parse::ast::{Expr, Primitive};
use zq_parse::parse_expr;

fn primitive(source: &str) -> Primitive {
    match parse_expr(source) {
        Ok(Expr::Primitive(p)) => p,
        Ok(other) => panic!("{:?} parsed to a non-literal: {:?}", source, other),
        Err(e) => panic!("{:?} failed to parse: {}", source, e),
    }
}

fn assert_literal(source: &str, typ: &str, text: &str) {
    assert_eq!(primitive(source), Primitive::new(typ, text), "literal {:?}", source);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_double_and_single_quoted() {
    assert_literal("\"hello\"", "string", "hello");
    assert_literal("'it'", "string", "it");
}

#[test]
fn test_simple_escapes() {
    assert_literal(r#""a\nb\tc""#, "string", "a\nb\tc");
    assert_literal(r#""say \"hi\"""#, "string", "say \"hi\"");
    assert_literal(r#"'don\'t'"#, "string", "don't");
    assert_literal(r#""back\\slash""#, "string", "back\\slash");
    assert_literal(r#""\x41""#, "string", "A");
}

#[test]
fn test_unicode_escapes() {
    assert_literal(r#""caf\u00e9""#, "string", "café");
    assert_literal(r#""\u{1F600}""#, "string", "\u{1F600}");
}

#[test]
fn test_surrogate_pair_combines() {
    assert_literal(r#""\ud83d\ude00""#, "string", "\u{1F600}");
}

#[test]
fn test_lone_surrogate_is_replaced() {
    assert_literal(r#""\ud83d!""#, "string", "\u{FFFD}!");
}

#[test]
fn test_unterminated_string_fails() {
    assert!(parse_expr("\"open").is_err());
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integers() {
    assert_literal("42", "int64", "42");
    assert_literal("0", "int64", "0");
    assert_literal("9223372036854775807", "int64", "9223372036854775807");
}

#[test]
fn test_integer_overflow_does_not_parse() {
    assert!(parse_expr("9223372036854775808").is_err());
}

#[test]
fn test_floats() {
    assert_literal("1.5", "float64", "1.5");
    assert_literal("1.", "float64", "1.");
    assert_literal(".25", "float64", ".25");
    assert_literal("1e10", "float64", "1e10");
    assert_literal("2.5E-3", "float64", "2.5E-3");
}

// ============================================================================
// Addresses
// ============================================================================

#[test]
fn test_ipv4() {
    assert_literal("10.0.0.1", "ip", "10.0.0.1");
    assert_literal("192.168.0.0/16", "net", "192.168.0.0/16");
}

#[test]
fn test_ipv6() {
    assert_literal("::", "ip", "::");
    assert_literal("::1", "ip", "::1");
    assert_literal("fe80::1", "ip", "fe80::1");
    assert_literal("2001:db8::/32", "net", "2001:db8::/32");
    assert_literal("1:2:3:4:5:6:7:8", "ip", "1:2:3:4:5:6:7:8");
    assert_literal("::ffff:10.0.0.1", "ip", "::ffff:10.0.0.1");
}

// ============================================================================
// Time and duration
// ============================================================================

#[test]
fn test_durations() {
    assert_literal("1h", "duration", "1h");
    assert_literal("1h30m", "duration", "1h30m");
    assert_literal("-5s", "duration", "-5s");
    assert_literal("1.5ms", "duration", "1.5ms");
    assert_literal("2d", "duration", "2d");
}

#[test]
fn test_times() {
    assert_literal("2021-01-02T03:04:05Z", "time", "2021-01-02T03:04:05Z");
    assert_literal(
        "2021-01-02T03:04:05.123+07:00",
        "time",
        "2021-01-02T03:04:05.123+07:00",
    );
}

// ============================================================================
// Booleans and null
// ============================================================================

#[test]
fn test_bool_and_null() {
    assert_literal("true", "bool", "true");
    assert_literal("false", "bool", "false");
    assert_literal("null", "null", "");
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(parse_expr("trueish").unwrap(), Expr::id("trueish"));
    assert_eq!(parse_expr("nullable").unwrap(), Expr::id("nullable"));
}

#[test]
fn test_boolean_keywords_are_lowercase_only() {
    assert_eq!(parse_expr("True").unwrap(), Expr::id("True"));
    assert_eq!(parse_expr("FALSE").unwrap(), Expr::id("FALSE"));
}

#[test]
fn test_primitive_wire_shape() {
    assert_eq!(
        serde_json::to_value(parse_expr("10.0.0.1").unwrap()).unwrap(),
        serde_json::json!({"kind": "Primitive", "type": "ip", "text": "10.0.0.1"})
    );
}
