// tests/expression_tests.rs

use serde_json::json;
use std::time::{Duration, Instant};
use zq_parse::ast::{Entry, Expr, Field, Type};
use zq_parse::{parse_expr, parse_type};

fn expr(source: &str) -> Expr {
    parse_expr(source).unwrap_or_else(|e| panic!("{:?} failed to parse: {}", source, e))
}

fn int(text: &str) -> Expr {
    Expr::primitive("int64", text)
}

fn id(name: &str) -> Expr {
    Expr::id(name)
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    // Should be: Add(1, Multiply(2, 3))
    assert_eq!(
        expr("1 + 2 * 3"),
        Expr::binary("+", int("1"), Expr::binary("*", int("2"), int("3")))
    );
}

#[test]
fn test_parentheses() {
    // Should be: Multiply(Add(1, 2), 3)
    assert_eq!(
        expr("(1 + 2) * 3"),
        Expr::binary("*", Expr::binary("+", int("1"), int("2")), int("3"))
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        expr("a - b - c"),
        Expr::binary("-", Expr::binary("-", id("a"), id("b")), id("c"))
    );
}

#[test]
fn test_logical_precedence() {
    assert_eq!(
        expr("a == 1 and b < 2 or c"),
        Expr::binary(
            "or",
            Expr::binary(
                "and",
                Expr::binary("==", id("a"), int("1")),
                Expr::binary("<", id("b"), int("2")),
            ),
            id("c"),
        )
    );
}

#[test]
fn test_conditional() {
    assert_eq!(
        expr("a > 1 ? \"big\" : \"small\""),
        Expr::Conditional {
            cond: Box::new(Expr::binary(">", id("a"), int("1"))),
            then: Box::new(Expr::primitive("string", "big")),
            else_: Box::new(Expr::primitive("string", "small")),
        }
    );
}

#[test]
fn test_not_is_prefix_and_recursive() {
    assert_eq!(
        expr("!!a"),
        Expr::UnaryExpr {
            op: "!".into(),
            operand: Box::new(Expr::UnaryExpr {
                op: "!".into(),
                operand: Box::new(id("a")),
            }),
        }
    );
}

#[test]
fn test_in_operator() {
    assert_eq!(
        expr("x in [1, 2]"),
        Expr::binary(
            "in",
            id("x"),
            Expr::ArrayExpr {
                exprs: vec![int("1"), int("2")],
            },
        )
    );
}

#[test]
fn test_relational_operators() {
    for op in ["<", "<=", ">", ">=", "==", "!="] {
        assert_eq!(
            expr(&format!("a {} b", op)),
            Expr::binary(op, id("a"), id("b")),
            "operator {}",
            op
        );
    }
}

// ============================================================================
// Calls, casts, select
// ============================================================================

#[test]
fn test_function_call() {
    assert_eq!(expr("f(1, x)"), Expr::call("f", vec![int("1"), id("x")]));
    assert_eq!(expr("now()"), Expr::call("now", vec![]));
}

#[test]
fn test_type_named_call_is_cast() {
    assert_eq!(
        expr("int64(x)"),
        Expr::Cast {
            expr: Box::new(id("x")),
            typ: Type::primitive("int64"),
        }
    );
}

#[test]
fn test_call_needs_adjacent_paren() {
    assert!(parse_expr("f (x)").is_err());
}

#[test]
fn test_select_with_methods() {
    assert_eq!(
        expr("select(a, b).sort().head(1)"),
        Expr::SelectExpr {
            selectors: vec![id("a"), id("b")],
            methods: vec![Expr::call("sort", vec![]), Expr::call("head", vec![int("1")])],
        }
    );
}

#[test]
fn test_call_result_dereference() {
    assert_eq!(
        expr("f(x).y"),
        Expr::dot(Expr::call("f", vec![id("x")]), "y")
    );
}

// ============================================================================
// Dereference
// ============================================================================

#[test]
fn test_field_chain() {
    assert_eq!(
        expr("a.b[0]"),
        Expr::binary("[", Expr::dot(id("a"), "b"), int("0"))
    );
}

#[test]
fn test_root_forms() {
    assert_eq!(expr("this"), Expr::Root);
    assert_eq!(expr("."), Expr::Root);
    assert_eq!(expr(".x"), Expr::dot(Expr::Root, "x"));
    assert_eq!(
        expr(".[\"a b\"]"),
        Expr::binary("[", Expr::Root, Expr::primitive("string", "a b"))
    );
}

#[test]
fn test_slices() {
    assert_eq!(
        expr("a[1:2]"),
        Expr::binary(
            "[",
            id("a"),
            Expr::BinaryExpr {
                op: ":".into(),
                lhs: Some(Box::new(int("1"))),
                rhs: Some(Box::new(int("2"))),
            },
        )
    );
    assert_eq!(
        expr("a[:2]"),
        Expr::binary(
            "[",
            id("a"),
            Expr::BinaryExpr {
                op: ":".into(),
                lhs: None,
                rhs: Some(Box::new(int("2"))),
            },
        )
    );
}

#[test]
fn test_open_slice_wire_shape() {
    let value = serde_json::to_value(expr("a[1:]")).unwrap();
    assert_eq!(
        value["rhs"],
        json!({
            "kind": "BinaryExpr",
            "op": ":",
            "lhs": {"kind": "Primitive", "type": "int64", "text": "1"},
            "rhs": null
        })
    );
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_record_literal() {
    assert_eq!(
        expr("{a: 1, \"b c\": x}"),
        Expr::RecordExpr {
            fields: vec![
                Field {
                    name: "a".into(),
                    value: int("1"),
                },
                Field {
                    name: "b c".into(),
                    value: id("x"),
                },
            ],
        }
    );
    assert_eq!(expr("{}"), Expr::RecordExpr { fields: vec![] });
}

#[test]
fn test_set_and_map() {
    assert_eq!(
        expr("|[1, 2]|"),
        Expr::SetExpr {
            exprs: vec![int("1"), int("2")],
        }
    );
    assert_eq!(
        expr("|{\"a\": 1}|"),
        Expr::MapExpr {
            entries: vec![Entry {
                key: Expr::primitive("string", "a"),
                value: int("1"),
            }],
        }
    );
}

// ============================================================================
// Patterns and types
// ============================================================================

#[test]
fn test_matches_regexp() {
    assert_eq!(
        expr("a matches /foo.*/"),
        Expr::RegexpMatch {
            pattern: "foo.*".into(),
            expr: Box::new(id("a")),
        }
    );
}

#[test]
fn test_matches_glob() {
    assert_eq!(
        expr("a matches foo*"),
        Expr::RegexpMatch {
            pattern: "^foo.*$".into(),
            expr: Box::new(id("a")),
        }
    );
}

#[test]
fn test_type_value() {
    assert_eq!(
        expr("<int64>"),
        Expr::TypeValue {
            value: Type::primitive("int64"),
        }
    );
}

#[test]
fn test_complex_types() {
    assert_eq!(
        parse_type("{a:int64,b:[string]}").unwrap(),
        Type::TypeRecord {
            fields: vec![
                zq_parse::ast::TypeField {
                    name: "a".into(),
                    typ: Type::primitive("int64"),
                },
                zq_parse::ast::TypeField {
                    name: "b".into(),
                    typ: Type::TypeArray {
                        typ: Box::new(Type::primitive("string")),
                    },
                },
            ],
        }
    );
    assert_eq!(
        parse_type("(int64,string)").unwrap(),
        Type::TypeUnion {
            types: vec![Type::primitive("int64"), Type::primitive("string")],
        }
    );
    assert_eq!(
        parse_type("|{string:ip}|").unwrap(),
        Type::TypeMap {
            key_type: Box::new(Type::primitive("string")),
            val_type: Box::new(Type::primitive("ip")),
        }
    );
    assert_eq!(
        parse_type("|[net]|").unwrap(),
        Type::TypeSet {
            typ: Box::new(Type::primitive("net")),
        }
    );
}

#[test]
fn test_named_and_defined_types() {
    assert_eq!(
        parse_type("port").unwrap(),
        Type::TypeName { name: "port".into() }
    );
    assert_eq!(
        parse_type("port=(uint16)").unwrap(),
        Type::TypeDef {
            name: "port".into(),
            typ: Box::new(Type::primitive("uint16")),
        }
    );
}

// ============================================================================
// Nesting
// ============================================================================

fn nested_index(depth: usize) -> String {
    format!("{}b{}", "a[".repeat(depth), "]".repeat(depth))
}

#[test]
fn test_deeply_nested_index_is_fast() {
    let source = nested_index(30);
    let started = Instant::now();
    let mut parsed = expr(&source);
    assert!(started.elapsed() < Duration::from_secs(1), "took {:?}", started.elapsed());

    let mut depth = 0;
    while let Expr::BinaryExpr { op, lhs: Some(lhs), rhs: Some(rhs) } = parsed {
        assert_eq!(op, "[");
        assert_eq!(*lhs, id("a"));
        parsed = *rhs;
        depth += 1;
    }
    assert_eq!(depth, 30);
    assert_eq!(parsed, id("b"));
}

#[test]
fn test_deeply_nested_assignment_is_fast() {
    let index = nested_index(30);
    let started = Instant::now();
    for query in [
        format!("put x:={}", index),
        format!("cut {}", index),
        format!("select {} from t", index),
    ] {
        assert!(zq_parse::parse_query(&query).is_ok(), "{:?}", query);
    }
    assert!(started.elapsed() < Duration::from_secs(1), "took {:?}", started.elapsed());
}
