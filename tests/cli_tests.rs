// tests/cli_tests.rs
#![cfg(feature = "cli")]

use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use zq_parse::cli::{
    error_envelope, execute_check, execute_glob, read_source, render_ast, CheckOptions,
    CheckResult, CliError, GlobCommand,
};
use zq_parse::{parse_query, GlobOptions, ParseOptions};

// ============================================================================
// parse
// ============================================================================

#[test]
fn test_render_compact() {
    let rendered = render_ast("head 1", &ParseOptions::default(), false).unwrap();
    assert_eq!(
        rendered,
        r#"{"kind":"Sequential","procs":[{"kind":"Head","count":1}]}"#
    );
}

#[test]
fn test_render_pretty_is_same_document() {
    let pretty = render_ast("tail 2", &ParseOptions::default(), true).unwrap();
    assert!(pretty.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(value["procs"][0], json!({"kind": "Tail", "count": 2}));
}

#[test]
fn test_render_expression_start_rule() {
    let rendered = render_ast("a.b", &ParseOptions::with_start_rule("Expr"), false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["kind"], "BinaryExpr");
    assert_eq!(value["op"], ".");
}

#[test]
fn test_render_syntax_error_envelope() {
    let rendered = render_ast("head 5 $", &ParseOptions::default(), false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["op"], "Error");
    assert_eq!(value["found"], "$");
    assert_eq!(value["location"]["start"]["offset"], 7);
    assert!(value["expected"].as_array().is_some_and(|e| !e.is_empty()));
    assert!(value["error"].as_str().unwrap().starts_with("Expected "));
}

#[test]
fn test_envelope_at_end_of_input_has_null_found() {
    let err = parse_query("head |").unwrap_err();
    let value = serde_json::to_value(error_envelope(&err)).unwrap();
    assert_eq!(value["found"], serde_json::Value::Null);
    assert!(value.as_object().unwrap().contains_key("found"));
}

#[test]
fn test_duplicate_argument_envelope() {
    let err = parse_query("sort -r -r").unwrap_err();
    let value = serde_json::to_value(error_envelope(&err)).unwrap();
    assert_eq!(value["op"], "Error");
    assert_eq!(value["error"], "Duplicate argument -r");
    assert!(value.get("expected").is_none());
    assert!(value.get("found").is_none());
    assert_eq!(value["location"]["start"]["offset"], 0);
}

#[test]
fn test_unknown_start_rule_envelope() {
    let rendered = render_ast("x", &ParseOptions::with_start_rule("Nope"), false).unwrap();
    assert_eq!(
        rendered,
        r#"{"op":"Error","error":"unknown start rule: Nope"}"#
    );
}

#[test]
fn test_read_source_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "count() by host").unwrap();
    let source = read_source(Some(file.path())).unwrap();
    assert_eq!(source, "count() by host");
}

#[test]
fn test_read_source_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.zq");
    assert!(matches!(read_source(Some(&missing)), Err(CliError::Io(_))));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_valid_query() {
    let options = CheckOptions {
        query: "sort -r ts | head".into(),
        start_rule: None,
    };
    assert_eq!(execute_check(&options).unwrap(), CheckResult::SyntaxValid);
}

#[test]
fn test_check_invalid_query() {
    let options = CheckOptions {
        query: "head |".into(),
        start_rule: None,
    };
    let err = execute_check(&options).unwrap_err();
    assert!(matches!(err, CliError::Parse(zq_parse::Error::Syntax(_))));
    assert!(err.to_string().starts_with("Parse error: Expected "));
}

#[test]
fn test_check_with_type_rule() {
    let options = CheckOptions {
        query: "|{string:int64}|".into(),
        start_rule: Some("Type".into()),
    };
    assert!(execute_check(&options).is_ok());
}

// ============================================================================
// glob
// ============================================================================

#[test]
fn test_glob_translation_only() {
    let result = execute_glob(&GlobCommand {
        pattern: "foo*".into(),
        ..GlobCommand::default()
    })
    .unwrap();
    assert_eq!(result.regex, "^foo.*$");
    assert_eq!(result.matched, None);
}

#[test]
fn test_glob_with_subject() {
    let command = GlobCommand {
        pattern: "*.{zng,zson}".into(),
        options: GlobOptions {
            extended: true,
            ..GlobOptions::default()
        },
        test: Some("data.zson".into()),
    };
    let result = execute_glob(&command).unwrap();
    assert_eq!(result.matched, Some(true));

    let miss = GlobCommand {
        test: Some("data.json".into()),
        ..command
    };
    assert_eq!(execute_glob(&miss).unwrap().matched, Some(false));
}
