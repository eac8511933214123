// tests/glob_tests.rs

use proptest::prelude::*;
use zq_parse::glob::{compile, glob_to_regex_source, is_globby};
use zq_parse::GlobOptions;

fn extended() -> GlobOptions {
    GlobOptions {
        extended: true,
        ..GlobOptions::default()
    }
}

/// What the translator produces for text with no wildcards.
fn literal_source(pattern: &str) -> String {
    let mut out = String::from("^");
    for c in pattern.chars() {
        if matches!(c, '/' | '.' | '+') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('$');
    out
}

#[test]
fn test_default_star_crosses_slashes() {
    let re = compile("src/*.rs", &GlobOptions::default()).unwrap();
    assert!(re.is_match("src/main.rs"));
    assert!(re.is_match("src/parser/state.rs"));
    assert!(!re.is_match("src/main.rsx"));
}

#[test]
fn test_question_mark_is_literal_without_extended() {
    let re = compile("a?c", &GlobOptions::default()).unwrap();
    assert!(re.is_match("a?c"));
    assert!(!re.is_match("abc"));
}

#[test]
fn test_extended_classes_and_groups() {
    let re = compile("file[0-9].{txt,md}", &extended()).unwrap();
    assert!(re.is_match("file3.txt"));
    assert!(re.is_match("file7.md"));
    assert!(!re.is_match("fileX.txt"));
    assert!(!re.is_match("file3.rs"));
}

#[test]
fn test_globstar_keeps_single_star_in_segment() {
    let options = GlobOptions {
        globstar: true,
        ..GlobOptions::default()
    };
    let single = compile("src/*.rs", &options).unwrap();
    assert!(single.is_match("src/lib.rs"));
    assert!(!single.is_match("src/parser/state.rs"));

    let double = compile("src/**/*.rs", &options).unwrap();
    assert!(double.is_match("src/parser/state.rs"));
    assert!(double.is_match("src/a/b/c.rs"));
}

#[test]
fn test_case_flag_is_not_applied_by_translation() {
    // flags other than `g` are left to the caller
    let options = GlobOptions {
        flags: "i".into(),
        ..GlobOptions::default()
    };
    assert_eq!(glob_to_regex_source("ab*", &options), "^ab.*$");
}

#[test]
fn test_is_globby() {
    assert!(is_globby("foo*"));
    assert!(is_globby("a?b"));
    assert!(!is_globby("plain"));
    assert!(!is_globby(""));
}

proptest! {
    #[test]
    fn test_star_matches_any_filler(pattern in "[a-z./+*]{0,12}") {
        let re = compile(&pattern, &GlobOptions::default()).unwrap();
        let candidate = pattern.replace('*', "xyz");
        prop_assert!(re.is_match(&candidate), "{:?} vs {:?}", pattern, candidate);
    }

    #[test]
    fn test_extended_wildcards_match(pattern in "[a-z.?*]{0,12}") {
        let re = compile(&pattern, &extended()).unwrap();
        let candidate = pattern.replace('?', "q").replace('*', "");
        prop_assert!(re.is_match(&candidate), "{:?} vs {:?}", pattern, candidate);
    }

    #[test]
    fn test_globby_iff_translation_differs(pattern in "[a-z0-9./+*?]{0,12}") {
        let source = glob_to_regex_source(&pattern, &extended());
        prop_assert_eq!(is_globby(&pattern), source != literal_source(&pattern));
    }

    #[test]
    fn test_translation_is_total(pattern in "\\PC{0,16}") {
        let source = glob_to_regex_source(&pattern, &GlobOptions::default());
        prop_assert!(source.starts_with('^'));
        prop_assert!(source.ends_with('$'));
    }
}
