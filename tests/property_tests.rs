// tests/property_tests.rs

use proptest::prelude::*;
use zq_parse::ast::{Expr, Proc};
use zq_parse::{parse_expr, parse_query};

const VALID_QUERIES: &[&str] = &[
    "head 5",
    "count() by id",
    "sort -r ts | head",
    "foo bar or baz | tail",
    "put x:=y+1 | cut x",
    "split ( => head => tail )",
    "select a from t limit 3",
    "from ( file a.zng => head )",
];

proptest! {
    #[test]
    fn test_additive_chains_nest_left(n in 1usize..8) {
        let names: Vec<String> = (0..=n).map(|i| format!("v{}", i)).collect();
        let source = names.join(" + ");
        let expected = names[1..]
            .iter()
            .fold(Expr::id(&names[0]), |lhs, name| Expr::binary("+", lhs, Expr::id(name)));
        prop_assert_eq!(parse_expr(&source).unwrap(), expected);
    }

    #[test]
    fn test_head_count_round_trips(n in any::<u32>()) {
        let seq = parse_query(&format!("head {}", n)).unwrap();
        prop_assert_eq!(seq.procs, vec![Proc::Head { count: i64::from(n) }]);
    }

    #[test]
    fn test_valid_queries_parse(query in prop::sample::select(VALID_QUERIES)) {
        prop_assert!(parse_query(query).is_ok(), "{:?} did not parse", query);
    }

    #[test]
    fn test_trailing_dollar_always_fails(query in prop::sample::select(VALID_QUERIES)) {
        let broken = format!("{} $", query);
        let err = parse_query(&broken).unwrap_err();
        let offset = err.location().map(|l| l.start.offset);
        prop_assert_eq!(offset, Some(broken.len() - 1));
    }

    #[test]
    fn test_arbitrary_input_never_panics(source in "\\PC{0,24}") {
        let _ = parse_query(&source);
        let _ = parse_expr(&source);
    }
}
