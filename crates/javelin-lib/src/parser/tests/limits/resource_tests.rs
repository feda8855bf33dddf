use crate::arena::ArenaLimits;
use crate::parser::core::Parser;
use crate::{JavaVersion, tokenize};

#[test]
fn the_arena_watchdog_aborts_the_parse() {
    let source = "class A { int a; int b; int c; }";
    let tokens = tokenize(source).unwrap();
    let parser = Parser::new(source, tokens, JavaVersion::latest()).with_arena_limits(
        ArenaLimits {
            max_nodes: 4,
            ..ArenaLimits::default()
        },
    );

    let err = parser.parse().expect_err("arena budget is tiny");
    assert!(err.message().contains("Arena is full"));
}

#[test]
fn default_budgets_are_generous() {
    let source = "class A { int a; int b; int c; }";
    let tokens = tokenize(source).unwrap();
    let parser = Parser::new(source, tokens, JavaVersion::latest());
    parser.parse().expect("default limits fit real sources");
}
