use crate::parser::tests::parse_err;
use crate::{JavaVersion, parse_with_version};

#[test]
fn unclosed_class_reports_line_and_column() {
    let err = parse_err("class Test {");
    assert_eq!(
        err.message(),
        "Expected '}' but found end of file at line 1, column 13"
    );
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 13);
}

#[test]
fn wrong_token_class_is_named() {
    let err = parse_err("class 123 {}");
    assert_eq!(
        err.message(),
        "Expected identifier but found integer literal at line 1, column 7"
    );
}

#[test]
fn errors_on_later_lines_count_from_one() {
    let err = parse_err("class A {\n  int 5;\n}");
    assert_eq!(
        err.message(),
        "Expected identifier but found integer literal at line 2, column 7"
    );
}

#[test]
fn columns_count_utf16_units() {
    // 'Ä' is two UTF-8 bytes but one UTF-16 unit: the end of file sits at
    // column 10, not 11.
    let err = parse_err("class Ä {");
    assert!(err.message().ends_with("at line 1, column 10"));
}

#[test]
fn messages_never_use_byte_positions() {
    for source in ["class Test {", "class 123 {}", "module test;", "class A { void m( }"] {
        let err = parse_err(source);
        assert!(
            !err.message().contains("position"),
            "diagnostic leaked a byte position: {}",
            err.message()
        );
    }
}

#[test]
fn lex_errors_surface_with_location() {
    let err = parse_err("class A { String s = \"abc; }");
    assert!(err.message().starts_with("Unterminated string literal"));
    assert!(err.message().contains("at line 1, column"));
}

#[test]
fn no_partial_tree_on_failure() {
    // The result type makes this structural: a failure carries no arena.
    assert!(crate::parse("class A {").is_err());
}

#[test]
fn switch_rules_are_gated() {
    let source = "class T { void m() { switch (x) { case 1 -> a(); } } }";
    let err = parse_with_version(source, JavaVersion::Java8).expect_err("rules need Java 14+");
    assert!(err.message().contains("Switch rules are not supported in Java 8"));

    parse_with_version(source, JavaVersion::Java17).expect("rules parse at Java 17");
}

#[test]
fn pattern_instanceof_is_gated() {
    let source = "class T { void m() { if (o instanceof String s) use(s); } }";
    assert!(parse_with_version(source, JavaVersion::Java8).is_err());
    parse_with_version(source, JavaVersion::Java17).expect("patterns parse at Java 17");
}

#[test]
fn records_degrade_to_identifiers_below_java_16() {
    // In Java 8, `record` is a plain identifier, so the declaration shape
    // is simply not a declaration.
    let source = "record Point(int x, int y) { }";
    assert!(parse_with_version(source, JavaVersion::Java8).is_err());
    parse_with_version(source, JavaVersion::Java17).expect("records parse at Java 17");
}

#[test]
fn text_blocks_are_version_aware_in_the_lexer() {
    let source = "class T { String s = \"\"\"\n        hi\n        \"\"\"; }";
    assert!(parse_with_version(source, JavaVersion::Java8).is_err());
    parse_with_version(source, JavaVersion::Java17).expect("text blocks parse at Java 17");
}

#[test]
fn error_renderer_shows_the_source_line() {
    let err = parse_err("class Test {");
    let rendered = err.printer().source("class Test {").path("Test.java").render();
    assert!(rendered.contains("error"));
    assert!(rendered.contains("Test.java"));
    assert!(rendered.contains("class Test {"));
}

#[test]
fn renderer_without_source_falls_back_to_the_message() {
    let err = parse_err("class Test {");
    assert_eq!(err.printer().render(), err.message());
}
