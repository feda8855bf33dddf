use crate::parser::tests::{find, parse_ok};
use crate::NodeKind;

fn literal_node(literal: &str) -> (crate::Parse, String) {
    let source = format!("class T {{ Object v = {literal}; }}");
    (parse_ok(&source), source)
}

fn assert_literal(literal: &str, kind: NodeKind) {
    let (parse, source) = literal_node(literal);
    let node = find(&parse, kind);
    assert_eq!(parse.arena.text(node, &source), literal, "for {literal:?}");
}

#[test]
fn integer_literals() {
    assert_literal("42", NodeKind::IntegerLiteral);
    assert_literal("0x1F", NodeKind::IntegerLiteral);
    assert_literal("0777", NodeKind::IntegerLiteral);
    assert_literal("1_000_000", NodeKind::IntegerLiteral);
}

#[test]
fn long_literals() {
    assert_literal("42L", NodeKind::LongLiteral);
    assert_literal("0b1010_1100L", NodeKind::LongLiteral);
    assert_literal("0xFFl", NodeKind::LongLiteral);
}

#[test]
fn float_and_double_literals() {
    assert_literal("1.5f", NodeKind::FloatLiteral);
    assert_literal("2F", NodeKind::FloatLiteral);
    assert_literal("3.303e+23", NodeKind::DoubleLiteral);
    assert_literal("1.5", NodeKind::DoubleLiteral);
    assert_literal("2d", NodeKind::DoubleLiteral);
    assert_literal(".5", NodeKind::DoubleLiteral);
}

#[test]
fn boolean_and_null_literals() {
    assert_literal("true", NodeKind::BooleanLiteral);
    assert_literal("false", NodeKind::BooleanLiteral);
    assert_literal("null", NodeKind::NullLiteral);
}

#[test]
fn char_and_string_literals() {
    assert_literal("'a'", NodeKind::CharLiteral);
    assert_literal("'\\n'", NodeKind::CharLiteral);
    assert_literal("\"hello\"", NodeKind::StringLiteral);
    assert_literal("\"esc\\t\\\"q\\\"\"", NodeKind::StringLiteral);
}

#[test]
fn text_block_is_a_string_literal_node() {
    let source = "class T { String s = \"\"\"\n        hi\n        \"\"\"; }";
    let parse = parse_ok(source);
    let node = find(&parse, NodeKind::StringLiteral);
    assert!(parse.arena.text(node, source).starts_with("\"\"\""));
    assert!(parse.arena.text(node, source).ends_with("\"\"\""));
}
