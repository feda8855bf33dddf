use crate::parser::tests::{child_kinds, dump, find, parse_ok};
use crate::{JavaVersion, NodeKind, parse_with_version};
use indoc::indoc;

fn method_body(statements: &str) -> String {
    format!("class T {{ void m() {{ {statements} }} }}")
}

#[test]
fn local_variable_with_initializer() {
    insta::assert_snapshot!(dump("class T { void m() { int x = 1; } }"), @r#"
    CompilationUnit 0..35
      ClassDeclaration 0..35 name="T"
        MethodDeclaration 10..33
          PrimitiveType 10..14 "void"
          Identifier 15..16 "m"
          Block 19..33
            LocalVariableDeclaration 21..31
              PrimitiveType 21..24 "int"
              VariableDeclarator 25..30
                Identifier 25..26 "x"
                IntegerLiteral 29..30 "1"
    "#);
}

#[test]
fn if_else_chain() {
    let parse = parse_ok(&method_body("if (a) b(); else c();"));
    let stmt = find(&parse, NodeKind::IfStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [
            NodeKind::Identifier,
            NodeKind::ExpressionStatement,
            NodeKind::ExpressionStatement,
        ]
    );
}

#[test]
fn while_and_do_while() {
    let parse = parse_ok(&method_body("while (i < n) i++; do work(); while (busy);"));
    let while_stmt = find(&parse, NodeKind::WhileStatement);
    assert_eq!(
        child_kinds(&parse, while_stmt),
        [NodeKind::BinaryExpression, NodeKind::ExpressionStatement]
    );
    let do_stmt = find(&parse, NodeKind::DoStatement);
    assert_eq!(
        child_kinds(&parse, do_stmt),
        [NodeKind::ExpressionStatement, NodeKind::Identifier]
    );
}

#[test]
fn classic_for_with_multiple_declarators_and_updates() {
    let parse = parse_ok(&method_body("for (int i = 0, j = n; i < j; i++, j--) swap(i, j);"));
    let stmt = find(&parse, NodeKind::ForStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [
            NodeKind::LocalVariableDeclaration,
            NodeKind::BinaryExpression,
            NodeKind::PostfixExpression,
            NodeKind::PostfixExpression,
            NodeKind::ExpressionStatement,
        ]
    );
}

#[test]
fn empty_for_header() {
    let parse = parse_ok(&method_body("for (;;) spin();"));
    let stmt = find(&parse, NodeKind::ForStatement);
    assert_eq!(child_kinds(&parse, stmt), [NodeKind::ExpressionStatement]);
}

#[test]
fn enhanced_for() {
    let parse = parse_ok(&method_body("for (final String s : names) use(s);"));
    let stmt = find(&parse, NodeKind::EnhancedForStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [
            NodeKind::LocalVariableDeclaration,
            NodeKind::Identifier,
            NodeKind::ExpressionStatement,
        ]
    );
}

#[test]
fn enhanced_for_with_var() {
    let parse = parse_ok(&method_body("for (var item : items) use(item);"));
    let variable = find(&parse, NodeKind::LocalVariableDeclaration);
    assert_eq!(
        child_kinds(&parse, variable),
        [NodeKind::QualifiedName, NodeKind::VariableDeclarator]
    );
}

#[test]
fn switch_statement_with_colon_cases() {
    let source = method_body(indoc! {r#"
        switch (x) {
            case 1:
            case 2:
                a();
                break;
            default:
                b();
        }
    "#});
    let parse = parse_ok(&source);
    let stmt = find(&parse, NodeKind::SwitchStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [
            NodeKind::Identifier,
            NodeKind::SwitchCase,
            NodeKind::SwitchCase,
            NodeKind::SwitchCase,
        ]
    );
}

#[test]
fn switch_rules_with_patterns() {
    let source = method_body(indoc! {r#"
        switch (shape) {
            case Circle c -> area(c);
            case null, default -> fallback();
        }
    "#});
    let parse = parse_ok(&source);
    let pattern = find(&parse, NodeKind::TypePattern);
    assert_eq!(
        child_kinds(&parse, pattern),
        [NodeKind::QualifiedName, NodeKind::Identifier]
    );
    let case = find(&parse, NodeKind::SwitchCase);
    assert_eq!(
        child_kinds(&parse, case),
        [NodeKind::TypePattern, NodeKind::MethodInvocation]
    );
}

#[test]
fn try_catch_finally() {
    let source = method_body("try { risky(); } catch (IOException | SQLException e) { log(e); } finally { close(); }");
    let parse = parse_ok(&source);
    let stmt = find(&parse, NodeKind::TryStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [NodeKind::Block, NodeKind::CatchClause, NodeKind::Block]
    );
    let clause = find(&parse, NodeKind::CatchClause);
    assert_eq!(
        child_kinds(&parse, clause),
        [NodeKind::ParameterDeclaration, NodeKind::Block]
    );
    let param = find(&parse, NodeKind::ParameterDeclaration);
    assert_eq!(child_kinds(&parse, param), [NodeKind::UnionType]);
}

#[test]
fn try_with_resources() {
    let parse = parse_ok(&method_body("try (var in = open(); var out = create()) { copy(in, out); }"));
    let stmt = find(&parse, NodeKind::TryStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [
            NodeKind::LocalVariableDeclaration,
            NodeKind::LocalVariableDeclaration,
            NodeKind::Block,
        ]
    );
}

#[test]
fn try_without_handler_fails() {
    let err = crate::parser::tests::parse_err(&method_body("try { risky(); }"));
    assert!(err.message().contains("Expected 'catch' or 'finally'"));
}

#[test]
fn synchronized_statement() {
    let parse = parse_ok(&method_body("synchronized (lock) { counter++; }"));
    let stmt = find(&parse, NodeKind::SynchronizedStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [NodeKind::Identifier, NodeKind::Block]
    );
}

#[test]
fn labeled_break_and_continue() {
    let source = method_body(indoc! {r#"
        outer:
        for (;;) {
            for (;;) {
                if (a) break outer;
                if (b) continue outer;
            }
        }
    "#});
    let parse = parse_ok(&source);
    let labeled = find(&parse, NodeKind::LabeledStatement);
    assert_eq!(
        child_kinds(&parse, labeled),
        [NodeKind::Identifier, NodeKind::ForStatement]
    );
    let brk = find(&parse, NodeKind::BreakStatement);
    assert_eq!(child_kinds(&parse, brk), [NodeKind::Identifier]);
    let cont = find(&parse, NodeKind::ContinueStatement);
    assert_eq!(child_kinds(&parse, cont), [NodeKind::Identifier]);
}

#[test]
fn assert_with_message() {
    let parse = parse_ok(&method_body("assert x > 0 : \"positive\";"));
    let stmt = find(&parse, NodeKind::AssertStatement);
    assert_eq!(
        child_kinds(&parse, stmt),
        [NodeKind::BinaryExpression, NodeKind::StringLiteral]
    );
}

#[test]
fn return_throw_and_empty() {
    let parse = parse_ok(&method_body("if (done) return; ; throw new IllegalStateException();"));
    let ret = find(&parse, NodeKind::ReturnStatement);
    assert!(child_kinds(&parse, ret).is_empty());
    find(&parse, NodeKind::EmptyStatement);
    let throw = find(&parse, NodeKind::ThrowStatement);
    assert_eq!(
        child_kinds(&parse, throw),
        [NodeKind::ObjectCreationExpression]
    );
}

#[test]
fn yield_inside_switch_expression() {
    let source = method_body(indoc! {r#"
        int r = switch (x) {
            default -> {
                yield 3;
            }
        };
    "#});
    let parse = parse_ok(&source);
    let stmt = find(&parse, NodeKind::YieldStatement);
    assert_eq!(child_kinds(&parse, stmt), [NodeKind::IntegerLiteral]);
}

#[test]
fn yield_stays_an_identifier_elsewhere() {
    // As a plain name, `yield` is an ordinary variable.
    let parse = parse_ok(&method_body("yield = 5;"));
    let stmt = find(&parse, NodeKind::ExpressionStatement);
    assert_eq!(child_kinds(&parse, stmt), [NodeKind::AssignmentExpression]);
}

#[test]
fn local_class_declaration() {
    let parse = parse_ok(&method_body("final class Local {} new Local();"));
    find(&parse, NodeKind::ClassDeclaration);
    find(&parse, NodeKind::ObjectCreationExpression);
}

#[test]
fn local_record_declaration() {
    let parse = parse_ok(&method_body("record Pair(int a, int b) {} var p = new Pair(1, 2);"));
    find(&parse, NodeKind::RecordDeclaration);
}

#[test]
fn var_local_is_a_plain_name_below_java_10() {
    // `var` was a legal type name before it became contextual; either way
    // the declaration parses.
    let parse = parse_with_version(
        "class T { void m() { var x = 1; } }",
        JavaVersion::Java8,
    )
    .expect("var parses as a type name");
    let decl = find(&parse, NodeKind::LocalVariableDeclaration);
    assert_eq!(
        child_kinds(&parse, decl),
        [NodeKind::QualifiedName, NodeKind::VariableDeclarator]
    );
}
