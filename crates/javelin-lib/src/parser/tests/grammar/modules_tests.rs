use crate::parser::tests::{child_kinds, find, parse_err, parse_ok};
use crate::{JavaVersion, NodeKind, parse_with_version};
use indoc::indoc;

#[test]
fn module_with_all_directive_kinds() {
    let source = indoc! {r#"
        module com.app {
            requires java.base;
            exports com.app.api to other.mod, third.mod;
            opens com.app.impl;
            uses com.app.Service;
            provides com.app.Service with com.app.Impl;
        }
    "#};
    let parse = parse_ok(source);
    let module = find(&parse, NodeKind::ModuleDeclaration);
    assert_eq!(
        child_kinds(&parse, module),
        [
            NodeKind::QualifiedName,
            NodeKind::RequiresDirective,
            NodeKind::ExportsDirective,
            NodeKind::OpensDirective,
            NodeKind::UsesDirective,
            NodeKind::ProvidesDirective,
        ]
    );

    let exports = find(&parse, NodeKind::ExportsDirective);
    assert_eq!(
        child_kinds(&parse, exports),
        [
            NodeKind::QualifiedName,
            NodeKind::QualifiedName,
            NodeKind::QualifiedName,
        ]
    );

    let provides = find(&parse, NodeKind::ProvidesDirective);
    assert_eq!(
        child_kinds(&parse, provides),
        [NodeKind::QualifiedName, NodeKind::QualifiedName]
    );
}

#[test]
fn open_module() {
    let parse = parse_ok("open module com.app {}");
    let module = find(&parse, NodeKind::ModuleDeclaration);
    assert_eq!(child_kinds(&parse, module), [NodeKind::QualifiedName]);
}

#[test]
fn requires_with_modifiers() {
    let source = "module m { requires transitive a.b; requires static c.d; }";
    let parse = parse_ok(source);
    let module = find(&parse, NodeKind::ModuleDeclaration);
    assert_eq!(
        child_kinds(&parse, module),
        [
            NodeKind::QualifiedName,
            NodeKind::RequiresDirective,
            NodeKind::RequiresDirective,
        ]
    );
}

#[test]
fn requires_a_module_named_transitive() {
    let source = "module m { requires transitive; }";
    let parse = parse_ok(source);
    let directive = find(&parse, NodeKind::RequiresDirective);
    let name = parse.arena.children(directive).next().unwrap();
    assert_eq!(parse.arena.text(name, source), "transitive");
}

#[test]
fn imports_may_precede_a_module() {
    let source = "import java.util.List;\nmodule m { uses a.B; }";
    let parse = parse_ok(source);
    assert_eq!(
        child_kinds(&parse, parse.root),
        [NodeKind::ImportDeclaration, NodeKind::ModuleDeclaration]
    );
}

#[test]
fn annotated_module() {
    let parse = parse_ok("@Deprecated module m {}");
    let module = find(&parse, NodeKind::ModuleDeclaration);
    assert_eq!(
        child_kinds(&parse, module),
        [NodeKind::Annotation, NodeKind::QualifiedName]
    );
}

#[test]
fn module_without_braces_fails() {
    let err = parse_err("module test;");
    assert_eq!(
        err.message(),
        "Expected '{' but found ';' at line 1, column 12"
    );
}

#[test]
fn unclosed_module_body_fails() {
    let err = parse_err("module m {\n    requires a.b;\n");
    assert!(err.message().contains("end of file"));
}

#[test]
fn modules_are_gated_by_version() {
    let err = parse_with_version("module m {}", JavaVersion::Java8)
        .expect_err("modules need Java 9+");
    assert!(
        err.message()
            .contains("Module declarations are not supported in Java 8")
    );

    parse_with_version("module m {}", JavaVersion::Java11).expect("modules parse at Java 11");
}

#[test]
fn module_words_stay_identifiers_elsewhere() {
    // Every module keyword is contextual and usable as a plain name.
    let parse = parse_ok(
        "class T { int module; void m() { int requires = module; exports(requires); } }",
    );
    find(&parse, NodeKind::FieldDeclaration);
    find(&parse, NodeKind::MethodInvocation);
}
