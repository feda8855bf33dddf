use crate::parser::tests::{child_kinds, find, find_last, parse_ok};
use crate::NodeKind;

fn declaration(decl: &str) -> String {
    format!("class T {{ void m() {{ {decl} }} }}")
}

#[test]
fn parameterized_type_allocates_the_outer_name_first() {
    let source = declaration("Map<String, List<Integer>> m;");
    let parse = parse_ok(&source);

    let outer = find_last(&parse, NodeKind::ParameterizedType);
    assert_eq!(
        parse.arena.text(outer, &source),
        "Map<String, List<Integer>>"
    );
    assert_eq!(
        child_kinds(&parse, outer),
        [
            NodeKind::QualifiedName,
            NodeKind::QualifiedName,
            NodeKind::ParameterizedType,
        ]
    );

    let inner = find(&parse, NodeKind::ParameterizedType);
    assert_eq!(parse.arena.text(inner, &source), "List<Integer>");
    assert_eq!(
        child_kinds(&parse, inner),
        [NodeKind::QualifiedName, NodeKind::QualifiedName]
    );
}

#[test]
fn unbounded_wildcard() {
    let parse = parse_ok(&declaration("List<?> l;"));
    let wildcard = find(&parse, NodeKind::WildcardType);
    assert!(child_kinds(&parse, wildcard).is_empty());
}

#[test]
fn bounded_wildcards() {
    let parse = parse_ok(&declaration("List<? extends Number> l;"));
    let wildcard = find(&parse, NodeKind::WildcardType);
    assert_eq!(child_kinds(&parse, wildcard), [NodeKind::QualifiedName]);

    let parse = parse_ok(&declaration("Consumer<? super T> c;"));
    let wildcard = find(&parse, NodeKind::WildcardType);
    assert_eq!(child_kinds(&parse, wildcard), [NodeKind::QualifiedName]);
}

#[test]
fn array_types_nest_per_dimension() {
    let parse = parse_ok(&declaration("int[][] grid;"));
    let outer = find_last(&parse, NodeKind::ArrayType);
    assert_eq!(child_kinds(&parse, outer), [NodeKind::ArrayType]);
    let inner = find(&parse, NodeKind::ArrayType);
    assert_eq!(child_kinds(&parse, inner), [NodeKind::PrimitiveType]);
}

#[test]
fn annotated_array_dimension() {
    let parse = parse_ok(&declaration("int @A [] xs;"));
    let array = find(&parse, NodeKind::ArrayType);
    assert_eq!(
        child_kinds(&parse, array),
        [NodeKind::PrimitiveType, NodeKind::Annotation]
    );
}

#[test]
fn type_use_annotation_after_a_dot() {
    // The annotation becomes a child of the qualified name it decorates.
    // (The annotation's own name is also a QualifiedName, allocated
    // earlier; the decorated type closes last.)
    let parse = parse_ok("class T { Outer.@A Inner f; }");
    let name = find_last(&parse, NodeKind::QualifiedName);
    assert_eq!(child_kinds(&parse, name), [NodeKind::Annotation]);
}

#[test]
fn nested_parameterized_tail() {
    let source = "class C { Outer<T>.Inner<U> f; }";
    let parse = parse_ok(source);
    let outer = find_last(&parse, NodeKind::ParameterizedType);
    assert_eq!(parse.arena.text(outer, source), "Outer<T>.Inner<U>");
    assert_eq!(
        child_kinds(&parse, outer),
        [NodeKind::ParameterizedType, NodeKind::QualifiedName]
    );
}

#[test]
fn qualified_supertype() {
    let source = "class A extends b.c.D {}";
    let parse = parse_ok(source);
    let name = find(&parse, NodeKind::QualifiedName);
    assert_eq!(parse.arena.text(name, source), "b.c.D");
}

#[test]
fn generic_method_type_parameters() {
    let parse = parse_ok("class T { <K, V> Map<K, V> of(K k, V v) { return null; } }");
    let method = find(&parse, NodeKind::MethodDeclaration);
    let kinds = child_kinds(&parse, method);
    assert_eq!(
        &kinds[..3],
        [
            NodeKind::TypeParameter,
            NodeKind::TypeParameter,
            NodeKind::ParameterizedType,
        ]
    );
}

#[test]
fn shift_operators_still_work_next_to_generics() {
    let parse = parse_ok(&declaration("int x = bits >> 2; Set<Set<Long>> s;"));
    let shift = find(&parse, NodeKind::BinaryExpression);
    assert_eq!(
        child_kinds(&parse, shift),
        [NodeKind::Identifier, NodeKind::IntegerLiteral]
    );
    find(&parse, NodeKind::ParameterizedType);
}
