use deft_types::Type;
use pretty_assertions::assert_eq;

use crate::body::{Expr, ForwardCall, Literal, Receiver, Stmt};
use crate::framework::{
    Annotation, ClassData, CompilationUnit, MethodData, Modifier, Modifiers, Origin, ParamData,
};

#[test]
fn annotation_matches_simple_and_qualified_names() {
    let ann = Annotation::new("@lombok.Def");
    assert_eq!(ann.name, "lombok.Def");
    assert!(ann.matches("Def"));
    assert!(ann.matches("lombok.Def"));
    assert!(!ann.matches("Opt"));
    assert!(ann.matches_any(&["Opt", "Def"]));
}

#[test]
fn annotation_args_lookup() {
    let ann = Annotation::new("Opt").with_arg("def", "3");
    assert_eq!(ann.arg("def"), Some("3"));
    assert_eq!(ann.arg("value"), None);
    assert_eq!(ann.first_arg(), Some("3"));
}

#[test]
fn modifiers_print_in_canonical_order() {
    let modifiers: Modifiers = [Modifier::Final, Modifier::Static, Modifier::Public]
        .into_iter()
        .collect();
    assert_eq!(modifiers.to_string(), "public static final");
    assert!(modifiers.is_static());
}

#[test]
fn unit_deserializes_from_json() {
    let json = r#"{
        "package": "demo",
        "classes": [{
            "name": "Foo",
            "methods": [{
                "name": "foo",
                "modifiers": ["static", "private"],
                "return_type": "void",
                "params": [
                    { "name": "a", "type": "int" },
                    { "name": "g", "type": "Optional<String>",
                      "annotations": [{ "name": "Def" }] }
                ]
            }]
        }]
    }"#;

    let unit: CompilationUnit = serde_json::from_str(json).unwrap();
    let method = &unit.classes[0].methods[0];
    assert_eq!(method.origin, Origin::Source);
    assert!(method.is_static());
    assert_eq!(method.params[1].ty.simple_name(), Some("Optional"));
    assert!(method.params[1].has_annotation("lombok.Def"));
}

#[test]
fn synthesized_methods_filter_by_origin() {
    let mut synthesized =
        MethodData::new("foo", Type::Void).with_param(ParamData::new("a", Type::int()));
    synthesized.origin = Origin::Synthesized;
    synthesized.body = Some(Stmt::Call(ForwardCall {
        receiver: Receiver::This,
        method: "foo".into(),
        type_args: Vec::new(),
        args: vec![Expr::name("a"), Expr::literal(Literal::Int(2))],
    }));

    let class = ClassData::new("Foo")
        .with_method(MethodData::new("foo", Type::Void))
        .with_method(synthesized);

    let arities: Vec<_> = class.synthesized_methods().map(|m| m.params.len()).collect();
    assert_eq!(arities, vec![1]);
}

#[test]
fn forwarding_body_round_trips_through_json() {
    let stmt = Stmt::Return(ForwardCall {
        receiver: Receiver::Type("Foo".into()),
        method: "foo".into(),
        type_args: vec![Type::named("T")],
        args: vec![Expr::empty_wrapper(&Type::generic(
            "Optional",
            vec![Type::named("String")],
        ))],
    });
    let json = serde_json::to_string(&stmt).unwrap();
    let back: Stmt = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stmt);
    assert!(back.is_return());
    assert_eq!(
        back.call().args[0],
        Expr::EmptyWrapper {
            wrapper: Type::named("Optional")
        }
    );
}
