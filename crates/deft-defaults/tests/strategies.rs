use deft_config::{CharLiteralStyle, SynthesisConfig};
use deft_defaults::{registry, DefaultsHandler};
use deft_framework::{
    synthesize_unit, AnnotationEvent, AnnotationHandler, HostAst, MemoryHost, SynthesisContext,
    SynthesisError,
};
use deft_hir::body::{Expr, Literal, Receiver, Stmt};
use deft_hir::framework::{Annotation, ClassData, MethodData, ParamData};
use deft_types::{ClassId, DeclRef, MethodId, Type};
use pretty_assertions::assert_eq;

fn ty(text: &str) -> Type {
    Type::parse(text).expect("valid type")
}

fn plain(name: &str, ty_text: &str) -> ParamData {
    ParamData::new(name, ty(ty_text))
}

fn def(name: &str, ty_text: &str, default: Option<&str>) -> ParamData {
    let mut marker = Annotation::new("lombok.Def");
    if let Some(default) = default {
        marker = marker.with_arg("value", default);
    }
    plain(name, ty_text).annotated(marker)
}

fn opt(name: &str, ty_text: &str, default: Option<&str>) -> ParamData {
    let mut marker = Annotation::new("Opt");
    if let Some(default) = default {
        marker = marker.with_arg("def", default);
    }
    plain(name, ty_text).annotated(marker)
}

fn host_with(method: MethodData) -> (MemoryHost, ClassId, MethodId) {
    let mut host = MemoryHost::new();
    let class = host.add_class(ClassData::new("Foo").with_method(method));
    let method = host.find_method(class, "foo").expect("method exists");
    (host, class, method)
}

fn foo(params: Vec<ParamData>) -> MethodData {
    params
        .into_iter()
        .fold(MethodData::new("foo", Type::Void), MethodData::with_param)
}

fn synthesize(host: &mut MemoryHost, config: &SynthesisConfig) -> Result<(), SynthesisError> {
    synthesize_unit(host, &registry(), &SynthesisContext::new(config))
        .map(|_| ())
        .map_err(|err| err.source)
}

fn plans_for(host: &MemoryHost, class: ClassId) -> Vec<&MethodData> {
    host.synthesized_methods(class)
}

fn args(method: &MethodData) -> &[Expr] {
    &method.body.as_ref().expect("synthesized body").call().args
}

fn names(method: &MethodData) -> Vec<&str> {
    method.params.iter().map(|p| p.name.as_str()).collect()
}

fn int(value: i32) -> Expr {
    Expr::literal(Literal::Int(value))
}

fn string(value: &str) -> Expr {
    Expr::literal(Literal::String(value.to_string()))
}

fn empty_optional() -> Expr {
    Expr::empty_wrapper(&Type::named("Optional"))
}

fn abcd_method() -> MethodData {
    foo(vec![
        plain("a", "int"),
        def("b", "int", Some("99")),
        def("c", "String", Some("default")),
        def("d", "Optional<String>", None),
    ])
}

#[test]
fn split_pair_generates_exactly_two_overloads() {
    let (mut host, class, _) = host_with(abcd_method());
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let plans = plans_for(&host, class);
    assert_eq!(plans.len(), 2);
    // Trailing-defaults overload drops all three optional parameters.
    assert_eq!(plans[0].params.len(), 4 - 3);
    assert_eq!(names(plans[1]), ["a", "paramsMap"]);
}

#[test]
fn trailing_defaults_overload_forwards_resolved_literals() {
    let (mut host, class, _) = host_with(abcd_method());
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let trailing = plans_for(&host, class)[0];
    assert_eq!(names(trailing), ["a"]);
    assert_eq!(
        args(trailing),
        [Expr::name("a"), int(99), string("default"), empty_optional()]
    );
}

#[test]
fn carrier_overload_consults_the_map_for_every_optional_parameter() {
    let (mut host, class, _) = host_with(abcd_method());
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let carrier = plans_for(&host, class)[1];
    let map = &carrier.params[1];
    assert_eq!(map.ty.to_string(), "java.util.Map<String, Object>");
    assert!(map.modifiers.contains(deft_hir::framework::Modifier::Final));

    let lookup = |key: &str, ty_text: &str, default: Expr| Expr::CarrierLookup {
        carrier: "paramsMap".into(),
        key: key.into(),
        ty: ty(ty_text),
        default: Box::new(default),
    };
    assert_eq!(
        args(carrier),
        [
            Expr::name("a"),
            lookup("b", "int", int(99)),
            lookup("c", "String", string("default")),
            lookup("d", "Optional<String>", empty_optional()),
        ]
    );
}

#[test]
fn later_optional_parameters_do_not_retrigger() {
    let config = SynthesisConfig::default();
    let ctx = SynthesisContext::new(&config);
    let (host, _, method) = host_with(abcd_method());
    let handler = DefaultsHandler::new();

    let marker = Annotation::new("lombok.Def");
    let mut produced = Vec::new();
    for param in host.params_of(method) {
        let event = AnnotationEvent {
            target: DeclRef::Param(param),
            annotation: &marker,
        };
        produced.push(handler.handle(&host, &ctx, &event).unwrap().len());
    }
    // `a` is not optional, `b` triggers, `c` and `d` are no-ops.
    assert_eq!(produced, [0, 2, 0, 0]);
}

#[test]
fn required_after_optional_is_an_ordering_error() {
    let (mut host, class, _) = host_with(foo(vec![
        plain("a", "int"),
        def("b", "int", Some("1")),
        plain("c", "int"),
    ]));
    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::InvalidOrdering {
            method: "foo".into(),
            param: "c".into(),
        }
    );
    assert!(plans_for(&host, class).is_empty());
}

#[test]
fn pyramid_with_two_optional_parameters_adds_arity_one_and_two() {
    let (mut host, class, _) = host_with(foo(vec![
        plain("a", "int"),
        opt("b", "long", Some("5")),
        opt("c", "Optional<String>", None),
    ]));
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let plans = plans_for(&host, class);
    let arities: Vec<usize> = plans.iter().map(|m| m.params.len()).collect();
    assert_eq!(arities, [1, 2]);

    assert_eq!(
        args(plans[0]),
        [
            Expr::name("a"),
            Expr::literal(Literal::Long(5)),
            empty_optional()
        ]
    );
    assert_eq!(names(plans[1]), ["a", "b"]);
    assert_eq!(
        args(plans[1]),
        [Expr::name("a"), Expr::name("b"), empty_optional()]
    );
    // The exposed parameter no longer carries its marker.
    assert!(plans[1].params[1].annotations.is_empty());
}

#[test]
fn pyramid_rejects_char_defaults() {
    let (mut host, _, _) = host_with(foo(vec![opt("c", "char", Some("x"))]));
    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(err.code(), "DEFT_UNSUPPORTED_TYPE");
    assert!(err.to_string().ends_with("by the arity-pyramid strategy"), "{err}");
}

#[test]
fn stripping_removes_every_wrapper_parameter() {
    let method = foo(vec![
        plain("x", "int"),
        plain("y", "Optional<String>"),
        plain("z", "java.util.Optional<Integer>"),
    ])
    .annotated(Annotation::new("Opt"));
    let (mut host, class, _) = host_with(method);
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let plans = plans_for(&host, class);
    assert_eq!(plans.len(), 1);
    assert_eq!(names(plans[0]), ["x"]);
    assert_eq!(
        args(plans[0]),
        [
            Expr::name("x"),
            empty_optional(),
            Expr::empty_wrapper(&Type::named("java.util.Optional")),
        ]
    );
    // The marker is not copied onto the overload.
    assert!(plans[0].annotations.is_empty());
}

#[test]
fn stripping_without_wrappers_fails() {
    let method = foo(vec![plain("x", "int")]).annotated(Annotation::new("Opt"));
    let (mut host, class, _) = host_with(method);
    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::NoOptionalParameters {
            method: "foo".into()
        }
    );
    assert!(plans_for(&host, class).is_empty());
}

#[test]
fn char_defaults_resolve_escapes_and_plain_characters() {
    let (mut host, class, _) = host_with(foo(vec![
        def("tab", "char", Some("\\t")),
        def("letter", "char", Some("c")),
    ]));
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();
    assert_eq!(
        args(plans_for(&host, class)[0]),
        [
            Expr::literal(Literal::Char('\t')),
            Expr::literal(Literal::Char('c')),
        ]
    );

    let config = SynthesisConfig {
        char_literal: CharLiteralStyle::IntCast,
        ..SynthesisConfig::default()
    };
    let (mut host, class, _) = host_with(foo(vec![def("tab", "char", Some("\\t"))]));
    synthesize(&mut host, &config).unwrap();
    assert_eq!(
        args(plans_for(&host, class)[0]),
        [Expr::cast(Type::char(), int(9))]
    );
}

#[test]
fn missing_default_for_non_wrapper_fails() {
    let (mut host, _, _) = host_with(foo(vec![def("b", "int", None)]));
    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::MissingDefault {
            method: "foo".into(),
            param: "b".into(),
        }
    );
}

#[test]
fn static_methods_forward_through_the_enclosing_type() {
    use deft_hir::framework::{Modifier, Modifiers, TypeParam};

    let mut method = MethodData::new("foo", ty("T"))
        .with_modifiers(
            Modifiers::new()
                .with(Modifier::Public)
                .with(Modifier::Static),
        )
        .with_param(plain("t", "T"))
        .with_param(def("n", "int", Some("3")))
        .annotated(Annotation::new("Deprecated"));
    method.type_params.push(TypeParam::new("T"));
    method.throws.push(ty("java.io.IOException"));

    let (mut host, class, _) = host_with(method);
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let trailing = OverloadPlanView::from(plans_for(&host, class)[0]);
    assert_eq!(trailing.modifiers, "public static");
    assert_eq!(trailing.annotations, ["Deprecated"]);
    assert_eq!(trailing.throws, ["java.io.IOException"]);

    let body = plans_for(&host, class)[0].body.as_ref().unwrap();
    assert!(body.is_return());
    assert_eq!(body.call().receiver, Receiver::Type("Foo".into()));
    assert_eq!(body.call().type_args, [ty("T")]);
}

#[test]
fn instance_void_methods_forward_as_statements() {
    let (mut host, class, _) = host_with(foo(vec![def("b", "boolean", Some("TRUE"))]));
    synthesize(&mut host, &SynthesisConfig::default()).unwrap();

    let body = plans_for(&host, class)[0].body.clone().unwrap();
    match body {
        Stmt::Call(call) => {
            assert_eq!(call.receiver, Receiver::This);
            assert_eq!(call.args, [Expr::literal(Literal::Boolean(true))]);
        }
        Stmt::Return(_) => panic!("void method must not return"),
    }
}

#[test]
fn markers_on_types_are_placement_errors() {
    let mut host = MemoryHost::new();
    let mut class = ClassData::new("Foo");
    class.annotations.push(Annotation::new("Def"));
    host.add_class(class);

    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(err.code(), "DEFT_PLACEMENT");
    assert!(err.to_string().contains("not on a type"), "{err}");
}

#[test]
fn split_pair_marker_on_a_method_is_a_placement_error() {
    let method = foo(vec![plain("x", "int"), plain("y", "Optional<String>")])
        .annotated(Annotation::new("Def"));
    let (mut host, class, _) = host_with(method);

    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::Placement {
            annotation: "Def".into(),
            target: "a method".into(),
            allowed: "method parameters",
        }
    );
    assert!(plans_for(&host, class).is_empty());
}

#[test]
fn method_with_two_markers_is_rejected() {
    let method = foo(vec![plain("x", "int"), plain("y", "Optional<String>")])
        .annotated(Annotation::new("Opt"))
        .annotated(Annotation::new("Def"));
    let (mut host, class, _) = host_with(method);

    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::ConflictingMarkers {
            first: "Opt".into(),
            second: "Def".into(),
            target: "method `foo`".into(),
        }
    );
    assert!(plans_for(&host, class).is_empty());
}

#[test]
fn parameter_with_markers_from_both_families_is_rejected() {
    let y = plain("y", "int")
        .annotated(Annotation::new("Def").with_arg("value", "1"))
        .annotated(Annotation::new("Opt").with_arg("def", "2"));
    let (mut host, class, _) = host_with(foo(vec![y]));

    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(err.code(), "DEFT_CONFLICTING_MARKERS");
    assert_eq!(
        err.to_string(),
        "@Def and @Opt both mark parameter `y` of `foo`; use a single default marker"
    );
    assert!(plans_for(&host, class).is_empty());
}

#[test]
fn parameters_mixing_marker_families_are_rejected() {
    let (mut host, class, _) = host_with(foo(vec![
        def("a", "int", Some("1")),
        opt("b", "int", Some("2")),
    ]));

    let err = synthesize(&mut host, &SynthesisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        SynthesisError::ConflictingMarkers {
            first: "lombok.Def".into(),
            second: "Opt".into(),
            target: "the parameters of `foo`".into(),
        }
    );
    assert!(plans_for(&host, class).is_empty());
}

#[test]
fn resynthesis_does_not_duplicate_overloads() {
    let (mut host, class, _) = host_with(abcd_method());
    let config = SynthesisConfig::default();
    let ctx = SynthesisContext::new(&config);
    synthesize_unit(&mut host, &registry(), &ctx).unwrap();
    let after_first = host.unit().clone();

    // The original is visited again, but both of its overloads already exist.
    let report = synthesize_unit(&mut host, &registry(), &ctx).unwrap();
    assert_eq!(report.injected, 0);
    assert_eq!(report.already_present, 2);
    assert_eq!(plans_for(&host, class).len(), 2);
    assert_eq!(host.unit(), &after_first);
}

/// Flattened view of the copied declaration parts.
struct OverloadPlanView {
    modifiers: String,
    annotations: Vec<String>,
    throws: Vec<String>,
}

impl From<&MethodData> for OverloadPlanView {
    fn from(method: &MethodData) -> Self {
        Self {
            modifiers: method.modifiers.to_string(),
            annotations: method.annotations.iter().map(|a| a.name.clone()).collect(),
            throws: method.throws.iter().map(ToString::to_string).collect(),
        }
    }
}
