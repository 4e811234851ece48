use deft_config::SynthesisConfig;
use deft_framework::{
    synthesize_unit, AnnotationEvent, AnnotationHandler, HandlerRegistry, HostAst, Injection,
    MemoryHost, OverloadPlan, SynthesisContext, SynthesisError,
};
use deft_hir::body::{ForwardCall, Receiver, Stmt};
use deft_hir::framework::{Annotation, ClassData, MethodData, Modifiers, Origin, ParamData};
use deft_types::{DeclRef, Span, Type};
use pretty_assertions::assert_eq;

/// Emits a zero-argument overload for every annotated method it sees.
struct FakeHandler {
    marker: &'static str,
    fail_on: Option<&'static str>,
}

impl AnnotationHandler for FakeHandler {
    fn id(&self) -> &str {
        "fake"
    }

    fn claims(&self, _ctx: &SynthesisContext<'_>, annotation: &Annotation) -> bool {
        annotation.matches(self.marker)
    }

    fn handle(
        &self,
        host: &dyn HostAst,
        _ctx: &SynthesisContext<'_>,
        event: &AnnotationEvent<'_>,
    ) -> Result<Vec<Injection>, SynthesisError> {
        let method = match event.target {
            DeclRef::Method(method) => method,
            DeclRef::Param(param) => host.enclosing_method(param),
            other => {
                return Err(SynthesisError::Placement {
                    annotation: event.annotation.name.clone(),
                    target: other.kind_name().to_string(),
                    allowed: "methods and method parameters",
                })
            }
        };
        let data = host.method(method);
        if Some(data.name.as_str()) == self.fail_on {
            return Err(SynthesisError::NoOptionalParameters {
                method: data.name.clone(),
            });
        }

        let plan = OverloadPlan {
            name: data.name.clone(),
            modifiers: Modifiers::new(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            return_type: Type::Void,
            params: Vec::new(),
            throws: Vec::new(),
            body: Stmt::Call(ForwardCall {
                receiver: Receiver::This,
                method: data.name.clone(),
                type_args: Vec::new(),
                args: Vec::new(),
            }),
            anchor: data.span,
        };
        Ok(vec![Injection {
            class: host.enclosing_class(method),
            plan,
        }])
    }
}

fn registry(fail_on: Option<&'static str>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register(Box::new(FakeHandler {
        marker: "test.Gen",
        fail_on,
    }));
    registry
}

fn annotated_method(name: &str) -> MethodData {
    let mut method = MethodData::new(name, Type::Void)
        .with_param(ParamData::new("a", Type::int()).annotated(Annotation::new("@Gen")));
    method.span = Some(Span::new(10, 20));
    method
}

#[test]
fn injects_one_plan_per_claimed_annotation() {
    let mut host = MemoryHost::new();
    let a = host.add_class(
        ClassData::new("A")
            .with_method(annotated_method("foo"))
            .with_method(MethodData::new("plain", Type::Void)),
    );
    let b = host.add_class(ClassData::new("B").with_method(annotated_method("bar")));

    let config = SynthesisConfig::default();
    let report = synthesize_unit(&mut host, &registry(None), &SynthesisContext::new(&config))
        .expect("synthesis succeeds");

    assert_eq!(report.events, 2);
    assert_eq!(report.handled, 2);
    assert_eq!(report.injected, 2);
    assert_eq!(report.injected_per_class.get("A"), Some(&1));
    assert_eq!(report.injected_per_class.get("B"), Some(&1));

    let injected = host.synthesized_methods(a);
    assert_eq!(injected.len(), 1);
    assert_eq!(injected[0].name, "foo");
    assert_eq!(injected[0].origin, Origin::Synthesized);
    assert_eq!(injected[0].span, Some(Span::new(10, 20)));
    assert_eq!(host.synthesized_methods(b).len(), 1);
}

#[test]
fn unclaimed_annotations_are_counted_but_ignored() {
    let mut host = MemoryHost::new();
    host.add_class(
        ClassData::new("A").with_method(
            MethodData::new("foo", Type::Void).annotated(Annotation::new("Deprecated")),
        ),
    );

    let config = SynthesisConfig::default();
    let report = synthesize_unit(&mut host, &registry(None), &SynthesisContext::new(&config))
        .expect("synthesis succeeds");

    assert_eq!(report.events, 1);
    assert_eq!(report.handled, 0);
    assert_eq!(report.injected, 0);
}

#[test]
fn second_pass_does_not_reprocess_synthesized_members() {
    let mut host = MemoryHost::new();
    let a = host.add_class(ClassData::new("A").with_method(annotated_method("foo")));
    let config = SynthesisConfig::default();
    let ctx = SynthesisContext::new(&config);

    synthesize_unit(&mut host, &registry(None), &ctx).expect("first pass");
    // Copy the marker onto the synthesized member; it must still be skipped.
    let mut unit = host.into_unit();
    unit.classes[0].methods[1]
        .annotations
        .push(Annotation::new("test.Gen"));
    let mut host = MemoryHost::from_unit(unit);

    let report = synthesize_unit(&mut host, &registry(None), &ctx).expect("second pass");
    assert_eq!(report.events, 1);
    assert_eq!(report.injected, 0);
    assert_eq!(report.already_present, 1);
    assert_eq!(host.synthesized_methods(a).len(), 1);
    assert_eq!(host.class(a).methods.len(), 2);
}

#[test]
fn two_plans_for_the_same_overload_are_rejected() {
    let mut host = MemoryHost::new();
    let method = annotated_method("foo")
        .with_param(ParamData::new("b", Type::int()).annotated(Annotation::new("test.Gen")));
    let a = host.add_class(ClassData::new("A").with_method(method));

    let config = SynthesisConfig::default();
    let err = synthesize_unit(&mut host, &registry(None), &SynthesisContext::new(&config))
        .expect_err("second `foo()` clashes with the first");

    assert_eq!(
        err.source,
        SynthesisError::DuplicateOverload {
            class: "A".into(),
            signature: "foo()".into(),
        }
    );
    assert_eq!(err.to_diagnostic().code, "DEFT_DUPLICATE_OVERLOAD");
    assert!(host.synthesized_methods(a).is_empty());
}

#[test]
fn plan_clashing_with_a_user_method_is_rejected() {
    let mut host = MemoryHost::new();
    host.add_class(
        ClassData::new("A")
            .with_method(annotated_method("foo"))
            .with_method(MethodData::new("foo", Type::Void)),
    );

    let config = SynthesisConfig::default();
    let err = synthesize_unit(&mut host, &registry(None), &SynthesisContext::new(&config))
        .expect_err("`foo()` is already declared");

    assert_eq!(err.source.code(), "DEFT_DUPLICATE_OVERLOAD");
    assert_eq!(
        err.source.to_string(),
        "overload `foo()` would be declared twice in `A`"
    );
}

#[test]
fn failure_aborts_the_whole_unit() {
    let mut host = MemoryHost::new();
    let a = host.add_class(
        ClassData::new("A")
            .with_method(annotated_method("ok"))
            .with_method(annotated_method("broken")),
    );
    let before = host.unit().clone();

    let config = SynthesisConfig::default();
    let err = synthesize_unit(
        &mut host,
        &registry(Some("broken")),
        &SynthesisContext::new(&config),
    )
    .expect_err("handler failure surfaces");

    assert_eq!(err.handler, "fake");
    assert_eq!(err.annotation, "Gen");
    assert_eq!(err.source.code(), "DEFT_NO_OPTIONAL_PARAMETERS");
    assert!(matches!(err.target, DeclRef::Param(_)));
    assert_eq!(err.to_diagnostic().code, "DEFT_NO_OPTIONAL_PARAMETERS");
    assert!(host.synthesized_methods(a).is_empty());
    assert_eq!(host.unit(), &before);
}

#[test]
fn class_level_marker_reports_placement() {
    let mut host = MemoryHost::new();
    let mut class = ClassData::new("A");
    class.annotations.push(Annotation::new("test.Gen"));
    class.span = Some(Span::new(0, 5));
    host.add_class(class);

    let config = SynthesisConfig::default();
    let err = synthesize_unit(&mut host, &registry(None), &SynthesisContext::new(&config))
        .expect_err("placement error");

    assert_eq!(err.span, Some(Span::new(0, 5)));
    assert_eq!(err.to_string(), "`fake` rejected @test.Gen on a type");
}
