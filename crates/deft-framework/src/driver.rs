use std::collections::{BTreeMap, HashMap, HashSet};

use deft_hir::framework::{Annotation, Origin, ParamData};
use deft_types::{ClassId, DeclRef, Diagnostic, Span, Type};
use serde::Serialize;
use thiserror::Error;

use crate::{
    AnnotationEvent, DeclarationInjector, HandlerRegistry, HostAst, Injection, SynthesisContext,
    SynthesisError,
};

/// What one pass over a compilation unit did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    /// Annotations visited on user-authored declarations.
    pub events: usize,
    /// Annotations at least one handler claimed.
    pub handled: usize,
    pub injected: usize,
    /// Planned overloads skipped because an earlier pass already injected them.
    pub already_present: usize,
    pub injected_per_class: BTreeMap<String, usize>,
}

/// A handler failure. Nothing from the unit was injected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{handler}` rejected @{annotation} on a {}", .target.kind_name())]
pub struct UnitError {
    pub handler: String,
    pub annotation: String,
    pub target: DeclRef,
    pub span: Option<Span>,
    #[source]
    pub source: SynthesisError,
}

impl UnitError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        self.source.to_diagnostic(self.span)
    }
}

/// Run every claiming handler over every annotation in the host, then inject
/// the results.
///
/// Declarations already tagged as synthesized are skipped, and so are plans
/// whose overload an earlier pass already injected. A plan that clashes with a
/// user-authored method or with another plan is an error. Plans are collected
/// before anything is injected; the first failure aborts the whole unit.
pub fn synthesize_unit<H>(
    host: &mut H,
    registry: &HandlerRegistry,
    ctx: &SynthesisContext<'_>,
) -> Result<UnitReport, UnitError>
where
    H: HostAst + DeclarationInjector,
{
    let events = collect_events(&*host);
    let mut report = UnitReport {
        events: events.len(),
        ..UnitReport::default()
    };

    let declared = declared_overloads(&*host);
    let mut planned: HashSet<OverloadKey> = HashSet::new();
    let mut pending: Vec<Injection> = Vec::new();
    for (target, annotation) in &events {
        let handlers = registry.handlers_for(ctx, annotation);
        if handlers.is_empty() {
            continue;
        }
        report.handled += 1;

        for handler in handlers {
            let event = AnnotationEvent {
                target: *target,
                annotation,
            };
            tracing::debug!(
                handler = handler.id(),
                annotation = %annotation.name,
                target = ?target,
                "dispatching annotation"
            );
            let fail = |source: SynthesisError| UnitError {
                handler: handler.id().to_string(),
                annotation: annotation.name.clone(),
                target: *target,
                span: host.span(*target),
                source,
            };
            let injections = handler.handle(&*host, ctx, &event).map_err(&fail)?;

            for injection in injections {
                let plan = &injection.plan;
                let key = OverloadKey::of(injection.class, &plan.name, &plan.params);
                match declared.get(&key) {
                    Some(Origin::Synthesized) => {
                        tracing::debug!(overload = %key, "overload already present");
                        report.already_present += 1;
                        continue;
                    }
                    Some(Origin::Source) => {
                        return Err(fail(key.duplicate(&*host)));
                    }
                    None => {}
                }
                if planned.contains(&key) {
                    return Err(fail(key.duplicate(&*host)));
                }
                planned.insert(key);
                pending.push(injection);
            }
        }
    }

    for Injection { class, plan } in pending {
        let class_name = host.class(class).name.clone();
        tracing::debug!(class = %class_name, method = %plan.name, arity = plan.arity(), "injecting overload");
        host.inject_method(class, plan);
        report.injected += 1;
        *report.injected_per_class.entry(class_name).or_default() += 1;
    }

    tracing::info!(
        events = report.events,
        handled = report.handled,
        injected = report.injected,
        already_present = report.already_present,
        "synthesis finished"
    );
    Ok(report)
}

/// What Java uses to tell overloads of one class apart: the name and the
/// erased parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OverloadKey {
    class: ClassId,
    name: String,
    params: Vec<Type>,
}

impl OverloadKey {
    fn of(class: ClassId, name: &str, params: &[ParamData]) -> Self {
        Self {
            class,
            name: name.to_string(),
            params: params.iter().map(|p| p.ty.erased()).collect(),
        }
    }

    fn duplicate(&self, host: &dyn HostAst) -> SynthesisError {
        SynthesisError::DuplicateOverload {
            class: host.class(self.class).name.clone(),
            signature: self.to_string(),
        }
    }
}

impl std::fmt::Display for OverloadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}

/// Every method already in the host, keyed by overload.
fn declared_overloads(host: &dyn HostAst) -> HashMap<OverloadKey, Origin> {
    let mut declared = HashMap::new();
    for class in host.classes() {
        for method in host.methods_of(class) {
            let data = host.method(method);
            declared.insert(OverloadKey::of(class, &data.name, &data.params), data.origin);
        }
    }
    declared
}

/// Every annotation on user-authored declarations, in declaration order.
fn collect_events(host: &dyn HostAst) -> Vec<(DeclRef, Annotation)> {
    let mut events = Vec::new();
    let mut push = |decl: DeclRef| {
        for annotation in host.annotations(decl) {
            events.push((decl, annotation.clone()));
        }
    };

    for class in host.classes() {
        push(DeclRef::Class(class));
        for field in host.fields_of(class) {
            push(DeclRef::Field(field));
        }
        for method in user_methods(host, class) {
            push(DeclRef::Method(method));
            for param in host.params_of(method) {
                push(DeclRef::Param(param));
            }
        }
    }
    events
}

fn user_methods(host: &dyn HostAst, class: ClassId) -> Vec<deft_types::MethodId> {
    host.methods_of(class)
        .into_iter()
        .filter(|m| !host.method(*m).is_synthesized())
        .collect()
}
