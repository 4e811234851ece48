//! Default-parameter overload synthesis.
//!
//! Java has no default arguments, so a method like
//!
//! ```java
//! void foo(int a, @Def("99") int b, @Def Optional<String> c)
//! ```
//!
//! is given extra overloads that fill in the missing arguments and forward to
//! the original. Parameter markers pick one of two strategies:
//!
//! * **split-pair** (`@Def`): `foo(a)` plus `foo(a, Map<String, Object> paramsMap)`,
//!   where the map can override individual defaults by parameter name;
//! * **arity pyramid** (`@Opt`): `foo(a)`, `foo(a, b)`, ... one per exposed
//!   optional parameter.
//!
//! An `@Opt` marker placed on the method itself strips every wrapper-typed
//! parameter (`Optional<T>`) and passes `Optional.empty()` in its place.
//!
//! A declaration carries at most one marker, and the optional parameters of a
//! method all use the same family.

use deft_config::SynthesisConfig;
use deft_framework::{
    AnnotationEvent, AnnotationHandler, HandlerRegistry, HostAst, Injection, SynthesisContext,
    SynthesisError,
};
use deft_hir::framework::Annotation;
use deft_types::{DeclRef, MethodId, ParamId};

const PARAMS_ONLY: &str = "method parameters";
const METHODS_AND_PARAMS: &str = "methods and method parameters";

pub mod classify;
mod forward;
pub mod pyramid;
pub mod resolve;
pub mod signature;
pub mod split_pair;
pub mod strip;

pub use signature::{DefaultSpec, MethodSignature, ParameterSpec, ReturnKind, TypeCategory};

/// How a parameter-level marker turns optional parameters into overloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStrategy {
    SplitPair,
    Pyramid,
}

impl ParameterStrategy {
    /// The strategy bound to `marker`, if it is a configured marker at all.
    pub fn for_marker(config: &SynthesisConfig, marker: &Annotation) -> Option<Self> {
        if marker.matches_any(&config.split_pair_markers) {
            Some(ParameterStrategy::SplitPair)
        } else if marker.matches_any(&config.pyramid_markers) {
            Some(ParameterStrategy::Pyramid)
        } else {
            None
        }
    }

    fn markers(self, config: &SynthesisConfig) -> &[String] {
        match self {
            ParameterStrategy::SplitPair => &config.split_pair_markers,
            ParameterStrategy::Pyramid => &config.pyramid_markers,
        }
    }

    /// Where markers of this family may be placed.
    fn allowed_on(self) -> &'static str {
        match self {
            ParameterStrategy::SplitPair => PARAMS_ONLY,
            ParameterStrategy::Pyramid => METHODS_AND_PARAMS,
        }
    }
}

/// Configured markers on `decl`, in source order.
fn markers_on<'h>(
    host: &'h dyn HostAst,
    config: &SynthesisConfig,
    decl: DeclRef,
) -> Vec<&'h Annotation> {
    host.annotations(decl)
        .iter()
        .filter(|a| ParameterStrategy::for_marker(config, a).is_some())
        .collect()
}

fn single_marker(
    host: &dyn HostAst,
    config: &SynthesisConfig,
    decl: DeclRef,
    target: impl FnOnce() -> String,
) -> Result<(), SynthesisError> {
    if let [first, second, ..] = markers_on(host, config, decl).as_slice() {
        return Err(SynthesisError::ConflictingMarkers {
            first: first.name.clone(),
            second: second.name.clone(),
            target: target(),
        });
    }
    Ok(())
}

/// Handles every configured default marker.
#[derive(Debug, Default)]
pub struct DefaultsHandler;

impl DefaultsHandler {
    pub const ID: &'static str = "deft.defaults";

    pub fn new() -> Self {
        Self
    }

    fn handle_method(
        &self,
        host: &dyn HostAst,
        config: &SynthesisConfig,
        method: MethodId,
    ) -> Result<Vec<Injection>, SynthesisError> {
        single_marker(host, config, DeclRef::Method(method), || {
            format!("method `{}`", host.method(method).name)
        })?;

        let all_markers: Vec<&str> = config.all_markers().collect();
        let no_markers: &[&str] = &[];
        let sig = MethodSignature::from_host(
            host,
            method,
            no_markers,
            &all_markers,
            &config.wrapper_types,
        );
        let plan = strip::strip_wrappers(&sig)?;
        Ok(vec![Injection {
            class: sig.class,
            plan,
        }])
    }

    fn handle_param(
        &self,
        host: &dyn HostAst,
        config: &SynthesisConfig,
        param: ParamId,
        marker: &Annotation,
        strategy: ParameterStrategy,
    ) -> Result<Vec<Injection>, SynthesisError> {
        let method = host.enclosing_method(param);
        let method_name = &host.method(method).name;
        single_marker(host, config, DeclRef::Param(param), || {
            format!("parameter `{}` of `{method_name}`", host.param(param).name)
        })?;
        for other in host.params_of(method) {
            if let Some(foreign) = markers_on(host, config, DeclRef::Param(other))
                .into_iter()
                .find(|m| ParameterStrategy::for_marker(config, m) != Some(strategy))
            {
                return Err(SynthesisError::ConflictingMarkers {
                    first: marker.name.clone(),
                    second: foreign.name.clone(),
                    target: format!("the parameters of `{method_name}`"),
                });
            }
        }

        let all_markers: Vec<&str> = config.all_markers().collect();
        let sig = MethodSignature::from_host(
            host,
            method,
            strategy.markers(config),
            &all_markers,
            &config.wrapper_types,
        );

        if !classify::is_trigger(&sig, param.ordinal()) {
            tracing::trace!(
                method = %sig.name,
                param = param.ordinal(),
                "overloads already generated from an earlier parameter"
            );
            return Ok(Vec::new());
        }

        let classified = classify::classify(&sig)?;
        let plans = match strategy {
            ParameterStrategy::SplitPair => {
                split_pair::split_pair(&sig, &classified, config.char_literal)?
            }
            ParameterStrategy::Pyramid => pyramid::pyramid(&sig, &classified)?,
        };
        Ok(plans
            .into_iter()
            .map(|plan| Injection {
                class: sig.class,
                plan,
            })
            .collect())
    }
}

impl AnnotationHandler for DefaultsHandler {
    fn id(&self) -> &str {
        Self::ID
    }

    fn claims(&self, ctx: &SynthesisContext<'_>, annotation: &Annotation) -> bool {
        ParameterStrategy::for_marker(ctx.config, annotation).is_some()
    }

    fn handle(
        &self,
        host: &dyn HostAst,
        ctx: &SynthesisContext<'_>,
        event: &AnnotationEvent<'_>,
    ) -> Result<Vec<Injection>, SynthesisError> {
        let Some(strategy) = ParameterStrategy::for_marker(ctx.config, event.annotation) else {
            return Ok(Vec::new());
        };
        match (event.target, strategy) {
            (DeclRef::Method(method), ParameterStrategy::Pyramid) => {
                self.handle_method(host, ctx.config, method)
            }
            (DeclRef::Param(param), _) => {
                self.handle_param(host, ctx.config, param, event.annotation, strategy)
            }
            (target, _) => Err(SynthesisError::Placement {
                annotation: event.annotation.name.clone(),
                target: format!("a {}", target.kind_name()),
                allowed: strategy.allowed_on(),
            }),
        }
    }
}

/// A registry with the defaults handler installed.
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register(Box::new(DefaultsHandler::new()));
    registry
}
