//! Host abstraction and extension points for overload synthesis.
//!
//! Annotation handlers never touch a concrete compiler tree. They read through
//! [`HostAst`], return [`OverloadPlan`]s, and the traversal driver hands the
//! finished plans to a [`DeclarationInjector`]. Swapping javac for ECJ (or for
//! the in-memory [`MemoryHost`]) does not touch any handler.

use deft_config::SynthesisConfig;
use deft_hir::framework::{Annotation, ClassData, FieldData, MethodData, ParamData};
use deft_types::{ClassId, DeclRef, FieldId, MethodId, ParamId, Span};

mod driver;
mod error;
mod memory;
mod plan;

pub use driver::{synthesize_unit, UnitError, UnitReport};
pub use error::SynthesisError;
pub use memory::MemoryHost;
pub use plan::OverloadPlan;

/// Read-only queries over the host's declaration tree.
pub trait HostAst {
    fn classes(&self) -> Vec<ClassId>;
    fn class(&self, class: ClassId) -> &ClassData;
    fn field(&self, field: FieldId) -> &FieldData;
    fn method(&self, method: MethodId) -> &MethodData;
    fn param(&self, param: ParamId) -> &ParamData;

    fn fields_of(&self, class: ClassId) -> Vec<FieldId>;
    fn methods_of(&self, class: ClassId) -> Vec<MethodId>;
    fn params_of(&self, method: MethodId) -> Vec<ParamId>;

    fn enclosing_method(&self, param: ParamId) -> MethodId;
    fn enclosing_class(&self, method: MethodId) -> ClassId;

    fn annotations(&self, decl: DeclRef) -> &[Annotation] {
        match decl {
            DeclRef::Class(class) => &self.class(class).annotations,
            DeclRef::Field(field) => &self.field(field).annotations,
            DeclRef::Method(method) => &self.method(method).annotations,
            DeclRef::Param(param) => &self.param(param).annotations,
        }
    }

    /// Source anchor for a declaration; only used to place synthesized nodes.
    fn span(&self, decl: DeclRef) -> Option<Span> {
        match decl {
            DeclRef::Class(class) => self.class(class).span,
            DeclRef::Field(field) => self.field(field).span,
            DeclRef::Method(method) => self.method(method).span,
            DeclRef::Param(param) => self.param(param).span,
        }
    }
}

/// Accepts finished synthesized declarations.
pub trait DeclarationInjector {
    /// Append `plan` as a member of `class`. The injected member must be tagged
    /// so later traversals do not treat it as user-authored input.
    fn inject_method(&mut self, class: ClassId, plan: OverloadPlan) -> MethodId;
}

/// Request-scoped state handed to every handler invocation.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub config: &'a SynthesisConfig,
}

impl<'a> SynthesisContext<'a> {
    pub fn new(config: &'a SynthesisConfig) -> Self {
        Self { config }
    }
}

/// One annotation found on one declaration during traversal.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationEvent<'a> {
    pub target: DeclRef,
    pub annotation: &'a Annotation,
}

/// A plan together with the type it should be injected into.
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    pub class: ClassId,
    pub plan: OverloadPlan,
}

/// Extension point for annotation handlers.
pub trait AnnotationHandler: Send + Sync {
    fn id(&self) -> &str;

    /// Whether this handler processes `annotation` at all.
    fn claims(&self, ctx: &SynthesisContext<'_>, annotation: &Annotation) -> bool;

    /// Produce the declarations to inject for one annotation event. Returning
    /// an empty list is a no-op, not a failure.
    fn handle(
        &self,
        host: &dyn HostAst,
        ctx: &SynthesisContext<'_>,
        event: &AnnotationEvent<'_>,
    ) -> Result<Vec<Injection>, SynthesisError>;
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn AnnotationHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Box<dyn AnnotationHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn handlers_for(
        &self,
        ctx: &SynthesisContext<'_>,
        annotation: &Annotation,
    ) -> Vec<&dyn AnnotationHandler> {
        self.handlers
            .iter()
            .map(|h| h.as_ref())
            .filter(|h| h.claims(ctx, annotation))
            .collect()
    }
}
