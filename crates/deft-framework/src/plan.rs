use deft_hir::body::{ForwardCall, Stmt};
use deft_hir::framework::{Annotation, MethodData, Modifiers, Origin, ParamData, TypeParam};
use deft_types::{Span, Type};
use serde::Serialize;

/// A synthesized overload: a signature derived from an annotated method plus
/// the single forwarding statement that routes it back to that method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverloadPlan {
    pub name: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub return_type: Type,
    pub params: Vec<ParamData>,
    pub throws: Vec<Type>,
    pub body: Stmt,
    /// Where the triggering declaration lives; hosts place the overload near it.
    pub anchor: Option<Span>,
}

impl OverloadPlan {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn call(&self) -> &ForwardCall {
        self.body.call()
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Lower into a member declaration tagged as synthesized.
    pub fn into_method(self) -> MethodData {
        MethodData {
            name: self.name,
            modifiers: self.modifiers,
            annotations: self.annotations,
            type_params: self.type_params,
            return_type: self.return_type,
            params: self.params,
            throws: self.throws,
            body: Some(self.body),
            origin: Origin::Synthesized,
            span: self.anchor,
        }
    }
}
