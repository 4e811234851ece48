use deft_framework::OverloadPlan;
use deft_hir::body::{Expr, ForwardCall, Receiver, Stmt};
use deft_hir::framework::{Modifier, ParamData};
use deft_types::Type;

use crate::signature::{MethodSignature, ParameterSpec, ReturnKind};

/// Builds an overload of `sig` taking `params` whose body forwards `args` to
/// the original method.
pub(crate) fn overload(sig: &MethodSignature, params: Vec<ParamData>, args: Vec<Expr>) -> OverloadPlan {
    let receiver = if sig.is_static {
        Receiver::Type(sig.enclosing_type.clone())
    } else {
        Receiver::This
    };
    let call = ForwardCall {
        receiver,
        method: sig.name.clone(),
        type_args: sig
            .type_params
            .iter()
            .map(|tp| Type::named(tp.name.clone()))
            .collect(),
        args,
    };
    let body = match sig.return_kind() {
        ReturnKind::Void => Stmt::Call(call),
        ReturnKind::NonVoid => Stmt::Return(call),
    };

    // The overload has a body, so it cannot stay abstract or native.
    let mut modifiers = sig.modifiers.clone();
    modifiers.remove(Modifier::Abstract);
    modifiers.remove(Modifier::Native);

    let plan = OverloadPlan {
        name: sig.name.clone(),
        modifiers,
        annotations: sig.annotations.clone(),
        type_params: sig.type_params.clone(),
        return_type: sig.return_type.clone(),
        params,
        throws: sig.throws.clone(),
        body,
        anchor: sig.anchor,
    };
    tracing::debug!(
        method = %sig.name,
        params = ?plan.param_names(),
        "planned overload"
    );
    plan
}

/// Pass-through arguments for retained parameters.
pub(crate) fn pass_through<'a>(params: impl IntoIterator<Item = &'a ParameterSpec>) -> Vec<Expr> {
    params.into_iter().map(|p| Expr::name(p.name.clone())).collect()
}
