use deft_framework::{OverloadPlan, SynthesisError};
use deft_hir::body::Expr;

use crate::forward::overload;
use crate::signature::{MethodSignature, TypeCategory};

/// A single overload with every wrapper-typed parameter removed and passed as
/// empty. Position does not matter: wrappers may sit anywhere in the list.
pub fn strip_wrappers(sig: &MethodSignature) -> Result<OverloadPlan, SynthesisError> {
    if !sig.has_wrapper_params() {
        return Err(SynthesisError::NoOptionalParameters {
            method: sig.name.clone(),
        });
    }

    let mut params = Vec::new();
    let mut args = Vec::with_capacity(sig.params.len());
    for param in &sig.params {
        match &param.category {
            TypeCategory::Wrapper(ty) => args.push(Expr::empty_wrapper(ty)),
            _ => {
                params.push(param.to_param());
                args.push(Expr::name(param.name.clone()));
            }
        }
    }
    Ok(overload(sig, params, args))
}
