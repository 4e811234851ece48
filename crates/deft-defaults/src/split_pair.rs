use deft_config::CharLiteralStyle;
use deft_framework::{OverloadPlan, SynthesisError};
use deft_hir::body::Expr;
use deft_hir::framework::{Modifier, Modifiers, ParamData};
use deft_types::Type;

use crate::classify::Classified;
use crate::forward::{overload, pass_through};
use crate::resolve::resolve_default;
use crate::signature::MethodSignature;

/// Name of the trailing map parameter of the carrier overload.
pub const CARRIER_NAME: &str = "paramsMap";

/// `java.util.Map<String, Object>`
pub fn carrier_type() -> Type {
    Type::generic(
        "java.util.Map",
        vec![Type::named("String"), Type::named("Object")],
    )
}

fn carrier_param() -> ParamData {
    ParamData {
        modifiers: Modifiers::new().with(Modifier::Final),
        ..ParamData::new(CARRIER_NAME, carrier_type())
    }
}

/// The trailing-defaults overload followed by the carrier-map overload.
pub fn split_pair(
    sig: &MethodSignature,
    classified: &Classified<'_>,
    char_literal: CharLiteralStyle,
) -> Result<Vec<OverloadPlan>, SynthesisError> {
    let defaults = classified
        .optional
        .iter()
        .map(|(param, default)| resolve_default(&sig.name, param, default, char_literal))
        .collect::<Result<Vec<_>, _>>()?;

    let required_params: Vec<ParamData> =
        classified.required.iter().map(|p| p.to_param()).collect();
    let forwarded = pass_through(classified.required.iter().copied());

    let trailing = {
        let mut args = forwarded.clone();
        args.extend(defaults.iter().cloned());
        overload(sig, required_params.clone(), args)
    };

    let carrier = {
        let mut params = required_params;
        params.push(carrier_param());

        let mut args = forwarded;
        for ((param, _), default) in classified.optional.iter().zip(defaults) {
            args.push(Expr::CarrierLookup {
                carrier: CARRIER_NAME.to_string(),
                key: param.name.clone(),
                ty: param.ty.clone(),
                default: Box::new(default),
            });
        }
        overload(sig, params, args)
    };

    Ok(vec![trailing, carrier])
}
