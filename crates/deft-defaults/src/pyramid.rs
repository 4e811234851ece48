use deft_config::CharLiteralStyle;
use deft_framework::{OverloadPlan, SynthesisError};
use deft_hir::framework::ParamData;

use crate::classify::Classified;
use crate::forward::{overload, pass_through};
use crate::resolve::resolve_default;
use crate::signature::{MethodSignature, TypeCategory};

/// One overload per number of exposed optional parameters, from none up to all
/// but the last.
pub fn pyramid(
    sig: &MethodSignature,
    classified: &Classified<'_>,
) -> Result<Vec<OverloadPlan>, SynthesisError> {
    if let Some((param, _)) = classified
        .optional
        .iter()
        .find(|(p, _)| p.category == TypeCategory::Char)
    {
        return Err(SynthesisError::UnsupportedType {
            method: sig.name.clone(),
            param: param.name.clone(),
            ty: param.ty.to_string(),
            context: " by the arity-pyramid strategy",
        });
    }

    // Chars are rejected above, so the literal style never matters here.
    let defaults = classified
        .optional
        .iter()
        .map(|(param, default)| resolve_default(&sig.name, param, default, CharLiteralStyle::Char))
        .collect::<Result<Vec<_>, _>>()?;

    let plans = (0..classified.optional.len())
        .map(|exposed| {
            let retained = classified
                .required
                .iter()
                .copied()
                .chain(classified.optional[..exposed].iter().map(|(p, _)| *p));

            let params: Vec<ParamData> = retained.clone().map(|p| p.to_param()).collect();
            let mut args = pass_through(retained);
            args.extend(defaults[exposed..].iter().cloned());
            overload(sig, params, args)
        })
        .collect();
    Ok(plans)
}
