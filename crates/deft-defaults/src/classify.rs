use deft_framework::SynthesisError;

use crate::signature::{DefaultSpec, MethodSignature, ParameterSpec};

/// A signature split into its required prefix and optional suffix, both in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified<'s> {
    pub required: Vec<&'s ParameterSpec>,
    pub optional: Vec<(&'s ParameterSpec, &'s DefaultSpec)>,
}

impl Classified<'_> {
    pub fn arity(&self) -> usize {
        self.required.len() + self.optional.len()
    }
}

/// Fails if any required parameter appears after an optional one.
pub fn check_ordering(sig: &MethodSignature) -> Result<(), SynthesisError> {
    let mut seen_optional = false;
    for param in &sig.params {
        if param.is_optional() {
            seen_optional = true;
        } else if seen_optional {
            return Err(SynthesisError::InvalidOrdering {
                method: sig.name.clone(),
                param: param.name.clone(),
            });
        }
    }
    Ok(())
}

/// Whether the annotation on parameter `ordinal` is the one that generates the
/// overload family. Every optional parameter of a method raises its own event;
/// only the first one does any work.
pub fn is_trigger(sig: &MethodSignature, ordinal: usize) -> bool {
    sig.first_optional() == Some(ordinal)
}

pub fn classify(sig: &MethodSignature) -> Result<Classified<'_>, SynthesisError> {
    check_ordering(sig)?;

    let mut classified = Classified {
        required: Vec::new(),
        optional: Vec::new(),
    };
    for param in &sig.params {
        match &param.default {
            Some(default) => classified.optional.push((param, default)),
            None => classified.required.push(param),
        }
    }
    Ok(classified)
}

#[cfg(test)]
mod tests {
    use deft_hir::framework::Modifiers;
    use deft_types::{ClassId, Type};

    use super::*;
    use crate::signature::TypeCategory;

    fn param(name: &str, ordinal: usize, default: Option<&str>) -> ParameterSpec {
        ParameterSpec {
            name: name.to_string(),
            ty: Type::int(),
            category: TypeCategory::Int,
            modifiers: Modifiers::new(),
            annotations: Vec::new(),
            ordinal,
            span: None,
            default: default.map(|raw| DefaultSpec {
                raw: Some(raw.to_string()),
            }),
        }
    }

    fn sig(params: Vec<ParameterSpec>) -> MethodSignature {
        MethodSignature {
            name: "foo".to_string(),
            class: ClassId::new(0),
            enclosing_type: "Foo".to_string(),
            is_static: false,
            modifiers: Modifiers::new(),
            annotations: Vec::new(),
            type_params: Vec::new(),
            return_type: Type::Void,
            throws: Vec::new(),
            params,
            anchor: None,
        }
    }

    #[test]
    fn partitions_in_declaration_order() {
        let sig = sig(vec![
            param("a", 0, None),
            param("b", 1, Some("1")),
            param("c", 2, Some("2")),
        ]);
        let classified = classify(&sig).unwrap();
        let required: Vec<_> = classified.required.iter().map(|p| p.name.as_str()).collect();
        let optional: Vec<_> = classified.optional.iter().map(|(p, _)| p.name.as_str()).collect();
        assert_eq!(required, ["a"]);
        assert_eq!(optional, ["b", "c"]);
        assert_eq!(classified.arity(), 3);
    }

    #[test]
    fn required_after_optional_is_rejected() {
        let sig = sig(vec![
            param("a", 0, None),
            param("b", 1, Some("1")),
            param("c", 2, None),
        ]);
        assert_eq!(
            classify(&sig).unwrap_err(),
            SynthesisError::InvalidOrdering {
                method: "foo".into(),
                param: "c".into(),
            }
        );
    }

    #[test]
    fn only_the_first_optional_parameter_triggers() {
        let sig = sig(vec![
            param("a", 0, None),
            param("b", 1, Some("1")),
            param("c", 2, Some("2")),
        ]);
        assert!(!is_trigger(&sig, 0));
        assert!(is_trigger(&sig, 1));
        assert!(!is_trigger(&sig, 2));
    }
}
