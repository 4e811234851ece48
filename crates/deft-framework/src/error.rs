use deft_types::{Diagnostic, Span};
use thiserror::Error;

/// Why synthesis of one annotated declaration was refused.
///
/// Every variant is an authoring mistake in the annotated source; synthesis is
/// deterministic so nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("`@{annotation}` is only valid on {allowed}, not on {target}")]
    Placement {
        annotation: String,
        target: String,
        allowed: &'static str,
    },

    #[error("@{first} and @{second} both mark {target}; use a single default marker")]
    ConflictingMarkers {
        first: String,
        second: String,
        target: String,
    },

    #[error("overload `{signature}` would be declared twice in `{class}`")]
    DuplicateOverload { class: String, signature: String },

    #[error(
        "required parameter `{param}` of `{method}` follows an optional parameter; \
         optional parameters must come last"
    )]
    InvalidOrdering { method: String, param: String },

    #[error("optional parameter `{param}` of `{method}` needs a default value")]
    MissingDefault { method: String, param: String },

    #[error("default values for `{ty}` parameter `{param}` of `{method}` are not supported{context}")]
    UnsupportedType {
        method: String,
        param: String,
        ty: String,
        /// Extra qualifier, e.g. " by the arity-pyramid strategy".
        context: &'static str,
    },

    #[error("`{method}` is marked for wrapper stripping but has no wrapper-typed parameters")]
    NoOptionalParameters { method: String },

    #[error("default `{text}` for parameter `{param}` of `{method}` is not a valid {expected} literal")]
    LiteralParse {
        method: String,
        param: String,
        text: String,
        expected: &'static str,
    },
}

impl SynthesisError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            SynthesisError::Placement { .. } => "DEFT_PLACEMENT",
            SynthesisError::ConflictingMarkers { .. } => "DEFT_CONFLICTING_MARKERS",
            SynthesisError::DuplicateOverload { .. } => "DEFT_DUPLICATE_OVERLOAD",
            SynthesisError::InvalidOrdering { .. } => "DEFT_INVALID_ORDERING",
            SynthesisError::MissingDefault { .. } => "DEFT_MISSING_DEFAULT",
            SynthesisError::UnsupportedType { .. } => "DEFT_UNSUPPORTED_TYPE",
            SynthesisError::NoOptionalParameters { .. } => "DEFT_NO_OPTIONAL_PARAMETERS",
            SynthesisError::LiteralParse { .. } => "DEFT_LITERAL_PARSE",
        }
    }

    pub fn to_diagnostic(&self, span: Option<Span>) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string(), span)
    }
}
