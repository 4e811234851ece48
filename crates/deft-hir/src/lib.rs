//! Declaration-level HIR consumed by overload synthesis.
//!
//! Hosts lower whatever tree they own (javac, ECJ, a JSON description, ...) into
//! these plain data structures. Nothing here knows about method bodies written
//! by users; the only bodies represented are the forwarding bodies of
//! synthesized declarations (see [`body`]).

/// Forwarding-body IR for synthesized declarations.
pub mod body;

/// Annotation-aware view of classes, methods and parameters.
pub mod framework {
    use std::collections::BTreeSet;
    use std::fmt;

    use deft_types::{Span, Type};
    use serde::{Deserialize, Serialize};

    use crate::body::Stmt;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Annotation {
        pub name: String,
        /// Element-value pairs, already unquoted by whoever parsed the annotation.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub args: Vec<AnnotationArg>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AnnotationArg {
        pub name: String,
        pub value: String,
    }

    impl Annotation {
        pub fn new(name: impl Into<String>) -> Self {
            let mut name = name.into();
            if let Some(stripped) = name.strip_prefix('@') {
                name = stripped.to_string();
            }
            Self {
                name,
                args: Vec::new(),
            }
        }

        pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.args.push(AnnotationArg {
                name: name.into(),
                value: value.into(),
            });
            self
        }

        pub fn matches(&self, query: &str) -> bool {
            annotation_matches(&self.name, query)
        }

        pub fn matches_any<S: AsRef<str>>(&self, queries: &[S]) -> bool {
            queries.iter().any(|q| self.matches(q.as_ref()))
        }

        pub fn arg(&self, name: &str) -> Option<&str> {
            self.args
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str())
        }

        pub fn first_arg(&self) -> Option<&str> {
            self.args.first().map(|a| a.value.as_str())
        }
    }

    /// Java modifiers. Iteration order is the canonical JLS order.
    #[derive(
        Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(rename_all = "lowercase")]
    pub enum Modifier {
        Public,
        Protected,
        Private,
        Abstract,
        Default,
        Static,
        Final,
        Synchronized,
        Native,
        Strictfp,
    }

    impl Modifier {
        pub fn keyword(self) -> &'static str {
            match self {
                Modifier::Public => "public",
                Modifier::Protected => "protected",
                Modifier::Private => "private",
                Modifier::Abstract => "abstract",
                Modifier::Default => "default",
                Modifier::Static => "static",
                Modifier::Final => "final",
                Modifier::Synchronized => "synchronized",
                Modifier::Native => "native",
                Modifier::Strictfp => "strictfp",
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers(BTreeSet<Modifier>);

    impl Modifiers {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, modifier: Modifier) -> Self {
            self.0.insert(modifier);
            self
        }

        pub fn insert(&mut self, modifier: Modifier) {
            self.0.insert(modifier);
        }

        pub fn remove(&mut self, modifier: Modifier) {
            self.0.remove(&modifier);
        }

        pub fn contains(&self, modifier: Modifier) -> bool {
            self.0.contains(&modifier)
        }

        pub fn is_static(&self) -> bool {
            self.contains(Modifier::Static)
        }

        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
            self.0.iter().copied()
        }
    }

    impl FromIterator<Modifier> for Modifiers {
        fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
            Self(iter.into_iter().collect())
        }
    }

    impl fmt::Display for Modifiers {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for (idx, modifier) in self.iter().enumerate() {
                if idx > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(modifier.keyword())?;
            }
            Ok(())
        }
    }

    /// Where a declaration came from.
    ///
    /// Synthesized declarations must never be fed back into synthesis as if a
    /// user had written them.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Origin {
        #[default]
        Source,
        Synthesized,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TypeParam {
        pub name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub bounds: Vec<Type>,
    }

    impl TypeParam {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                bounds: Vec::new(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ParamData {
        pub name: String,
        #[serde(rename = "type")]
        pub ty: Type,
        #[serde(default, skip_serializing_if = "Modifiers::is_empty")]
        pub modifiers: Modifiers,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub annotations: Vec<Annotation>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub span: Option<Span>,
    }

    impl ParamData {
        pub fn new(name: impl Into<String>, ty: Type) -> Self {
            Self {
                name: name.into(),
                ty,
                modifiers: Modifiers::default(),
                annotations: Vec::new(),
                span: None,
            }
        }

        pub fn annotated(mut self, annotation: Annotation) -> Self {
            self.annotations.push(annotation);
            self
        }

        pub fn has_annotation(&self, name: &str) -> bool {
            self.annotations.iter().any(|a| a.matches(name))
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MethodData {
        pub name: String,
        #[serde(default, skip_serializing_if = "Modifiers::is_empty")]
        pub modifiers: Modifiers,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub annotations: Vec<Annotation>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub type_params: Vec<TypeParam>,
        pub return_type: Type,
        #[serde(default)]
        pub params: Vec<ParamData>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub throws: Vec<Type>,
        /// Only synthesized declarations carry a body.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub body: Option<Stmt>,
        #[serde(default)]
        pub origin: Origin,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub span: Option<Span>,
    }

    impl MethodData {
        pub fn new(name: impl Into<String>, return_type: Type) -> Self {
            Self {
                name: name.into(),
                modifiers: Modifiers::default(),
                annotations: Vec::new(),
                type_params: Vec::new(),
                return_type,
                params: Vec::new(),
                throws: Vec::new(),
                body: None,
                origin: Origin::Source,
                span: None,
            }
        }

        pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
            self.modifiers = modifiers;
            self
        }

        pub fn with_param(mut self, param: ParamData) -> Self {
            self.params.push(param);
            self
        }

        pub fn annotated(mut self, annotation: Annotation) -> Self {
            self.annotations.push(annotation);
            self
        }

        pub fn is_static(&self) -> bool {
            self.modifiers.is_static()
        }

        pub fn is_synthesized(&self) -> bool {
            self.origin == Origin::Synthesized
        }

        pub fn has_annotation(&self, name: &str) -> bool {
            self.annotations.iter().any(|a| a.matches(name))
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldData {
        pub name: String,
        #[serde(rename = "type")]
        pub ty: Type,
        #[serde(default, skip_serializing_if = "Modifiers::is_empty")]
        pub modifiers: Modifiers,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub annotations: Vec<Annotation>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub span: Option<Span>,
    }

    impl FieldData {
        pub fn has_annotation(&self, name: &str) -> bool {
            self.annotations.iter().any(|a| a.matches(name))
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct ClassData {
        pub name: String,
        #[serde(default, skip_serializing_if = "Modifiers::is_empty")]
        pub modifiers: Modifiers,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub annotations: Vec<Annotation>,
        #[serde(default)]
        pub fields: Vec<FieldData>,
        #[serde(default)]
        pub methods: Vec<MethodData>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub span: Option<Span>,
    }

    impl ClassData {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                ..Self::default()
            }
        }

        pub fn with_method(mut self, method: MethodData) -> Self {
            self.methods.push(method);
            self
        }

        pub fn has_annotation(&self, name: &str) -> bool {
            self.annotations.iter().any(|a| a.matches(name))
        }

        pub fn synthesized_methods(&self) -> impl Iterator<Item = &MethodData> {
            self.methods.iter().filter(|m| m.is_synthesized())
        }
    }

    /// One source file worth of type declarations.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct CompilationUnit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub package: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub imports: Vec<String>,
        #[serde(default)]
        pub classes: Vec<ClassData>,
    }

    fn annotation_matches(annotation: &str, query: &str) -> bool {
        if annotation == query {
            return true;
        }
        let annotation_simple = annotation.rsplit('.').next().unwrap_or(annotation);
        let query_simple = query.rsplit('.').next().unwrap_or(query);
        annotation_simple == query_simple
    }
}

#[cfg(test)]
mod tests;
