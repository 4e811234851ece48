use deft_framework::HostAst;
use deft_hir::framework::{Annotation, Modifiers, ParamData, TypeParam};
use deft_types::{ClassId, MethodId, PrimitiveType, Span, Type};

/// The type categories a default can be written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCategory {
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    Boolean,
    Char,
    String,
    /// A configured "present or absent" wrapper, e.g. `Optional<String>`.
    Wrapper(Type),
    Other,
}

impl TypeCategory {
    pub fn of(ty: &Type, wrapper_types: &[String]) -> Self {
        if let Some(primitive) = ty.primitive() {
            return match primitive {
                PrimitiveType::Int => TypeCategory::Int,
                PrimitiveType::Long => TypeCategory::Long,
                PrimitiveType::Short => TypeCategory::Short,
                PrimitiveType::Byte => TypeCategory::Byte,
                PrimitiveType::Float => TypeCategory::Float,
                PrimitiveType::Double => TypeCategory::Double,
                PrimitiveType::Boolean => TypeCategory::Boolean,
                PrimitiveType::Char => TypeCategory::Char,
            };
        }

        match ty.name() {
            Some("String" | "java.lang.String") if ty.type_args().is_empty() => {
                TypeCategory::String
            }
            Some(name) if wrapper_types.iter().any(|w| type_name_matches(name, w)) => {
                TypeCategory::Wrapper(ty.clone())
            }
            _ => TypeCategory::Other,
        }
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self, TypeCategory::Wrapper(_))
    }
}

fn type_name_matches(name: &str, configured: &str) -> bool {
    if name == configured {
        return true;
    }
    let simple = name.rsplit('.').next().unwrap_or(name);
    let configured_simple = configured.rsplit('.').next().unwrap_or(configured);
    simple == configured_simple
}

/// Default attached to an optional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSpec {
    /// Literal text from the marker; `None` when the marker carried no value.
    pub raw: Option<String>,
}

impl DefaultSpec {
    /// Reads the default text off a marker annotation: `value` (`@Def("1")`),
    /// then `def` (`@Opt(def = "1")`), then whatever single argument is present.
    pub fn from_marker(marker: &Annotation) -> Self {
        let raw = marker
            .arg("value")
            .or_else(|| marker.arg("def"))
            .or_else(|| marker.first_arg())
            .map(str::to_owned);
        Self { raw }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: Type,
    pub category: TypeCategory,
    pub modifiers: Modifiers,
    /// Annotations other than synthesis markers.
    pub annotations: Vec<Annotation>,
    pub ordinal: usize,
    pub span: Option<Span>,
    /// Present iff the parameter is optional.
    pub default: Option<DefaultSpec>,
}

impl ParameterSpec {
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// The declaration this parameter keeps when it is retained in an overload.
    pub fn to_param(&self) -> ParamData {
        ParamData {
            name: self.name.clone(),
            ty: self.ty.clone(),
            modifiers: self.modifiers.clone(),
            annotations: self.annotations.clone(),
            span: self.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Void,
    NonVoid,
}

/// A read-only snapshot of one annotated method, taken once per annotation
/// event.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub class: ClassId,
    pub enclosing_type: String,
    pub is_static: bool,
    pub modifiers: Modifiers,
    /// Method-level annotations other than synthesis markers.
    pub annotations: Vec<Annotation>,
    pub type_params: Vec<TypeParam>,
    pub return_type: Type,
    pub throws: Vec<Type>,
    pub params: Vec<ParameterSpec>,
    pub anchor: Option<Span>,
}

impl MethodSignature {
    /// Snapshot `method`. A parameter is optional when it carries one of
    /// `optional_markers`; every name in `all_markers` is dropped from the
    /// copied annotation lists.
    pub fn from_host<S: AsRef<str>, M: AsRef<str>>(
        host: &dyn HostAst,
        method: MethodId,
        optional_markers: &[S],
        all_markers: &[M],
        wrapper_types: &[String],
    ) -> Self {
        let class = host.enclosing_class(method);
        let data = host.method(method);

        let params = host
            .params_of(method)
            .into_iter()
            .map(|id| {
                let param = host.param(id);
                let default = param
                    .annotations
                    .iter()
                    .find(|a| a.matches_any(optional_markers))
                    .map(DefaultSpec::from_marker);
                ParameterSpec {
                    name: param.name.clone(),
                    ty: param.ty.clone(),
                    category: TypeCategory::of(&param.ty, wrapper_types),
                    modifiers: param.modifiers.clone(),
                    annotations: without_markers(&param.annotations, all_markers),
                    ordinal: id.ordinal(),
                    span: param.span,
                    default,
                }
            })
            .collect();

        Self {
            name: data.name.clone(),
            class,
            enclosing_type: host.class(class).name.clone(),
            is_static: data.is_static(),
            modifiers: data.modifiers.clone(),
            annotations: without_markers(&data.annotations, all_markers),
            type_params: data.type_params.clone(),
            return_type: data.return_type.clone(),
            throws: data.throws.clone(),
            params,
            anchor: data.span,
        }
    }

    pub fn return_kind(&self) -> ReturnKind {
        if self.return_type.is_void() {
            ReturnKind::Void
        } else {
            ReturnKind::NonVoid
        }
    }

    /// Ordinal of the first optional parameter, if any.
    pub fn first_optional(&self) -> Option<usize> {
        self.params.iter().find(|p| p.is_optional()).map(|p| p.ordinal)
    }

    pub fn has_wrapper_params(&self) -> bool {
        self.params.iter().any(|p| p.category.is_wrapper())
    }
}

fn without_markers<S: AsRef<str>>(annotations: &[Annotation], markers: &[S]) -> Vec<Annotation> {
    annotations
        .iter()
        .filter(|a| !a.matches_any(markers))
        .cloned()
        .collect()
}
