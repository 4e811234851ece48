use deft_types::Type;
use serde::{Deserialize, Serialize};

/// A literal the synthesizer can place in a forwarding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Reference to a parameter of the synthesized declaration.
    Name { name: String },
    Literal { literal: Literal },
    Cast { ty: Type, expr: Box<Expr> },
    /// `<wrapper>.empty()`; `wrapper` is the erased wrapper type as declared.
    EmptyWrapper { wrapper: Type },
    /// `carrier.containsKey("key") ? (ty) carrier.get("key") : default`
    CarrierLookup {
        carrier: String,
        key: String,
        ty: Type,
        default: Box<Expr>,
    },
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name { name: name.into() }
    }

    pub fn literal(literal: Literal) -> Self {
        Expr::Literal { literal }
    }

    pub fn cast(ty: Type, expr: Expr) -> Self {
        Expr::Cast {
            ty,
            expr: Box::new(expr),
        }
    }

    pub fn empty_wrapper(declared: &Type) -> Self {
        Expr::EmptyWrapper {
            wrapper: declared.erased(),
        }
    }

    pub fn is_empty_wrapper(&self) -> bool {
        matches!(self, Expr::EmptyWrapper { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "lowercase")]
pub enum Receiver {
    /// Static call through the enclosing type: `Foo.bar(..)`.
    Type(String),
    /// Instance call: `this.bar(..)`.
    This,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardCall {
    pub receiver: Receiver,
    pub method: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<Type>,
    pub args: Vec<Expr>,
}

/// The single statement of a forwarding body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "call", rename_all = "lowercase")]
pub enum Stmt {
    Return(ForwardCall),
    Call(ForwardCall),
}

impl Stmt {
    pub fn call(&self) -> &ForwardCall {
        match self {
            Stmt::Return(call) | Stmt::Call(call) => call,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Stmt::Return(_))
    }
}
