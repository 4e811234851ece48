use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "short" => PrimitiveType::Short,
            "char" => PrimitiveType::Char,
            "int" => PrimitiveType::Int,
            "long" => PrimitiveType::Long,
            "float" => PrimitiveType::Float,
            "double" => PrimitiveType::Double,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A Java type reference as written in a declaration.
///
/// Types are not resolved: `Optional` and `java.util.Optional` are different
/// `Named` types here, and type variables are `Named` types without arguments.
/// Serialized as Java source text (`"java.util.Map<String, Object>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Named { name: String, args: Vec<Type> },
    Array(Box<Type>),
    Wildcard(Option<WildcardBound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Extends(Box<Type>),
    Super(Box<Type>),
}

impl Type {
    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn char() -> Self {
        Type::Primitive(PrimitiveType::Char)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<Type>) -> Self {
        Type::Named {
            name: name.into(),
            args,
        }
    }

    pub fn parse(text: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser { text, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != text.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// The name of a named type, as written (possibly qualified).
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The last segment of a named type's name: `java.util.Optional` => `Optional`.
    pub fn simple_name(&self) -> Option<&str> {
        self.name()
            .map(|name| name.rsplit('.').next().unwrap_or(name))
    }

    pub fn type_args(&self) -> &[Type] {
        match self {
            Type::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// The same type with its type arguments dropped (`Optional<String>` => `Optional`).
    pub fn erased(&self) -> Type {
        match self {
            Type::Named { name, .. } => Type::named(name.clone()),
            Type::Array(elem) => Type::Array(Box::new(elem.erased())),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Primitive(p) => f.write_str(p.keyword()),
            Type::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Wildcard(None) => f.write_str("?"),
            Type::Wildcard(Some(WildcardBound::Extends(bound))) => write!(f, "? extends {bound}"),
            Type::Wildcard(Some(WildcardBound::Super(bound))) => write!(f, "? super {bound}"),
        }
    }
}

impl FromStr for Type {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::parse(s)
    }
}

impl TryFrom<String> for Type {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Type::parse(&value)
    }
}

impl From<Type> for String {
    fn from(value: Type) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type `{text}` at offset {offset}: {message}")]
pub struct TypeParseError {
    pub text: String,
    pub offset: usize,
    pub message: &'static str,
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &'static str) -> TypeParseError {
        TypeParseError {
            text: self.text.to_string(),
            offset: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&str> {
        let start = self.pos;
        let mut chars = self.text[start..].char_indices();
        match chars.next() {
            Some((_, c)) if is_ident_start(c) => {}
            _ => return None,
        }
        let len = chars
            .find(|(_, c)| !is_ident_part(*c))
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len() - start);
        self.pos = start + len;
        Some(&self.text[start..start + len])
    }

    /// `java.util.Map`; stops before `...` so varargs stay parseable.
    fn qualified_name(&mut self) -> Result<String, TypeParseError> {
        self.skip_ws();
        let mut name = match self.ident() {
            Some(ident) => ident.to_string(),
            None => return Err(self.error("expected a type name")),
        };
        loop {
            let rest = &self.text[self.pos..];
            let continues = rest.starts_with('.')
                && rest[1..].chars().next().is_some_and(is_ident_start);
            if !continues {
                break;
            }
            self.pos += 1;
            let Some(segment) = self.ident() else {
                return Err(self.error("expected a name segment after `.`"));
            };
            name.push('.');
            name.push_str(segment);
        }
        Ok(name)
    }

    fn parse_type(&mut self) -> Result<Type, TypeParseError> {
        self.skip_ws();
        let mut ty = if self.eat('?') {
            self.skip_ws();
            let rest = &self.text[self.pos..];
            if rest.starts_with("extends") {
                self.pos += "extends".len();
                Type::Wildcard(Some(WildcardBound::Extends(Box::new(self.parse_type()?))))
            } else if rest.starts_with("super") {
                self.pos += "super".len();
                Type::Wildcard(Some(WildcardBound::Super(Box::new(self.parse_type()?))))
            } else {
                Type::Wildcard(None)
            }
        } else {
            let name = self.qualified_name()?;
            if name == "void" {
                Type::Void
            } else if let Some(primitive) = PrimitiveType::from_keyword(&name) {
                Type::Primitive(primitive)
            } else {
                let mut args = Vec::new();
                if self.eat('<') {
                    loop {
                        args.push(self.parse_type()?);
                        if self.eat(',') {
                            continue;
                        }
                        if self.eat('>') {
                            break;
                        }
                        return Err(self.error("expected `,` or `>` in type arguments"));
                    }
                }
                Type::Named { name, args }
            }
        };

        loop {
            self.skip_ws();
            if self.text[self.pos..].starts_with("...") {
                self.pos += 3;
                ty = Type::Array(Box::new(ty));
                continue;
            }
            if self.eat('[') {
                if !self.eat(']') {
                    return Err(self.error("expected `]`"));
                }
                ty = Type::Array(Box::new(ty));
                continue;
            }
            break;
        }
        Ok(ty)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
