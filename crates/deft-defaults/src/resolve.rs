//! Turning default text into type-correct forwarding arguments.

use deft_config::CharLiteralStyle;
use deft_framework::SynthesisError;
use deft_hir::body::{Expr, Literal};
use deft_types::{PrimitiveType, Type};

use crate::signature::{DefaultSpec, ParameterSpec, TypeCategory};

/// Resolve the default of optional parameter `param` of method `method`.
///
/// Wrapper parameters always resolve to an empty wrapper. Everything else needs
/// default text that parses under the parameter's literal grammar.
pub fn resolve_default(
    method: &str,
    param: &ParameterSpec,
    default: &DefaultSpec,
    char_literal: CharLiteralStyle,
) -> Result<Expr, SynthesisError> {
    if let TypeCategory::Wrapper(ty) = &param.category {
        if default.raw.as_deref().is_some_and(|raw| !raw.is_empty()) {
            tracing::warn!(
                method,
                param = %param.name,
                "ignoring default text on wrapper parameter; it always defaults to empty"
            );
        }
        return Ok(Expr::empty_wrapper(ty));
    }

    if param.category == TypeCategory::Other {
        return Err(SynthesisError::UnsupportedType {
            method: method.to_string(),
            param: param.name.clone(),
            ty: param.ty.to_string(),
            context: "",
        });
    }

    let Some(raw) = default.raw.as_deref() else {
        return Err(SynthesisError::MissingDefault {
            method: method.to_string(),
            param: param.name.clone(),
        });
    };

    let parse_error = |expected: &'static str| SynthesisError::LiteralParse {
        method: method.to_string(),
        param: param.name.clone(),
        text: raw.to_string(),
        expected,
    };

    let expr = match &param.category {
        TypeCategory::Int => Expr::literal(Literal::Int(
            raw.parse().map_err(|_| parse_error("int"))?,
        )),
        TypeCategory::Short => {
            let value: i16 = raw.parse().map_err(|_| parse_error("short"))?;
            narrowed(PrimitiveType::Short, i32::from(value))
        }
        TypeCategory::Byte => {
            let value: i8 = raw.parse().map_err(|_| parse_error("byte"))?;
            narrowed(PrimitiveType::Byte, i32::from(value))
        }
        TypeCategory::Long => {
            let digits = raw.strip_suffix(['L', 'l']).unwrap_or(raw);
            Expr::literal(Literal::Long(
                digits.parse().map_err(|_| parse_error("long"))?,
            ))
        }
        TypeCategory::Float => {
            let digits = raw.strip_suffix(['f', 'F']).unwrap_or(raw);
            let value: f32 = digits
                .parse()
                .ok()
                .filter(|v: &f32| v.is_finite())
                .ok_or_else(|| parse_error("float"))?;
            Expr::literal(Literal::Float(value))
        }
        TypeCategory::Double => {
            let digits = raw.strip_suffix(['d', 'D']).unwrap_or(raw);
            let value: f64 = digits
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| parse_error("double"))?;
            Expr::literal(Literal::Double(value))
        }
        TypeCategory::Boolean => {
            let value = if raw.eq_ignore_ascii_case("true") {
                true
            } else if raw.eq_ignore_ascii_case("false") {
                false
            } else {
                return Err(parse_error("boolean"));
            };
            Expr::literal(Literal::Boolean(value))
        }
        TypeCategory::Char => {
            let ch = parse_char(raw).ok_or_else(|| parse_error("char"))?;
            match char_literal {
                CharLiteralStyle::Char => Expr::literal(Literal::Char(ch)),
                CharLiteralStyle::IntCast => narrowed(PrimitiveType::Char, ch as i32),
            }
        }
        TypeCategory::String => Expr::literal(Literal::String(raw.to_string())),
        TypeCategory::Wrapper(_) | TypeCategory::Other => unreachable!("handled above"),
    };

    tracing::trace!(method, param = %param.name, raw, resolved = ?expr, "resolved default");
    Ok(expr)
}

fn narrowed(to: PrimitiveType, value: i32) -> Expr {
    Expr::cast(Type::Primitive(to), Expr::literal(Literal::Int(value)))
}

/// Reads a char default: a single character, a two-character escape such as
/// `\t`, or else the first character of the text.
///
/// A Java `char` is one UTF-16 unit, so characters outside the Basic
/// Multilingual Plane are rejected.
pub fn parse_char(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    if first == '\\' {
        if let (Some(escape), None) = (chars.next(), chars.next()) {
            let unescaped = match escape {
                't' => Some('\t'),
                'b' => Some('\u{8}'),
                'n' => Some('\n'),
                'f' => Some('\u{c}'),
                'r' => Some('\r'),
                '\\' => Some('\\'),
                '"' => Some('"'),
                '\'' => Some('\''),
                _ => None,
            };
            if unescaped.is_some() {
                return unescaped;
            }
        }
    }
    Some(first).filter(|ch| ch.len_utf16() == 1)
}
