use std::fmt::Write as _;

use deft_hir::body::{Expr, ForwardCall, Literal, Receiver, Stmt};
use deft_hir::framework::{
    Annotation, ClassData, CompilationUnit, FieldData, MethodData, ParamData, TypeParam,
};

use crate::{indent_block, FormatConfig};

pub fn format_literal(literal: &Literal) -> String {
    match literal {
        Literal::Int(v) => v.to_string(),
        Literal::Long(v) => format!("{v}L"),
        // `Debug` keeps a fractional part or exponent, both valid Java.
        Literal::Float(v) => format!("{v:?}f"),
        Literal::Double(v) => format!("{v:?}"),
        Literal::Boolean(v) => v.to_string(),
        Literal::Char(c) => {
            let mut out = String::from("'");
            push_escaped(&mut out, *c, '\'');
            out.push('\'');
            out
        }
        Literal::String(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\t' => out.push_str("\\t"),
        '\u{8}' => out.push_str("\\b"),
        '\n' => out.push_str("\\n"),
        '\u{c}' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        c => out.push(c),
    }
}

pub fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Name { name } => name.clone(),
        Expr::Literal { literal } => format_literal(literal),
        Expr::Cast { ty, expr } => format!("({ty}) {}", format_expr(expr)),
        Expr::EmptyWrapper { wrapper } => format!("{wrapper}.empty()"),
        Expr::CarrierLookup {
            carrier,
            key,
            ty,
            default,
        } => {
            let key = quote(key);
            format!(
                "{carrier}.containsKey({key}) ? ({ty}) {carrier}.get({key}) : {}",
                format_expr(default)
            )
        }
    }
}

pub fn format_call(call: &ForwardCall) -> String {
    let mut out = match &call.receiver {
        Receiver::Type(name) => format!("{name}."),
        Receiver::This => "this.".to_string(),
    };
    if !call.type_args.is_empty() {
        out.push('<');
        out.push_str(&join(call.type_args.iter().map(ToString::to_string)));
        out.push('>');
    }
    out.push_str(&call.method);
    out.push('(');
    out.push_str(&join(call.args.iter().map(format_expr)));
    out.push(')');
    out
}

fn format_stmt(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Return(call) => format!("return {};", format_call(call)),
        Stmt::Call(call) => format!("{};", format_call(call)),
    }
}

pub fn format_annotation(annotation: &Annotation) -> String {
    let mut out = format!("@{}", annotation.name);
    match annotation.args.as_slice() {
        [] => {}
        [only] if only.name == "value" => {
            let _ = write!(out, "({})", quote(&only.value));
        }
        args => {
            let args = args
                .iter()
                .map(|arg| format!("{} = {}", arg.name, quote(&arg.value)));
            let _ = write!(out, "({})", join(args));
        }
    }
    out
}

fn format_type_params(params: &[TypeParam]) -> String {
    let params = params.iter().map(|tp| {
        if tp.bounds.is_empty() {
            tp.name.clone()
        } else {
            let bounds: Vec<String> = tp.bounds.iter().map(ToString::to_string).collect();
            format!("{} extends {}", tp.name, bounds.join(" & "))
        }
    });
    format!("<{}>", join(params))
}

fn format_param(param: &ParamData) -> String {
    let mut out = String::new();
    for annotation in &param.annotations {
        out.push_str(&format_annotation(annotation));
        out.push(' ');
    }
    if !param.modifiers.is_empty() {
        let _ = write!(out, "{} ", param.modifiers);
    }
    let _ = write!(out, "{} {}", param.ty, param.name);
    out
}

/// A method declaration: annotations on their own lines, then the signature
/// and either the forwarding body or `;`.
pub fn format_method(method: &MethodData, config: &FormatConfig) -> String {
    let mut out = String::new();
    for annotation in &method.annotations {
        out.push_str(&format_annotation(annotation));
        out.push('\n');
    }

    if !method.modifiers.is_empty() {
        let _ = write!(out, "{} ", method.modifiers);
    }
    if !method.type_params.is_empty() {
        let _ = write!(out, "{} ", format_type_params(&method.type_params));
    }
    let _ = write!(
        out,
        "{} {}({})",
        method.return_type,
        method.name,
        join(method.params.iter().map(format_param))
    );
    if !method.throws.is_empty() {
        let _ = write!(
            out,
            " throws {}",
            join(method.throws.iter().map(ToString::to_string))
        );
    }

    match &method.body {
        Some(stmt) => {
            out.push_str(" {\n");
            out.push_str(&config.indent_unit());
            out.push_str(&format_stmt(stmt));
            out.push_str("\n}");
        }
        None => out.push(';'),
    }
    out
}

fn format_field(field: &FieldData) -> String {
    let mut out = String::new();
    for annotation in &field.annotations {
        out.push_str(&format_annotation(annotation));
        out.push('\n');
    }
    if !field.modifiers.is_empty() {
        let _ = write!(out, "{} ", field.modifiers);
    }
    let _ = write!(out, "{} {};", field.ty, field.name);
    out
}

fn format_members(
    header: String,
    members: impl Iterator<Item = String>,
    config: &FormatConfig,
) -> String {
    let indent = config.indent_unit();
    let separator = if config.blank_line_between_members {
        "\n\n"
    } else {
        "\n"
    };
    let body = members
        .map(|member| indent_block(&member, &indent))
        .collect::<Vec<_>>()
        .join(separator);

    let mut out = header;
    out.push_str(" {\n");
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    out.push('}');
    out
}

fn class_header(class: &ClassData) -> String {
    let mut out = String::new();
    for annotation in &class.annotations {
        out.push_str(&format_annotation(annotation));
        out.push('\n');
    }
    if !class.modifiers.is_empty() {
        let _ = write!(out, "{} ", class.modifiers);
    }
    let _ = write!(out, "class {}", class.name);
    out
}

/// The whole class, fields first, then methods in declaration order with
/// synthesized overloads where they were injected.
pub fn format_class(class: &ClassData, config: &FormatConfig) -> String {
    let members = class
        .fields
        .iter()
        .map(format_field)
        .chain(class.methods.iter().map(|m| format_method(m, config)));
    let mut out = format_members(class_header(class), members, config);
    if config.insert_final_newline {
        out.push('\n');
    }
    out
}

/// Only the synthesized members of `class`, inside its class header.
pub fn format_synthesized(class: &ClassData, config: &FormatConfig) -> String {
    let members = class
        .synthesized_methods()
        .map(|m| format_method(m, config));
    let mut out = format_members(class_header(class), members, config);
    if config.insert_final_newline {
        out.push('\n');
    }
    out
}

pub fn format_unit(unit: &CompilationUnit, config: &FormatConfig) -> String {
    let mut sections = Vec::new();
    if let Some(package) = &unit.package {
        sections.push(format!("package {package};"));
    }
    if !unit.imports.is_empty() {
        sections.push(
            unit.imports
                .iter()
                .map(|import| format!("import {import};"))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    let no_newline = FormatConfig {
        insert_final_newline: false,
        ..config.clone()
    };
    sections.extend(unit.classes.iter().map(|c| format_class(c, &no_newline)));

    let mut out = sections.join("\n\n");
    if config.insert_final_newline {
        out.push('\n');
    }
    out
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}
