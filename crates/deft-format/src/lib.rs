//! Java source printer for declarations and synthesized overloads.
//!
//! Output is deterministic and always uses the canonical modifier order. User
//! methods carry no body in the HIR, so they print as signatures ending in `;`.

mod java;

pub use java::{
    format_annotation, format_call, format_class, format_expr, format_literal, format_method,
    format_synthesized, format_unit,
};

/// Indents each non-empty line in `block` with `indent`.
#[must_use]
pub fn indent_block(block: &str, indent: &str) -> String {
    let mut out = String::with_capacity(block.len() + indent.len() * 4);
    for line in block.split_inclusive('\n') {
        let line_stripped = line.strip_suffix('\n').unwrap_or(line);
        if !line_stripped.trim().is_empty() {
            out.push_str(indent);
        }
        out.push_str(line_stripped);
        if line.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub indent_width: usize,
    pub indent_style: IndentStyle,
    /// Whether printed classes and units end with a newline.
    pub insert_final_newline: bool,
    /// Separate members with an empty line.
    pub blank_line_between_members: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            indent_style: IndentStyle::Spaces,
            insert_final_newline: true,
            blank_line_between_members: true,
        }
    }
}

impl FormatConfig {
    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        match self.indent_style {
            IndentStyle::Spaces => " ".repeat(self.indent_width),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}
