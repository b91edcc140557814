//! Seams for the external language collaborators.
//!
//! The source-to-AST parser and the AST-to-source code generator live
//! outside this crate; these traits fix the interface the sync layer's
//! callers integrate against.

use crate::ast::{Program, SourcePosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A structured parse error or warning reported by a source parser.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub position: Option<SourcePosition>,
}

/// Turns source text into a program AST.
pub trait SourceParser {
    fn parse(&self, source: &str, language: &str) -> Result<Program, Vec<ParseDiagnostic>>;
}

/// Formatting options passed through to a code generator.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub indent_size: usize,
    pub use_tabs: bool,
    pub preserve_comments: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            use_tabs: false,
            preserve_comments: true,
        }
    }
}

/// Turns a program AST back into source text.
pub trait CodeGenerator {
    fn generate(&self, program: &Program, language: &str, options: &FormatOptions) -> String;
}
