use super::{Expression, Statement, StatementKind};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column position in source text.
///
/// Positions reconstructed from canvas coordinates are heuristic, not a
/// guarantee of matching the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn is_unset(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Expression>,
}

/// A function reconstructed from a blueprint root or parsed from source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: String,
    pub body: Vec<Statement>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    /// Blueprint node id this function was produced from, when converted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// A top-level variable declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramMetadata {
    /// Identity of the graph this program was converted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_name: Option<String>,
}

/// The textual-language tree representation equivalent to a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub language: String,
    pub functions: Vec<Function>,
    pub variables: Vec<VariableDecl>,
    #[serde(default)]
    pub position: SourcePosition,
    #[serde(default)]
    pub metadata: ProgramMetadata,
}

impl Program {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            functions: Vec::new(),
            variables: Vec::new(),
            position: SourcePosition::default(),
            metadata: ProgramMetadata::default(),
        }
    }
}

impl fmt::Display for Program {
    /// Tree rendering of the program structure, for tooling and debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program ({})", self.language)?;
        for variable in &self.variables {
            let value = variable
                .value
                .as_ref()
                .map(|v| format!(" = {}", v))
                .unwrap_or_default();
            writeln!(f, "├── var {}: {}{}", variable.name, variable.ty, value)?;
        }
        let count = self.functions.len();
        for (i, function) in self.functions.iter().enumerate() {
            let last = i + 1 == count;
            let marker = if last { "└── " } else { "├── " };
            let params = function
                .parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, p.ty))
                .join(", ");
            writeln!(
                f,
                "{}fn {}({}) -> {}",
                marker, function.name, params, function.return_type
            )?;
            let child_prefix = if last { "    " } else { "│   " };
            fmt_statements(&function.body, f, child_prefix)?;
        }
        Ok(())
    }
}

fn fmt_statements(statements: &[Statement], f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
    let count = statements.len();
    for (i, statement) in statements.iter().enumerate() {
        fmt_statement(statement, f, prefix, i + 1 == count)?;
    }
    Ok(())
}

fn fmt_statement(
    statement: &Statement,
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    is_last: bool,
) -> fmt::Result {
    let marker = if is_last { "└── " } else { "├── " };
    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    match &statement.kind {
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let cond = condition
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "<missing>".to_string());
            writeln!(f, "{}{}if {}", prefix, marker, cond)?;
            let mut branches = Vec::new();
            if let Some(then) = then_branch {
                branches.push(("then", then));
            }
            if let Some(otherwise) = else_branch {
                branches.push(("else", otherwise));
            }
            let n = branches.len();
            for (i, (label, branch)) in branches.into_iter().enumerate() {
                let last = i + 1 == n;
                let branch_marker = if last { "└── " } else { "├── " };
                writeln!(f, "{}{}{}", child_prefix, branch_marker, label)?;
                let branch_prefix =
                    format!("{}{}", child_prefix, if last { "    " } else { "│   " });
                fmt_statement(branch, f, &branch_prefix, true)?;
            }
            Ok(())
        }
        StatementKind::While { condition, body } => {
            let cond = condition
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "<missing>".to_string());
            writeln!(f, "{}{}while {}", prefix, marker, cond)?;
            fmt_statements(body, f, &child_prefix)
        }
        StatementKind::For {
            init,
            condition,
            body,
            ..
        } => {
            let init = init.as_ref().map(|e| e.to_string()).unwrap_or_default();
            let cond = condition.as_ref().map(|e| e.to_string()).unwrap_or_default();
            writeln!(f, "{}{}for ({}; {})", prefix, marker, init, cond)?;
            fmt_statements(body, f, &child_prefix)
        }
        StatementKind::Return { value } => match value {
            Some(value) => writeln!(f, "{}{}return {}", prefix, marker, value),
            None => writeln!(f, "{}{}return", prefix, marker),
        },
        StatementKind::Assignment {
            target,
            operator,
            value,
        } => writeln!(f, "{}{}{} {} {}", prefix, marker, target, operator, value),
        StatementKind::Block { statements } => {
            writeln!(f, "{}{}block", prefix, marker)?;
            fmt_statements(statements, f, &child_prefix)
        }
        StatementKind::Expression { expression } => {
            writeln!(f, "{}{}{}", prefix, marker, expression)
        }
    }
}
