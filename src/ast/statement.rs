use super::{Expression, SourcePosition};
use serde::{Deserialize, Serialize};

/// A statement with its originating blueprint node id and source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    #[serde(flatten)]
    pub kind: StatementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub position: SourcePosition,
}

/// The closed set of statement kinds.
///
/// `If` branches hold a single statement unwrapped; a branch of two or
/// more statements is wrapped in a `Block`. `For` has an `update` slot for
/// parsed code, but for-loop nodes carry no Update pin, so graph-derived
/// for statements never populate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum StatementKind {
    If {
        condition: Option<Expression>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        then_branch: Option<Box<Statement>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Option<Expression>,
        body: Vec<Statement>,
    },
    For {
        init: Option<Expression>,
        condition: Option<Expression>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        update: Option<Expression>,
        body: Vec<Statement>,
    },
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Expression>,
    },
    Assignment {
        target: Expression,
        operator: String,
        value: Expression,
    },
    Block {
        statements: Vec<Statement>,
    },
    Expression {
        expression: Expression,
    },
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            origin: None,
            position: SourcePosition::default(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            StatementKind::If { .. } => "if",
            StatementKind::While { .. } => "while",
            StatementKind::For { .. } => "for",
            StatementKind::Return { .. } => "return",
            StatementKind::Assignment { .. } => "assignment",
            StatementKind::Block { .. } => "block",
            StatementKind::Expression { .. } => "expression",
        }
    }
}
