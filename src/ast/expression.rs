use super::LiteralValue;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An expression tree node.
///
/// `origin` back-references the blueprint node the expression was
/// reconstructed from, when there is one. The emitter reuses it so a
/// graph→AST→graph round trip keeps stable node identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    #[serde(flatten)]
    pub kind: ExpressionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// The closed set of expression kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum ExpressionKind {
    Literal {
        value: LiteralValue,
        value_type: String,
    },
    Binary {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        operator: String,
        operand: Box<Expression>,
    },
    Call {
        callee: String,
        arguments: Vec<Expression>,
    },
    Variable {
        name: String,
    },
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self { kind, origin: None }
    }

    pub fn with_origin(kind: ExpressionKind, origin: impl Into<String>) -> Self {
        Self {
            kind,
            origin: Some(origin.into()),
        }
    }

    pub fn literal(value: LiteralValue) -> Self {
        let value_type = value.type_name().to_string();
        Self::new(ExpressionKind::Literal { value, value_type })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Variable { name: name.into() })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ExpressionKind::Literal { .. } => "literal",
            ExpressionKind::Binary { .. } => "binary",
            ExpressionKind::Unary { .. } => "unary",
            ExpressionKind::Call { .. } => "call",
            ExpressionKind::Variable { .. } => "variable",
        }
    }
}

impl fmt::Display for Expression {
    /// Compact inline rendering, e.g. `(x > 0)` or `clamp(v, 0, 1)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Literal { value, .. } => write!(f, "{}", value),
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            ExpressionKind::Unary { operator, operand } => write!(f, "({}{})", operator, operand),
            ExpressionKind::Call { callee, arguments } => {
                write!(f, "{}({})", callee, arguments.iter().join(", "))
            }
            ExpressionKind::Variable { name } => write!(f, "{}", name),
        }
    }
}
