//! Deterministic structural hashing of both representations.
//!
//! Positions, metadata and timestamps are excluded so that moving nodes on
//! the canvas or re-laying-out a program does not count as a structural
//! change. The hasher seeds are fixed: the same value always hashes the
//! same, within and across processes.

use crate::ast::{Expression, ExpressionKind, Function, Program, Statement, StatementKind};
use crate::graph::Graph;
use ahash::RandomState;
use itertools::Itertools;
use std::hash::{BuildHasher, Hash, Hasher};

const SEEDS: (u64, u64, u64, u64) = (
    0x68656e6b616e_01,
    0x68656e6b616e_02,
    0x68656e6b616e_03,
    0x68656e6b616e_04,
);

fn hasher() -> impl Hasher {
    RandomState::with_seeds(SEEDS.0, SEEDS.1, SEEDS.2, SEEDS.3).build_hasher()
}

/// Structural hash of a graph: node-kind sequence, titles, pin shapes,
/// canonical properties and connection endpoints.
pub fn graph_hash(graph: &Graph) -> u64 {
    let mut state = hasher();
    graph.language.hash(&mut state);
    (graph.nodes.len() as u64).hash(&mut state);
    for node in &graph.nodes {
        node.kind.as_str().hash(&mut state);
        node.title.hash(&mut state);
        for pin in node.inputs.iter().chain(node.outputs.iter()) {
            pin.name.hash(&mut state);
            pin.is_exec().hash(&mut state);
            pin.kind.data_type().unwrap_or("").hash(&mut state);
        }
        // Property maps iterate in arbitrary order; sort keys for a
        // canonical stream.
        for (key, value) in node.properties.iter().sorted_by_key(|(k, _)| k.as_str()) {
            key.hash(&mut state);
            value.to_string().hash(&mut state);
        }
    }
    for connection in &graph.connections {
        connection.source_node.hash(&mut state);
        connection.source_pin.hash(&mut state);
        connection.target_node.hash(&mut state);
        connection.target_pin.hash(&mut state);
    }
    state.finish()
}

/// Structural hash of a program: function count, signatures and the full
/// statement/expression structure. Origin back-references are excluded.
pub fn program_hash(program: &Program) -> u64 {
    let mut state = hasher();
    program.language.hash(&mut state);
    (program.functions.len() as u64).hash(&mut state);
    for function in &program.functions {
        hash_function(function, &mut state);
    }
    (program.variables.len() as u64).hash(&mut state);
    for variable in &program.variables {
        variable.name.hash(&mut state);
        variable.ty.hash(&mut state);
        hash_opt_expression(variable.value.as_ref(), &mut state);
    }
    state.finish()
}

fn hash_function(function: &Function, state: &mut impl Hasher) {
    function.name.hash(state);
    function.return_type.hash(state);
    function.is_public.hash(state);
    function.is_static.hash(state);
    function.modifiers.hash(state);
    (function.parameters.len() as u64).hash(state);
    for parameter in &function.parameters {
        parameter.name.hash(state);
        parameter.ty.hash(state);
        hash_opt_expression(parameter.default.as_ref(), state);
    }
    hash_statements(&function.body, state);
}

fn hash_statements(statements: &[Statement], state: &mut impl Hasher) {
    (statements.len() as u64).hash(state);
    for statement in statements {
        hash_statement(statement, state);
    }
}

fn hash_opt_statement(statement: Option<&Statement>, state: &mut impl Hasher) {
    match statement {
        Some(statement) => {
            true.hash(state);
            hash_statement(statement, state);
        }
        None => false.hash(state),
    }
}

fn hash_statement(statement: &Statement, state: &mut impl Hasher) {
    statement.kind_name().hash(state);
    match &statement.kind {
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            hash_opt_expression(condition.as_ref(), state);
            hash_opt_statement(then_branch.as_deref(), state);
            hash_opt_statement(else_branch.as_deref(), state);
        }
        StatementKind::While { condition, body } => {
            hash_opt_expression(condition.as_ref(), state);
            hash_statements(body, state);
        }
        StatementKind::For {
            init,
            condition,
            update,
            body,
        } => {
            hash_opt_expression(init.as_ref(), state);
            hash_opt_expression(condition.as_ref(), state);
            hash_opt_expression(update.as_ref(), state);
            hash_statements(body, state);
        }
        StatementKind::Return { value } => hash_opt_expression(value.as_ref(), state),
        StatementKind::Assignment {
            target,
            operator,
            value,
        } => {
            hash_expression(target, state);
            operator.hash(state);
            hash_expression(value, state);
        }
        StatementKind::Block { statements } => hash_statements(statements, state),
        StatementKind::Expression { expression } => hash_expression(expression, state),
    }
}

fn hash_opt_expression(expression: Option<&Expression>, state: &mut impl Hasher) {
    match expression {
        Some(expression) => {
            true.hash(state);
            hash_expression(expression, state);
        }
        None => false.hash(state),
    }
}

fn hash_expression(expression: &Expression, state: &mut impl Hasher) {
    expression.kind_name().hash(state);
    match &expression.kind {
        ExpressionKind::Literal { value, value_type } => {
            value.hash(state);
            value_type.hash(state);
        }
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            operator.hash(state);
            hash_expression(left, state);
            hash_expression(right, state);
        }
        ExpressionKind::Unary { operator, operand } => {
            operator.hash(state);
            hash_expression(operand, state);
        }
        ExpressionKind::Call { callee, arguments } => {
            callee.hash(state);
            (arguments.len() as u64).hash(state);
            for argument in arguments {
                hash_expression(argument, state);
            }
        }
        ExpressionKind::Variable { name } => name.hash(state),
    }
}
