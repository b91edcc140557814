use super::CompilerConfig;
use crate::ast::{
    Expression, Function, Parameter, SourcePosition, Statement, StatementKind, VariableDecl,
};
use crate::graph::{pins, props, ConnectionIndex, Node, NodeKind};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Per-traversal lowering state for one function root (or the top-level
/// variable pass). Exec traversal carries a visited set; once a node has
/// been converted anywhere in the traversal it is never converted again,
/// so a node reachable via two exec paths is dropped from the second one.
pub(super) struct FunctionLowering<'a> {
    pub(super) nodes: &'a AHashMap<&'a str, &'a Node>,
    pub(super) index: &'a ConnectionIndex<'a>,
    pub(super) config: &'a CompilerConfig,
    pub(super) visited: AHashSet<&'a str>,
    /// Cycle defense for data-pin recursion. Separate from `visited`
    /// because one value producer may legitimately feed many consumers.
    pub(super) expr_stack: AHashSet<&'a str>,
}

impl<'a> FunctionLowering<'a> {
    pub(super) fn new(
        nodes: &'a AHashMap<&'a str, &'a Node>,
        index: &'a ConnectionIndex<'a>,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            nodes,
            index,
            config,
            visited: AHashSet::new(),
            expr_stack: AHashSet::new(),
        }
    }

    pub(super) fn lower_function(&mut self, root: &'a Node) -> Function {
        self.visited.insert(root.id.as_str());

        let parameters = root
            .inputs
            .iter()
            .filter(|pin| !pin.is_exec())
            .map(|pin| Parameter {
                name: pin.name.clone(),
                ty: pin
                    .kind
                    .data_type()
                    .unwrap_or("any")
                    .to_string(),
                default: pin
                    .default_value
                    .as_ref()
                    .map(|value| Expression::literal(crate::ast::LiteralValue::from_json(value))),
            })
            .collect();

        let return_type = root
            .first_data_output()
            .and_then(|pin| pin.kind.data_type())
            .unwrap_or("void")
            .to_string();

        let body = match root.first_exec_output() {
            Some(pin) => self.lower_chain(&root.id, &pin.id),
            None => Vec::new(),
        };

        Function {
            name: root.title.clone(),
            parameters,
            return_type,
            body,
            is_public: root.kind == NodeKind::Function,
            is_static: false,
            modifiers: Vec::new(),
            origin: Some(root.id.clone()),
        }
    }

    /// Converts a top-level variable node carrying the declaration marker.
    pub(super) fn lower_variable_decl(&mut self, node: &'a Node) -> Option<VariableDecl> {
        if !node.property_bool(props::DECLARATION) {
            return None;
        }
        let name = node
            .property_str(props::NAME)
            .unwrap_or(&node.title)
            .to_string();
        let ty = node
            .first_data_output()
            .and_then(|pin| pin.kind.data_type())
            .unwrap_or("any")
            .to_string();
        let value = self.input_producer(node, pins::VALUE);
        Some(VariableDecl {
            name,
            ty,
            value,
            origin: Some(node.id.clone()),
        })
    }

    /// Converts the ordered exec fan-out of `(node, pin)` into a statement
    /// sequence.
    pub(super) fn lower_chain(&mut self, node_id: &str, pin_id: &str) -> Vec<Statement> {
        let index = self.index;
        let nodes = self.nodes;
        let mut statements = Vec::new();
        for connection in index.outgoing(node_id, pin_id) {
            let Some(target) = nodes.get(connection.target_node.as_str()).copied() else {
                // Dangling connection; skip.
                continue;
            };
            if !self.visited.insert(target.id.as_str()) {
                debug!(node = %target.id, "node already converted on another exec path; dropping");
                continue;
            }
            if let Some(statement) = self.lower_statement(target) {
                statements.push(statement);
            }
        }
        statements
    }

    fn lower_statement(&mut self, node: &'a Node) -> Option<Statement> {
        let kind = match node.kind {
            NodeKind::If => Some(StatementKind::If {
                condition: self.input_producer(node, pins::CONDITION),
                then_branch: self.lower_branch(node, pins::THEN),
                else_branch: self.lower_branch(node, pins::ELSE),
            }),
            NodeKind::While => Some(StatementKind::While {
                condition: self.input_producer(node, pins::CONDITION),
                body: self.lower_loop_body(node),
            }),
            NodeKind::For => Some(StatementKind::For {
                init: self.input_producer(node, pins::START),
                condition: self.input_producer(node, pins::END),
                // For-loop nodes have no Update pin in this graph schema.
                update: None,
                body: self.lower_loop_body(node),
            }),
            NodeKind::Return => Some(StatementKind::Return {
                value: self.input_producer(node, pins::VALUE),
            }),
            NodeKind::Assignment => {
                let target = self.input_producer(node, pins::VARIABLE);
                let value = self.input_producer(node, pins::VALUE);
                match (target, value) {
                    (Some(target), Some(value)) => Some(StatementKind::Assignment {
                        target,
                        operator: node
                            .property_str(props::OPERATOR)
                            .unwrap_or("=")
                            .to_string(),
                        value,
                    }),
                    _ => {
                        debug!(node = %node.id, "assignment node missing a producer; dropping");
                        None
                    }
                }
            }
            NodeKind::Call | NodeKind::Native => self
                .call_expression(node)
                .map(|expression| StatementKind::Expression { expression }),
            other => {
                debug!(node = %node.id, kind = other.as_str(), "unrecognized statement head; skipping");
                None
            }
        };
        kind.map(|kind| Statement {
            kind,
            origin: Some(node.id.clone()),
            position: self.position_for(node),
        })
    }

    /// A branch chain of one statement is stored unwrapped; two or more
    /// wrap in a block.
    fn lower_branch(&mut self, node: &'a Node, pin_name: &str) -> Option<Box<Statement>> {
        let pin = node.output_named(pin_name)?;
        let mut chain = self.lower_chain(&node.id, &pin.id);
        match chain.len() {
            0 => None,
            1 => Some(Box::new(chain.remove(0))),
            _ => Some(Box::new(Statement::new(StatementKind::Block {
                statements: chain,
            }))),
        }
    }

    fn lower_loop_body(&mut self, node: &'a Node) -> Vec<Statement> {
        match node.output_named(pins::LOOP) {
            Some(pin) => self.lower_chain(&node.id, &pin.id),
            None => Vec::new(),
        }
    }

    pub(super) fn position_for(&self, node: &Node) -> SourcePosition {
        if self.config.preserve_positions {
            if let Some(position) = node.metadata.source_position {
                return position;
            }
        }
        if self.config.generate_positions {
            return self.config.position_scale.to_source(node.position);
        }
        SourcePosition::default()
    }
}
