use super::statements::FunctionLowering;
use crate::ast::{Expression, ExpressionKind, LiteralValue};
use crate::graph::{pins, props, Node, NodeKind, Pin};
use tracing::{debug, trace};

impl<'a> FunctionLowering<'a> {
    /// Resolves the producer connected to `node`'s input pin `pin_name`
    /// and converts it to an expression. Returns `None` when the pin,
    /// producer, or conversion is missing; the caller omits the element.
    pub(super) fn input_producer(&mut self, node: &Node, pin_name: &str) -> Option<Expression> {
        let pin = node.input_named(pin_name)?;
        self.pin_producer(node, pin)
    }

    fn pin_producer(&mut self, node: &Node, pin: &Pin) -> Option<Expression> {
        let index = self.index;
        let connection = index.incoming(&node.id, &pin.id).first()?;
        let source_node = connection.source_node.clone();
        self.expression_from(&source_node)
    }

    fn expression_from(&mut self, node_id: &str) -> Option<Expression> {
        let nodes = self.nodes;
        let Some(node) = nodes.get(node_id).copied() else {
            trace!(node = node_id, "producer references a missing node; skipping");
            return None;
        };
        if !self.expr_stack.insert(node.id.as_str()) {
            debug!(node = %node.id, "data-flow cycle detected; breaking recursion");
            return None;
        }
        let kind = self.lower_expression_kind(node);
        self.expr_stack.remove(node.id.as_str());
        kind.map(|kind| Expression::with_origin(kind, node.id.clone()))
    }

    fn lower_expression_kind(&mut self, node: &'a Node) -> Option<ExpressionKind> {
        match node.kind {
            NodeKind::Literal => {
                let value = node
                    .property(props::VALUE)
                    .map(LiteralValue::from_json)
                    .unwrap_or(LiteralValue::Null);
                let value_type = node
                    .property_str(props::VALUE_TYPE)
                    .unwrap_or(value.type_name())
                    .to_string();
                Some(ExpressionKind::Literal { value, value_type })
            }
            NodeKind::Variable => Some(ExpressionKind::Variable {
                name: node
                    .property_str(props::NAME)
                    .unwrap_or(&node.title)
                    .to_string(),
            }),
            NodeKind::Binary => {
                let operator = node.property_str(props::OPERATOR)?.to_string();
                let left = self.operand_producer(node, pins::LEFT, 0)?;
                let right = self.operand_producer(node, pins::RIGHT, 1)?;
                Some(ExpressionKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            NodeKind::Unary => {
                let operator = node.property_str(props::OPERATOR)?.to_string();
                let operand = self.operand_producer(node, pins::OPERAND, 0)?;
                Some(ExpressionKind::Unary {
                    operator,
                    operand: Box::new(operand),
                })
            }
            NodeKind::Call | NodeKind::Native => self.call_expression_kind(node),
            other => {
                trace!(node = %node.id, kind = other.as_str(), "node kind has no expression form; skipping");
                None
            }
        }
    }

    /// Binary/unary operands resolve by pin name first, falling back to
    /// positional non-exec input order.
    fn operand_producer(
        &mut self,
        node: &'a Node,
        pin_name: &str,
        fallback_index: usize,
    ) -> Option<Expression> {
        let pin = node
            .input_named(pin_name)
            .or_else(|| node.data_inputs().nth(fallback_index))?;
        self.pin_producer(node, pin)
    }

    pub(super) fn call_expression(&mut self, node: &'a Node) -> Option<Expression> {
        self.call_expression_kind(node)
            .map(|kind| Expression::with_origin(kind, node.id.clone()))
    }

    /// Each non-exec input pin's producer becomes a positional argument,
    /// in input-pin order; missing producers are omitted.
    fn call_expression_kind(&mut self, node: &'a Node) -> Option<ExpressionKind> {
        let callee = node
            .property_str(props::CALLEE)
            .unwrap_or(&node.title)
            .to_string();
        let arg_pins: Vec<&Pin> = node.data_inputs().collect();
        let mut arguments = Vec::new();
        for pin in arg_pins {
            if let Some(argument) = self.pin_producer(node, pin) {
                arguments.push(argument);
            }
        }
        Some(ExpressionKind::Call { callee, arguments })
    }
}
