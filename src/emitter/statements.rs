use super::EmitterConfig;
use crate::ast::{
    Expression, ExpressionKind, Function, Program, Statement, StatementKind, VariableDecl,
};
use crate::graph::{
    pins, props, Connection, Graph, GraphMetadata, Node, NodeKind, Pin, PinDirection, PinKind,
    Position,
};
use ahash::AHashSet;
use tracing::debug;

fn exec_input(index: usize) -> Pin {
    Pin {
        id: format!("in-{}", index),
        name: pins::EXEC_IN.to_string(),
        kind: PinKind::Exec,
        direction: PinDirection::Input,
        default_value: None,
        required: false,
        connected: false,
    }
}

fn data_input(index: usize, name: &str, ty: &str) -> Pin {
    Pin {
        id: format!("in-{}", index),
        name: name.to_string(),
        kind: PinKind::Data(ty.to_string()),
        direction: PinDirection::Input,
        default_value: None,
        required: false,
        connected: false,
    }
}

fn exec_output(index: usize, name: &str) -> Pin {
    Pin {
        id: format!("out-{}", index),
        name: name.to_string(),
        kind: PinKind::Exec,
        direction: PinDirection::Output,
        default_value: None,
        required: false,
        connected: false,
    }
}

/// Only literal defaults have a JSON representation on a pin.
fn default_json(expression: &Expression) -> Option<serde_json::Value> {
    match &expression.kind {
        ExpressionKind::Literal { value, .. } => Some(value.to_json()),
        _ => None,
    }
}

fn data_output(index: usize, name: &str, ty: &str) -> Pin {
    Pin {
        id: format!("out-{}", index),
        name: name.to_string(),
        kind: PinKind::Data(ty.to_string()),
        direction: PinDirection::Output,
        default_value: None,
        required: false,
        connected: false,
    }
}

pub(super) struct GraphBuilder<'a> {
    config: &'a EmitterConfig,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    used_ids: AHashSet<String>,
    next_node: u32,
    next_connection: u32,
    cursor_y: f64,
}

impl<'a> GraphBuilder<'a> {
    pub(super) fn new(config: &'a EmitterConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            connections: Vec::new(),
            used_ids: AHashSet::new(),
            next_node: 1,
            next_connection: 1,
            cursor_y: config.start_y,
        }
    }

    /// Reuses the originating AST identifier as the node id when it is
    /// free, otherwise allocates a fresh sequential one.
    fn alloc_node_id(&mut self, origin: Option<&String>) -> String {
        if let Some(id) = origin {
            if self.used_ids.insert(id.clone()) {
                return id.clone();
            }
        }
        loop {
            let candidate = format!("n{}", self.next_node);
            self.next_node += 1;
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn connect(&mut self, source_node: &str, source_pin: &str, target_node: &str, target_pin: &str) {
        let id = format!("c{}", self.next_connection);
        self.next_connection += 1;
        self.connections.push(Connection {
            id,
            source_node: source_node.to_string(),
            source_pin: source_pin.to_string(),
            target_node: target_node.to_string(),
            target_pin: target_pin.to_string(),
        });
        self.mark_connected(source_node, source_pin);
        self.mark_connected(target_node, target_pin);
    }

    /// Refreshes the cached `connected` hint; the connection set stays
    /// authoritative.
    fn mark_connected(&mut self, node_id: &str, pin_id: &str) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            if let Some(pin) = node
                .inputs
                .iter_mut()
                .chain(node.outputs.iter_mut())
                .find(|p| p.id == pin_id)
            {
                pin.connected = true;
            }
        }
    }

    pub(super) fn emit_function(&mut self, function: &Function) {
        let id = self.alloc_node_id(function.origin.as_ref());
        let mut node = Node::new(
            id.clone(),
            if function.is_public {
                NodeKind::Function
            } else {
                NodeKind::Callback
            },
            function.name.clone(),
        );
        node.position = Position::new(self.config.start_x, self.cursor_y);
        // Functions reserve double vertical spacing for their body.
        self.cursor_y += self.config.node_spacing_y * 2.0;

        node.inputs.push(exec_input(0));
        for (i, parameter) in function.parameters.iter().enumerate() {
            let mut pin = data_input(i + 1, &parameter.name, &parameter.ty);
            pin.required = parameter.default.is_none();
            pin.default_value = parameter.default.as_ref().and_then(default_json);
            node.inputs.push(pin);
        }
        node.outputs.push(exec_output(0, pins::BODY));
        if function.return_type != "void" {
            node.outputs
                .push(data_output(1, pins::RESULT, &function.return_type));
        }
        self.stamp(&mut node, function.origin.as_ref(), &id);
        self.nodes.push(node);

        self.emit_body(&function.body, &id, "out-0", 1);
    }

    pub(super) fn emit_variable(&mut self, variable: &VariableDecl) {
        let id = self.alloc_node_id(variable.origin.as_ref());
        let mut node = Node::new(id.clone(), NodeKind::Variable, variable.name.clone());
        node.position = Position::new(self.config.start_x, self.cursor_y);
        self.cursor_y += self.config.node_spacing_y;
        node.properties
            .insert(props::NAME.to_string(), serde_json::json!(variable.name));
        node.properties
            .insert(props::DECLARATION.to_string(), serde_json::json!(true));
        node.outputs.push(data_output(0, pins::VALUE, &variable.ty));
        if variable.value.is_some() {
            node.inputs.push(data_input(0, pins::VALUE, &variable.ty));
        }
        let position = node.position;
        self.stamp(&mut node, variable.origin.as_ref(), &id);
        self.nodes.push(node);
        if let Some(value) = &variable.value {
            let producer_position = Position::new(
                position.x - self.config.node_spacing_x,
                position.y,
            );
            self.emit_expression(value, &id, "in-0", producer_position);
        }
    }

    /// Emits a statement sequence as the ordered exec fan-out of
    /// `(source_node, source_pin)`. Blocks flatten into the fan-out; they
    /// have no node of their own.
    fn emit_body(&mut self, statements: &[Statement], source_node: &str, source_pin: &str, depth: usize) {
        for statement in statements {
            if let StatementKind::Block { statements: inner } = &statement.kind {
                self.emit_body(inner, source_node, source_pin, depth);
                continue;
            }
            if let Some((id, exec_pin)) = self.emit_statement(statement, depth) {
                if let Some(exec_pin) = exec_pin {
                    self.connect(source_node, source_pin, &id, &exec_pin);
                }
            }
        }
    }

    fn statement_position(&mut self, statement: &Statement, depth: usize) -> Position {
        if self.config.preserve_positions && !statement.position.is_unset() {
            return self.config.position_scale.to_canvas(statement.position);
        }
        let position = Position::new(
            self.config.start_x + depth as f64 * self.config.node_spacing_x,
            self.cursor_y,
        );
        self.cursor_y += self.config.node_spacing_y;
        position
    }

    /// Returns the emitted node id and its exec-in pin id, when the
    /// statement produced a node that participates in the exec chain.
    fn emit_statement(&mut self, statement: &Statement, depth: usize) -> Option<(String, Option<String>)> {
        let position = self.statement_position(statement, depth);
        match &statement.kind {
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let id = self.push_statement_node(
                    statement,
                    NodeKind::If,
                    "If",
                    position,
                    vec![exec_input(0), data_input(1, pins::CONDITION, "boolean")],
                    vec![exec_output(0, pins::THEN), exec_output(1, pins::ELSE)],
                );
                if let Some(condition) = condition {
                    let producer = Position::new(position.x - self.config.node_spacing_x, position.y);
                    self.emit_expression(condition, &id, "in-1", producer);
                }
                self.emit_branch(then_branch, &id, "out-0", depth + 1);
                self.emit_branch(else_branch, &id, "out-1", depth + 1);
                Some((id, Some("in-0".to_string())))
            }
            StatementKind::While { condition, body } => {
                let id = self.push_statement_node(
                    statement,
                    NodeKind::While,
                    "While",
                    position,
                    vec![exec_input(0), data_input(1, pins::CONDITION, "boolean")],
                    vec![exec_output(0, pins::LOOP)],
                );
                if let Some(condition) = condition {
                    let producer = Position::new(position.x - self.config.node_spacing_x, position.y);
                    self.emit_expression(condition, &id, "in-1", producer);
                }
                self.emit_body(body, &id, "out-0", depth + 1);
                Some((id, Some("in-0".to_string())))
            }
            StatementKind::For {
                init,
                condition,
                update,
                body,
            } => {
                let id = self.push_statement_node(
                    statement,
                    NodeKind::For,
                    "For",
                    position,
                    vec![
                        exec_input(0),
                        data_input(1, pins::START, "number"),
                        data_input(2, pins::END, "number"),
                    ],
                    vec![exec_output(0, pins::LOOP)],
                );
                if update.is_some() {
                    // No Update pin exists in this graph schema.
                    debug!(statement = ?statement.origin, "for-loop update expression has no pin; dropped");
                }
                let producer_x = position.x - self.config.node_spacing_x;
                if let Some(init) = init {
                    let offset = self.fan_offset(0, 2);
                    self.emit_expression(init, &id, "in-1", Position::new(producer_x, position.y + offset));
                }
                if let Some(condition) = condition {
                    let offset = self.fan_offset(1, 2);
                    self.emit_expression(condition, &id, "in-2", Position::new(producer_x, position.y + offset));
                }
                self.emit_body(body, &id, "out-0", depth + 1);
                Some((id, Some("in-0".to_string())))
            }
            StatementKind::Return { value } => {
                let id = self.push_statement_node(
                    statement,
                    NodeKind::Return,
                    "Return",
                    position,
                    vec![exec_input(0), data_input(1, pins::VALUE, "any")],
                    Vec::new(),
                );
                if let Some(value) = value {
                    let producer = Position::new(position.x - self.config.node_spacing_x, position.y);
                    self.emit_expression(value, &id, "in-1", producer);
                }
                Some((id, Some("in-0".to_string())))
            }
            StatementKind::Assignment {
                target,
                operator,
                value,
            } => {
                let id = self.push_statement_node(
                    statement,
                    NodeKind::Assignment,
                    "Assign",
                    position,
                    vec![
                        exec_input(0),
                        data_input(1, pins::VARIABLE, "any"),
                        data_input(2, pins::VALUE, "any"),
                    ],
                    Vec::new(),
                );
                if let Some(node) = self.nodes.last_mut() {
                    node.properties
                        .insert(props::OPERATOR.to_string(), serde_json::json!(operator));
                }
                let producer_x = position.x - self.config.node_spacing_x;
                let target_offset = self.fan_offset(0, 2);
                self.emit_expression(target, &id, "in-1", Position::new(producer_x, position.y + target_offset));
                let value_offset = self.fan_offset(1, 2);
                self.emit_expression(value, &id, "in-2", Position::new(producer_x, position.y + value_offset));
                Some((id, Some("in-0".to_string())))
            }
            StatementKind::Expression { expression } => {
                if let ExpressionKind::Call { callee, arguments } = &expression.kind {
                    let mut inputs = vec![exec_input(0)];
                    for (i, _) in arguments.iter().enumerate() {
                        inputs.push(data_input(i + 1, &format!("arg{}", i), "any"));
                    }
                    let id = self.push_statement_node(
                        statement,
                        NodeKind::Call,
                        callee,
                        position,
                        inputs,
                        vec![data_output(0, pins::RESULT, "any")],
                    );
                    if let Some(node) = self.nodes.last_mut() {
                        node.properties
                            .insert(props::CALLEE.to_string(), serde_json::json!(callee));
                    }
                    let producer_x = position.x - self.config.node_spacing_x;
                    for (i, argument) in arguments.iter().enumerate() {
                        let offset = self.fan_offset(i, arguments.len());
                        self.emit_expression(
                            argument,
                            &id,
                            &format!("in-{}", i + 1),
                            Position::new(producer_x, position.y + offset),
                        );
                    }
                    Some((id, Some("in-0".to_string())))
                } else {
                    // A bare non-call expression statement has no exec-in;
                    // its node is emitted outside the exec chain.
                    debug!("expression statement without call form; emitted unconnected");
                    self.emit_expression_node(expression, position);
                    None
                }
            }
            StatementKind::Block { .. } => None, // flattened by emit_body
        }
    }

    fn emit_branch(
        &mut self,
        branch: &Option<Box<Statement>>,
        source_node: &str,
        source_pin: &str,
        depth: usize,
    ) {
        if let Some(statement) = branch {
            let statements = std::slice::from_ref(statement.as_ref());
            self.emit_body(statements, source_node, source_pin, depth);
        }
    }

    fn push_statement_node(
        &mut self,
        statement: &Statement,
        kind: NodeKind,
        title: &str,
        position: Position,
        inputs: Vec<Pin>,
        outputs: Vec<Pin>,
    ) -> String {
        let id = self.alloc_node_id(statement.origin.as_ref());
        let mut node = Node::new(id.clone(), kind, title);
        node.position = position;
        node.inputs = inputs;
        node.outputs = outputs;
        if !statement.position.is_unset() {
            node.metadata.source_position = Some(statement.position);
        }
        self.stamp(&mut node, statement.origin.as_ref(), &id);
        self.nodes.push(node);
        id
    }

    /// Operands of an n-ary expression fan out symmetrically around the
    /// parent's Y.
    fn fan_offset(&self, index: usize, count: usize) -> f64 {
        (index as f64 - (count as f64 - 1.0) / 2.0) * self.config.node_spacing_y * 0.5
    }

    /// Emits the producer node for `expression` and connects it into
    /// `(consumer_node, consumer_pin)`.
    fn emit_expression(
        &mut self,
        expression: &Expression,
        consumer_node: &str,
        consumer_pin: &str,
        position: Position,
    ) {
        let id = self.emit_expression_node(expression, position);
        self.connect(&id, "out-0", consumer_node, consumer_pin);
    }

    fn emit_expression_node(&mut self, expression: &Expression, position: Position) -> String {
        let id = self.alloc_node_id(expression.origin.as_ref());
        let producer_x = position.x - self.config.node_spacing_x;
        let mut node = match &expression.kind {
            ExpressionKind::Literal { value, value_type } => {
                let mut node = Node::new(id.clone(), NodeKind::Literal, value.to_string());
                node.properties
                    .insert(props::VALUE.to_string(), value.to_json());
                node.properties
                    .insert(props::VALUE_TYPE.to_string(), serde_json::json!(value_type));
                node.outputs.push(data_output(0, pins::VALUE, value_type));
                node
            }
            ExpressionKind::Variable { name } => {
                let mut node = Node::new(id.clone(), NodeKind::Variable, name.clone());
                node.properties
                    .insert(props::NAME.to_string(), serde_json::json!(name));
                node.outputs.push(data_output(0, pins::VALUE, "any"));
                node
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => {
                let mut node = Node::new(id.clone(), NodeKind::Binary, operator.clone());
                node.properties
                    .insert(props::OPERATOR.to_string(), serde_json::json!(operator));
                node.inputs.push(data_input(0, pins::LEFT, "any"));
                node.inputs.push(data_input(1, pins::RIGHT, "any"));
                node.outputs.push(data_output(0, pins::RESULT, "any"));
                node.position = position;
                self.stamp(&mut node, expression.origin.as_ref(), &id);
                self.nodes.push(node);
                let left_offset = self.fan_offset(0, 2);
                self.emit_expression(left, &id, "in-0", Position::new(producer_x, position.y + left_offset));
                let right_offset = self.fan_offset(1, 2);
                self.emit_expression(right, &id, "in-1", Position::new(producer_x, position.y + right_offset));
                return id;
            }
            ExpressionKind::Unary { operator, operand } => {
                let mut node = Node::new(id.clone(), NodeKind::Unary, operator.clone());
                node.properties
                    .insert(props::OPERATOR.to_string(), serde_json::json!(operator));
                node.inputs.push(data_input(0, pins::OPERAND, "any"));
                node.outputs.push(data_output(0, pins::RESULT, "any"));
                node.position = position;
                self.stamp(&mut node, expression.origin.as_ref(), &id);
                self.nodes.push(node);
                self.emit_expression(operand, &id, "in-0", Position::new(producer_x, position.y));
                return id;
            }
            ExpressionKind::Call { callee, arguments } => {
                let mut node = Node::new(id.clone(), NodeKind::Call, callee.clone());
                node.properties
                    .insert(props::CALLEE.to_string(), serde_json::json!(callee));
                for (i, _) in arguments.iter().enumerate() {
                    node.inputs.push(data_input(i, &format!("arg{}", i), "any"));
                }
                node.outputs.push(data_output(0, pins::RESULT, "any"));
                node.position = position;
                self.stamp(&mut node, expression.origin.as_ref(), &id);
                self.nodes.push(node);
                for (i, argument) in arguments.iter().enumerate() {
                    let offset = self.fan_offset(i, arguments.len());
                    self.emit_expression(
                        argument,
                        &id,
                        &format!("in-{}", i),
                        Position::new(producer_x, position.y + offset),
                    );
                }
                return id;
            }
        };
        node.position = position;
        self.stamp(&mut node, expression.origin.as_ref(), &id);
        self.nodes.push(node);
        id
    }

    /// Round-trip traceability: the originating AST identifier lands in
    /// both the property bag and the metadata back-reference.
    fn stamp(&self, node: &mut Node, origin: Option<&String>, fallback: &str) {
        let ast_id = origin.map(String::as_str).unwrap_or(fallback);
        node.properties
            .insert(props::AST_NODE_ID.to_string(), serde_json::json!(ast_id));
        node.metadata.ast_node_id = Some(ast_id.to_string());
    }

    pub(super) fn finish(self, program: &Program) -> Graph {
        Graph {
            id: program
                .metadata
                .blueprint_id
                .clone()
                .unwrap_or_else(|| "blueprint-1".to_string()),
            name: program
                .metadata
                .blueprint_name
                .clone()
                .unwrap_or_else(|| "Blueprint".to_string()),
            language: program.language.clone(),
            nodes: self.nodes,
            connections: self.connections,
            metadata: GraphMetadata::default(),
            version: 1,
        }
    }
}
