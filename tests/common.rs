//! Common test utilities for building graphs and programs.
use henkan::prelude::*;

#[allow(dead_code)]
pub fn exec_in() -> Pin {
    Pin {
        id: "in-0".to_string(),
        name: "exec".to_string(),
        kind: PinKind::Exec,
        direction: PinDirection::Input,
        default_value: None,
        required: false,
        connected: false,
    }
}

#[allow(dead_code)]
pub fn data_in(index: usize, name: &str, ty: &str) -> Pin {
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

#[allow(dead_code)]
pub fn exec_out(index: usize, name: &str) -> Pin {
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

#[allow(dead_code)]
pub fn data_out(index: usize, name: &str, ty: &str) -> Pin {
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

#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind, title: &str, inputs: Vec<Pin>, outputs: Vec<Pin>) -> Node {
    let mut node = Node::new(id, kind, title);
    node.inputs = inputs;
    node.outputs = outputs;
    node
}

#[allow(dead_code)]
pub fn with_prop(mut node: Node, key: &str, value: serde_json::Value) -> Node {
    node.properties.insert(key.to_string(), value);
    node
}

#[allow(dead_code)]
pub fn connect(id: &str, source: (&str, &str), target: (&str, &str)) -> Connection {
    Connection {
        id: id.to_string(),
        source_node: source.0.to_string(),
        source_pin: source.1.to_string(),
        target_node: target.0.to_string(),
        target_pin: target.1.to_string(),
    }
}

#[allow(dead_code)]
pub fn graph_with(nodes: Vec<Node>, connections: Vec<Connection>) -> Graph {
    let mut graph = Graph::new("g1", "Test Blueprint", "script");
    graph.nodes = nodes;
    graph.connections = connections;
    graph
}

/// The branch scenario graph:
///
/// `fn f() { if (x > 0) { return 1 } else { return 0 } }`
#[allow(dead_code)]
pub fn create_branch_graph() -> Graph {
    graph_with(
        vec![
            node(
                "fn-f",
                NodeKind::Function,
                "f",
                vec![exec_in()],
                vec![exec_out(0, "body")],
            ),
            with_prop(
                node(
                    "var-x",
                    NodeKind::Variable,
                    "x",
                    vec![],
                    vec![data_out(0, "value", "number")],
                ),
                "name",
                serde_json::json!("x"),
            ),
            with_prop(
                with_prop(
                    node(
                        "lit-zero",
                        NodeKind::Literal,
                        "0",
                        vec![],
                        vec![data_out(0, "value", "number")],
                    ),
                    "value",
                    serde_json::json!(0.0),
                ),
                "valueType",
                serde_json::json!("number"),
            ),
            with_prop(
                node(
                    "bin-gt",
                    NodeKind::Binary,
                    ">",
                    vec![data_in(0, "left", "number"), data_in(1, "right", "number")],
                    vec![data_out(0, "result", "boolean")],
                ),
                "operator",
                serde_json::json!(">"),
            ),
            node(
                "if-1",
                NodeKind::If,
                "If",
                vec![exec_in(), data_in(1, "condition", "boolean")],
                vec![exec_out(0, "then"), exec_out(1, "else")],
            ),
            node(
                "ret-one",
                NodeKind::Return,
                "Return",
                vec![exec_in(), data_in(1, "value", "any")],
                vec![],
            ),
            node(
                "ret-zero",
                NodeKind::Return,
                "Return",
                vec![exec_in(), data_in(1, "value", "any")],
                vec![],
            ),
            with_prop(
                node(
                    "lit-one",
                    NodeKind::Literal,
                    "1",
                    vec![],
                    vec![data_out(0, "value", "number")],
                ),
                "value",
                serde_json::json!(1.0),
            ),
            with_prop(
                node(
                    "lit-zero-2",
                    NodeKind::Literal,
                    "0",
                    vec![],
                    vec![data_out(0, "value", "number")],
                ),
                "value",
                serde_json::json!(0.0),
            ),
        ],
        vec![
            connect("c1", ("fn-f", "out-0"), ("if-1", "in-0")),
            connect("c2", ("var-x", "out-0"), ("bin-gt", "in-0")),
            connect("c3", ("lit-zero", "out-0"), ("bin-gt", "in-1")),
            connect("c4", ("bin-gt", "out-0"), ("if-1", "in-1")),
            connect("c5", ("if-1", "out-0"), ("ret-one", "in-0")),
            connect("c6", ("if-1", "out-1"), ("ret-zero", "in-0")),
            connect("c7", ("lit-one", "out-0"), ("ret-one", "in-1")),
            connect("c8", ("lit-zero-2", "out-0"), ("ret-zero", "in-1")),
        ],
    )
}

/// The same scenario as an AST.
#[allow(dead_code)]
pub fn create_branch_program() -> Program {
    let condition = Expression::new(ExpressionKind::Binary {
        operator: ">".to_string(),
        left: Box::new(Expression::variable("x")),
        right: Box::new(Expression::literal(LiteralValue::Number(0.0))),
    });
    let mut program = Program::new("script");
    program.functions.push(Function {
        name: "f".to_string(),
        parameters: vec![],
        return_type: "void".to_string(),
        body: vec![Statement::new(StatementKind::If {
            condition: Some(condition),
            then_branch: Some(Box::new(Statement::new(StatementKind::Return {
                value: Some(Expression::literal(LiteralValue::Number(1.0))),
            }))),
            else_branch: Some(Box::new(Statement::new(StatementKind::Return {
                value: Some(Expression::literal(LiteralValue::Number(0.0))),
            }))),
        })],
        is_public: true,
        is_static: false,
        modifiers: vec![],
        origin: None,
    });
    program
}

/// A while loop whose body logs a message:
///
/// `fn g() { while (true) { log("hi") } }`
#[allow(dead_code)]
pub fn create_loop_graph() -> Graph {
    graph_with(
        vec![
            node(
                "fn-g",
                NodeKind::Function,
                "g",
                vec![exec_in()],
                vec![exec_out(0, "body")],
            ),
            with_prop(
                node(
                    "lit-true",
                    NodeKind::Literal,
                    "true",
                    vec![],
                    vec![data_out(0, "value", "boolean")],
                ),
                "value",
                serde_json::json!(true),
            ),
            node(
                "while-1",
                NodeKind::While,
                "While",
                vec![exec_in(), data_in(1, "condition", "boolean")],
                vec![exec_out(0, "loop")],
            ),
            node(
                "call-log",
                NodeKind::Call,
                "log",
                vec![exec_in(), data_in(1, "arg0", "string")],
                vec![data_out(0, "result", "any")],
            ),
            with_prop(
                node(
                    "lit-msg",
                    NodeKind::Literal,
                    "\"hi\"",
                    vec![],
                    vec![data_out(0, "value", "string")],
                ),
                "value",
                serde_json::json!("hi"),
            ),
        ],
        vec![
            connect("c1", ("fn-g", "out-0"), ("while-1", "in-0")),
            connect("c2", ("lit-true", "out-0"), ("while-1", "in-1")),
            connect("c3", ("while-1", "out-0"), ("call-log", "in-0")),
            connect("c4", ("lit-msg", "out-0"), ("call-log", "in-1")),
        ],
    )
}

/// A function with a statement sequence: assignment then return.
#[allow(dead_code)]
pub fn create_sequence_program() -> Program {
    let mut program = Program::new("script");
    program.functions.push(Function {
        name: "step".to_string(),
        parameters: vec![Parameter {
            name: "amount".to_string(),
            ty: "number".to_string(),
            default: Some(Expression::literal(LiteralValue::Number(1.0))),
        }],
        return_type: "number".to_string(),
        body: vec![
            Statement::new(StatementKind::Assignment {
                target: Expression::variable("total"),
                operator: "=".to_string(),
                value: Expression::literal(LiteralValue::Number(1.0)),
            }),
            Statement::new(StatementKind::Return {
                value: Some(Expression::variable("total")),
            }),
        ],
        is_public: true,
        is_static: false,
        modifiers: vec![],
        origin: None,
    });
    program
}
