//! Tests for graph→AST reconstruction.
mod common;
use common::*;
use henkan::prelude::*;

#[test]
fn test_branch_graph_reconstructs_if_statement() {
    let graph = create_branch_graph();
    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());

    assert_eq!(program.functions.len(), 1);
    let function = &program.functions[0];
    assert_eq!(function.name, "f");
    assert_eq!(function.parameters.len(), 0);
    assert_eq!(function.return_type, "void");
    assert_eq!(function.body.len(), 1);

    let StatementKind::If {
        condition,
        then_branch,
        else_branch,
    } = &function.body[0].kind
    else {
        panic!("expected an if statement");
    };

    let condition = condition.as_ref().expect("condition producer");
    let ExpressionKind::Binary {
        operator,
        left,
        right,
    } = &condition.kind
    else {
        panic!("expected a binary condition");
    };
    assert_eq!(operator, ">");
    assert_eq!(left.kind, ExpressionKind::Variable { name: "x".to_string() });
    assert_eq!(
        right.kind,
        ExpressionKind::Literal {
            value: LiteralValue::Number(0.0),
            value_type: "number".to_string(),
        }
    );

    // Single statements are stored unwrapped, not inside a block.
    let then_branch = then_branch.as_ref().expect("then branch");
    assert_eq!(
        then_branch.kind,
        StatementKind::Return {
            value: Some(Expression::with_origin(
                ExpressionKind::Literal {
                    value: LiteralValue::Number(1.0),
                    value_type: "number".to_string(),
                },
                "lit-one",
            )),
        }
    );
    let else_branch = else_branch.as_ref().expect("else branch");
    assert_eq!(else_branch.kind_name(), "return");
    assert_eq!(else_branch.origin.as_deref(), Some("ret-zero"));
}

#[test]
fn test_loop_graph_reconstructs_while_statement() {
    let graph = create_loop_graph();
    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());

    let function = &program.functions[0];
    assert_eq!(function.name, "g");
    assert_eq!(function.body.len(), 1);

    let StatementKind::While { condition, body } = &function.body[0].kind else {
        panic!("expected a while statement");
    };
    assert!(condition.is_some());
    assert_eq!(body.len(), 1);
    let StatementKind::Expression { expression } = &body[0].kind else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Call { callee, arguments } = &expression.kind else {
        panic!("expected a call expression");
    };
    assert_eq!(callee, "log");
    assert_eq!(arguments.len(), 1);
    assert_eq!(
        arguments[0].kind,
        ExpressionKind::Literal {
            value: LiteralValue::String("hi".to_string()),
            value_type: "string".to_string(),
        }
    );
}

#[test]
fn test_parameters_and_return_type_from_pins() {
    let mut function_node = node(
        "fn-h",
        NodeKind::Function,
        "h",
        vec![exec_in(), data_in(1, "count", "number"), data_in(2, "label", "string")],
        vec![exec_out(0, "body"), data_out(1, "result", "number")],
    );
    function_node.inputs[2].default_value = Some(serde_json::json!("item"));
    let graph = graph_with(vec![function_node], vec![]);

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    let function = &program.functions[0];

    assert_eq!(function.return_type, "number");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[0].name, "count");
    assert_eq!(function.parameters[0].ty, "number");
    assert!(function.parameters[0].default.is_none());
    assert_eq!(function.parameters[1].name, "label");
    assert_eq!(
        function.parameters[1].default,
        Some(Expression::literal(LiteralValue::String("item".to_string())))
    );
}

#[test]
fn test_diamond_control_flow_converts_shared_node_once() {
    // Both exec branches of the if reach the same return node; the second
    // path finds it already converted and drops it.
    let graph = graph_with(
        vec![
            node(
                "fn-f",
                NodeKind::Function,
                "f",
                vec![exec_in()],
                vec![exec_out(0, "body")],
            ),
            node(
                "if-1",
                NodeKind::If,
                "If",
                vec![exec_in(), data_in(1, "condition", "boolean")],
                vec![exec_out(0, "then"), exec_out(1, "else")],
            ),
            node(
                "ret-shared",
                NodeKind::Return,
                "Return",
                vec![exec_in(), data_in(1, "value", "any")],
                vec![],
            ),
        ],
        vec![
            connect("c1", ("fn-f", "out-0"), ("if-1", "in-0")),
            connect("c2", ("if-1", "out-0"), ("ret-shared", "in-0")),
            connect("c3", ("if-1", "out-1"), ("ret-shared", "in-0")),
        ],
    );

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    let StatementKind::If {
        then_branch,
        else_branch,
        ..
    } = &program.functions[0].body[0].kind
    else {
        panic!("expected an if statement");
    };
    assert!(then_branch.is_some());
    assert!(else_branch.is_none());
}

#[test]
fn test_unrecognized_statement_head_is_skipped() {
    let graph = graph_with(
        vec![
            node(
                "fn-f",
                NodeKind::Function,
                "f",
                vec![exec_in()],
                vec![exec_out(0, "body")],
            ),
            node("note", NodeKind::Comment, "fixme", vec![exec_in()], vec![]),
            node(
                "brk",
                NodeKind::Break,
                "Break",
                vec![exec_in()],
                vec![],
            ),
        ],
        vec![
            connect("c1", ("fn-f", "out-0"), ("note", "in-0")),
            connect("c2", ("fn-f", "out-0"), ("brk", "in-0")),
        ],
    );

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    assert_eq!(program.functions[0].body.len(), 0);
}

#[test]
fn test_assignment_with_missing_producer_is_dropped() {
    let graph = graph_with(
        vec![
            node(
                "fn-f",
                NodeKind::Function,
                "f",
                vec![exec_in()],
                vec![exec_out(0, "body")],
            ),
            node(
                "assign",
                NodeKind::Assignment,
                "Assign",
                vec![
                    exec_in(),
                    data_in(1, "variable", "any"),
                    data_in(2, "value", "any"),
                ],
                vec![],
            ),
        ],
        vec![connect("c1", ("fn-f", "out-0"), ("assign", "in-0"))],
    );

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    assert_eq!(program.functions[0].body.len(), 0);
}

#[test]
fn test_dangling_connections_are_tolerated() {
    let graph = graph_with(
        vec![node(
            "fn-f",
            NodeKind::Function,
            "f",
            vec![exec_in()],
            vec![exec_out(0, "body")],
        )],
        vec![
            connect("c1", ("fn-f", "out-0"), ("missing-node", "in-0")),
            connect("c2", ("other-missing", "out-0"), ("fn-f", "in-0")),
        ],
    );

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.functions[0].body.len(), 0);
}

#[test]
fn test_data_flow_cycle_is_broken() {
    // The binary node feeds itself; recursion must stop instead of
    // looping, and the condition is omitted.
    let graph = graph_with(
        vec![
            node(
                "fn-f",
                NodeKind::Function,
                "f",
                vec![exec_in()],
                vec![exec_out(0, "body")],
            ),
            node(
                "if-1",
                NodeKind::If,
                "If",
                vec![exec_in(), data_in(1, "condition", "boolean")],
                vec![exec_out(0, "then"), exec_out(1, "else")],
            ),
            with_prop(
                node(
                    "bin-loop",
                    NodeKind::Binary,
                    "+",
                    vec![data_in(0, "left", "number"), data_in(1, "right", "number")],
                    vec![data_out(0, "result", "number")],
                ),
                "operator",
                serde_json::json!("+"),
            ),
        ],
        vec![
            connect("c1", ("fn-f", "out-0"), ("if-1", "in-0")),
            connect("c2", ("bin-loop", "out-0"), ("if-1", "in-1")),
            connect("c3", ("bin-loop", "out-0"), ("bin-loop", "in-0")),
            connect("c4", ("bin-loop", "out-0"), ("bin-loop", "in-1")),
        ],
    );

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    let StatementKind::If { condition, .. } = &program.functions[0].body[0].kind else {
        panic!("expected an if statement");
    };
    assert!(condition.is_none());
}

#[test]
fn test_generated_positions_use_canvas_heuristic() {
    let mut graph = create_branch_graph();
    if let Some(if_node) = graph.nodes.iter_mut().find(|n| n.id == "if-1") {
        if_node.position = Position::new(100.0, 250.0);
    }

    let config = CompilerConfig {
        preserve_positions: false,
        generate_positions: true,
        ..CompilerConfig::default()
    };
    let program = convert_blueprint_to_ast(&graph, &config);
    // y/50 → line, x/10 → column
    assert_eq!(program.functions[0].body[0].position, SourcePosition::new(5, 10));
}

#[test]
fn test_preserved_positions_win_over_heuristic() {
    let mut graph = create_branch_graph();
    if let Some(if_node) = graph.nodes.iter_mut().find(|n| n.id == "if-1") {
        if_node.position = Position::new(100.0, 250.0);
        if_node.metadata.source_position = Some(SourcePosition::new(12, 4));
    }

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    assert_eq!(program.functions[0].body[0].position, SourcePosition::new(12, 4));
}

#[test]
fn test_top_level_variable_declarations_are_collected() {
    let graph = graph_with(
        vec![
            with_prop(
                with_prop(
                    node(
                        "var-total",
                        NodeKind::Variable,
                        "total",
                        vec![],
                        vec![data_out(0, "value", "number")],
                    ),
                    "name",
                    serde_json::json!("total"),
                ),
                "declaration",
                serde_json::json!(true),
            ),
            // A plain variable reference is not a declaration.
            with_prop(
                node(
                    "var-ref",
                    NodeKind::Variable,
                    "other",
                    vec![],
                    vec![data_out(0, "value", "number")],
                ),
                "name",
                serde_json::json!("other"),
            ),
        ],
        vec![],
    );

    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    assert_eq!(program.variables.len(), 1);
    assert_eq!(program.variables[0].name, "total");
    assert_eq!(program.variables[0].ty, "number");
}

#[test]
fn test_program_metadata_backreferences_graph() {
    let graph = create_branch_graph();
    let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
    assert_eq!(program.metadata.blueprint_id.as_deref(), Some("g1"));
    assert_eq!(
        program.metadata.blueprint_name.as_deref(),
        Some("Test Blueprint")
    );
    assert_eq!(program.language, "script");
}
