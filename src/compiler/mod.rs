//! Graph→AST conversion.
//!
//! Walks a blueprint graph starting at its function and callback nodes and
//! reconstructs a [`Program`]: statement sequences from the ordered exec
//! fan-out of each node, expression trees from data-pin producers.
//! Structural gaps (unrecognized kinds, missing producers, dangling
//! connections) are never fatal; the affected element is omitted from the
//! result and the caller receives a partial program.

use crate::ast::{Program, ProgramMetadata};
use crate::graph::{ConnectionIndex, Graph, Node, NodeKind};
use crate::layout::PositionScale;
use ahash::AHashMap;

mod expressions;
mod statements;

use statements::FunctionLowering;

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Reuse a node's stored source-position hint when present.
    pub preserve_positions: bool,
    /// Otherwise derive a synthetic position from canvas coordinates.
    pub generate_positions: bool,
    pub position_scale: PositionScale,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            preserve_positions: true,
            generate_positions: true,
            position_scale: PositionScale::default(),
        }
    }
}

pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Converts a graph into a fresh program.
    ///
    /// Infallible by design: malformed regions of the graph degrade to an
    /// incomplete program rather than an error.
    pub fn compile(&self, graph: &Graph) -> Program {
        let index = ConnectionIndex::new(&graph.connections);
        let nodes: AHashMap<&str, &Node> =
            graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let mut program = Program::new(graph.language.clone());
        program.metadata = ProgramMetadata {
            blueprint_id: Some(graph.id.clone()),
            blueprint_name: Some(graph.name.clone()),
        };

        for node in &graph.nodes {
            if matches!(node.kind, NodeKind::Function | NodeKind::Callback) {
                // Fresh visited set per root: the dedup policy is scoped to
                // one traversal.
                let mut lowering = FunctionLowering::new(&nodes, &index, &self.config);
                program.functions.push(lowering.lower_function(node));
            }
        }

        let mut lowering = FunctionLowering::new(&nodes, &index, &self.config);
        for node in &graph.nodes {
            if node.kind == NodeKind::Variable {
                if let Some(decl) = lowering.lower_variable_decl(node) {
                    program.variables.push(decl);
                }
            }
        }

        program
    }
}

/// Converts a blueprint graph into a program AST.
pub fn convert_blueprint_to_ast(graph: &Graph, config: &CompilerConfig) -> Program {
    Compiler::new(config.clone()).compile(graph)
}
