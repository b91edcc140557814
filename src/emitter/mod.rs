//! AST→Graph conversion.
//!
//! Walks a [`Program`] and emits a fresh blueprint graph with a
//! deterministic layout policy: functions top-to-bottom with double
//! vertical spacing, statements one column right of their parent,
//! expressions one column left of their consumer with operands fanned
//! symmetrically. Origin node ids are reused and the originating AST
//! identifier is stamped on every node so a later graph→AST pass can
//! round-trip identities.

use crate::ast::Program;
use crate::graph::Graph;
use crate::layout::PositionScale;

mod statements;

use statements::GraphBuilder;

#[derive(Debug, Clone)]
pub struct EmitterConfig {
    pub start_x: f64,
    pub start_y: f64,
    pub node_spacing_x: f64,
    pub node_spacing_y: f64,
    /// Place statements with a known source position via the position
    /// scale instead of the layout cursor.
    pub preserve_positions: bool,
    pub position_scale: PositionScale,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            start_y: 100.0,
            node_spacing_x: 200.0,
            node_spacing_y: 120.0,
            preserve_positions: false,
            position_scale: PositionScale::default(),
        }
    }
}

pub struct Emitter {
    config: EmitterConfig,
}

impl Emitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// Converts a program into a fresh graph.
    ///
    /// Infallible: unresolved children produce unconnected pins, not
    /// errors.
    pub fn emit(&self, program: &Program) -> Graph {
        let mut builder = GraphBuilder::new(&self.config);
        for function in &program.functions {
            builder.emit_function(function);
        }
        for variable in &program.variables {
            builder.emit_variable(variable);
        }
        builder.finish(program)
    }
}

/// Converts a program AST into a blueprint graph.
pub fn convert_ast_to_blueprint(program: &Program, config: &EmitterConfig) -> Graph {
    Emitter::new(config.clone()).emit(program)
}
