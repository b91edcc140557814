//! # Henkan - Blueprint↔AST Conversion and Synchronization Engine
//!
//! **Henkan** converts between the two faces of a visual scripting system:
//! a blueprint graph (nodes, pins, connections on a canvas) and a program
//! AST (functions, statements, expressions). On top of the two converters
//! sits a [`sync::SyncManager`] that keeps both representations consistent
//! while either one is being edited, using structural hashes for conflict
//! detection and debounced, coalesced change handling.
//!
//! ## Core Workflow
//!
//! 1.  **Load or build a graph**: parse the editor's JSON document with
//!     [`graph::Graph::from_json_str`], or translate a custom canvas
//!     format via the [`graph::IntoBlueprint`] trait.
//! 2.  **Convert**: [`compiler::convert_blueprint_to_ast`] reconstructs a
//!     [`ast::Program`] from the graph; [`emitter::convert_ast_to_blueprint`]
//!     lays a fresh graph out from a program. Both directions tolerate
//!     malformed regions and return partial results instead of failing.
//! 3.  **Synchronize**: hand both kinds of edits to a `SyncManager`. It
//!     debounces bursts, converts in the appropriate direction, detects
//!     two-sided divergence, and notifies subscribers with each freshly
//!     converted value.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use henkan::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // A program with one function: fn answer() { return 42 }
//!     let mut program = Program::new("script");
//!     program.functions.push(Function {
//!         name: "answer".to_string(),
//!         parameters: vec![],
//!         return_type: "number".to_string(),
//!         body: vec![Statement::new(StatementKind::Return {
//!             value: Some(Expression::literal(LiteralValue::Number(42.0))),
//!         })],
//!         is_public: true,
//!         is_static: false,
//!         modifiers: vec![],
//!         origin: None,
//!     });
//!
//!     // Lay the program out as a blueprint graph ...
//!     let graph = convert_ast_to_blueprint(&program, &EmitterConfig::default());
//!     println!("{} nodes, {} connections", graph.nodes.len(), graph.connections.len());
//!
//!     // ... and reconstruct the AST from the graph.
//!     let round_tripped = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
//!     println!("{}", round_tripped);
//!
//!     // Keep the two sides consistent while the editor mutates either one.
//!     let mut manager = SyncManager::default();
//!     let subscription = manager.on_blueprint_change(|graph| {
//!         println!("blueprint regenerated: {} nodes", graph.nodes.len());
//!     });
//!     manager.handle_code_change(round_tripped);
//!     manager.poll(); // fire due debounce timers from the host event loop
//!     manager.unsubscribe(subscription);
//!
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod compiler;
pub mod emitter;
pub mod error;
pub mod graph;
pub mod lang;
pub mod layout;
pub mod prelude;
pub mod sync;
