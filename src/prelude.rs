//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! henkan crate. Import this module to get access to the core
//! functionality without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use henkan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a blueprint graph document and convert it to an AST
//! let graph = Graph::load("path/to/blueprint.json")?;
//! let program = convert_blueprint_to_ast(&graph, &CompilerConfig::default());
//! println!("{}", program);
//!
//! // Keep both sides in sync as either one is edited
//! let mut manager = SyncManager::default();
//! manager.handle_blueprint_change(graph);
//! manager.poll();
//! # Ok(())
//! # }
//! ```

// Graph model and lookup
pub use crate::graph::{
    Connection, ConnectionIndex, Graph, GraphMetadata, IntoBlueprint, Node, NodeKind, Pin,
    PinDirection, PinKind, Position,
};

// AST model
pub use crate::ast::{
    Expression, ExpressionKind, Function, LiteralValue, Parameter, Program, SourcePosition,
    Statement, StatementKind, VariableDecl,
};

// Converters
pub use crate::compiler::{convert_blueprint_to_ast, Compiler, CompilerConfig};
pub use crate::emitter::{convert_ast_to_blueprint, Emitter, EmitterConfig};
pub use crate::layout::PositionScale;

// Synchronization
pub use crate::sync::{
    Conflict, ConflictResolution, SyncDirection, SyncManager, SyncPreferences,
    SyncPreferencesUpdate,
};

// Error types
pub use crate::error::{DocumentError, GraphConversionError, SyncError};

// Standard library re-exports commonly used with this crate
pub use std::collections::HashMap;
pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
