use super::Graph;
use crate::error::GraphConversionError;

/// A trait for custom editor data models that can be converted into a
/// henkan [`Graph`].
///
/// This is the extension point for making the engine format-agnostic. An
/// editor with its own canvas document format implements `IntoBlueprint`
/// on its top-level struct to provide the translation layer into the
/// canonical graph model the converters operate on.
///
/// # Example
///
/// ```rust,no_run
/// use henkan::graph::{Graph, IntoBlueprint};
/// use henkan::error::GraphConversionError;
///
/// // 1. Define your custom structs for parsing your format.
/// struct MyCanvasNode { id: String, kind: String }
/// struct MyCanvasDocument { nodes: Vec<MyCanvasNode> }
///
/// // 2. Implement `IntoBlueprint` for your top-level struct.
/// impl IntoBlueprint for MyCanvasDocument {
///     fn into_blueprint(self) -> Result<Graph, GraphConversionError> {
///         let graph = Graph::new("g1", "Imported", "script");
///         for node in self.nodes {
///             // Your logic to map `MyCanvasNode` onto `henkan::graph::Node`,
///             // including pins and the property bag.
///             let _ = node;
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoBlueprint {
    /// Consumes the object and converts it into a canonical blueprint graph.
    fn into_blueprint(self) -> Result<Graph, GraphConversionError>;
}
