use crate::ast::SourcePosition;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Pin names shared by both conversion directions.
///
/// The emitter creates pins with these names and the compiler resolves
/// producers and exec chains by looking pins up by name, so the two sides
/// must agree on the vocabulary.
pub mod pins {
    pub const EXEC_IN: &str = "exec";
    pub const BODY: &str = "body";
    pub const THEN: &str = "then";
    pub const ELSE: &str = "else";
    pub const LOOP: &str = "loop";
    pub const CONDITION: &str = "condition";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const VALUE: &str = "value";
    pub const VARIABLE: &str = "variable";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const OPERAND: &str = "operand";
    pub const RESULT: &str = "result";
}

/// Property-bag keys with a meaning fixed by the converters.
pub mod props {
    pub const OPERATOR: &str = "operator";
    pub const VALUE: &str = "value";
    pub const VALUE_TYPE: &str = "valueType";
    pub const NAME: &str = "name";
    pub const CALLEE: &str = "callee";
    pub const DECLARATION: &str = "declaration";
    pub const AST_NODE_ID: &str = "astNodeId";
}

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The closed set of node types a blueprint graph can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Function,
    Variable,
    Constant,
    Call,
    If,
    While,
    For,
    Return,
    Break,
    Continue,
    Assignment,
    Literal,
    Binary,
    Unary,
    Member,
    Index,
    Parameter,
    Event,
    Callback,
    Native,
    Comment,
    Group,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Function => "function",
            NodeKind::Variable => "variable",
            NodeKind::Constant => "constant",
            NodeKind::Call => "call",
            NodeKind::If => "if",
            NodeKind::While => "while",
            NodeKind::For => "for",
            NodeKind::Return => "return",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Assignment => "assignment",
            NodeKind::Literal => "literal",
            NodeKind::Binary => "binary",
            NodeKind::Unary => "unary",
            NodeKind::Member => "member",
            NodeKind::Index => "index",
            NodeKind::Parameter => "parameter",
            NodeKind::Event => "event",
            NodeKind::Callback => "callback",
            NodeKind::Native => "native",
            NodeKind::Comment => "comment",
            NodeKind::Group => "group",
        }
    }
}

/// A pin carries either a data type or one of the two control pseudo-types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PinKind {
    Exec,
    Flow,
    Data(String),
}

impl PinKind {
    /// Both control pseudo-types count as exec for traversal purposes.
    pub fn is_exec(&self) -> bool {
        matches!(self, PinKind::Exec | PinKind::Flow)
    }

    pub fn data_type(&self) -> Option<&str> {
        match self {
            PinKind::Data(ty) => Some(ty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PinDirection {
    Input,
    Output,
    Exec,
}

/// A typed connection point on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PinKind,
    pub direction: PinDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub required: bool,
    /// Cached hint only. Authoritative connectivity is the connection set.
    #[serde(default)]
    pub connected: bool,
}

impl Pin {
    pub fn is_exec(&self) -> bool {
        self.kind.is_exec()
    }
}

/// Back-references a node may carry to its textual counterpart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_position: Option<SourcePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast_node_id: Option<String>,
}

/// A typed unit in the graph. Nodes own their pins; interpretation of the
/// property bag depends on the node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub inputs: Vec<Pin>,
    #[serde(default)]
    pub outputs: Vec<Pin>,
    #[serde(default)]
    pub properties: AHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            position: Position::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            properties: AHashMap::new(),
            metadata: NodeMetadata::default(),
        }
    }

    pub fn input_named(&self, name: &str) -> Option<&Pin> {
        self.inputs.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn output_named(&self, name: &str) -> Option<&Pin> {
        self.outputs.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn first_exec_output(&self) -> Option<&Pin> {
        self.outputs.iter().find(|p| p.is_exec())
    }

    pub fn data_inputs(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().filter(|p| !p.is_exec())
    }

    pub fn first_data_output(&self) -> Option<&Pin> {
        self.outputs.iter().find(|p| !p.is_exec())
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub fn property_bool(&self, key: &str) -> bool {
        self.properties
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// A directed edge from one node's output pin to another node's input pin.
///
/// The output→input invariant is not enforced by the converters; dangling
/// or malformed connections are tolerated and skipped during traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_node: String,
    pub source_pin: String,
    pub target_node: String,
    pub target_pin: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The visual node-and-connection representation of program logic.
///
/// A general directed graph: cycles are possible and traversal code must
/// defend against revisiting nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub id: String,
    pub name: String,
    pub language: String,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metadata: GraphMetadata,
    pub version: u32,
}

impl Graph {
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
            nodes: Vec::new(),
            connections: Vec::new(),
            metadata: GraphMetadata::default(),
            version: 1,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
