use super::Graph;
use crate::error::DocumentError;
use std::fs;
use std::path::Path;

impl Graph {
    /// Serializes the graph to its JSON document form
    /// (`{id, name, language, nodes, connections, metadata, version}`).
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Json(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::Json(e.to_string()))
    }

    /// Writes the JSON document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads a graph from a JSON document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| DocumentError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }
}
