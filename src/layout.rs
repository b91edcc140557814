use crate::ast::SourcePosition;
use crate::graph::Position;
use serde::{Deserialize, Serialize};

/// The canvas↔source coordinate heuristic.
///
/// One canvas unit grid maps onto source lines/columns with a fixed,
/// lossy scale (y/50 → line, x/10 → column). Both converters go through
/// this one type so the scale can be replaced without touching converter
/// logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionScale {
    pub units_per_line: f64,
    pub units_per_column: f64,
}

impl Default for PositionScale {
    fn default() -> Self {
        Self {
            units_per_line: 50.0,
            units_per_column: 10.0,
        }
    }
}

impl PositionScale {
    /// Derives a synthetic source position from canvas coordinates.
    pub fn to_source(&self, position: Position) -> SourcePosition {
        SourcePosition {
            line: (position.y / self.units_per_line).max(0.0) as u32,
            column: (position.x / self.units_per_column).max(0.0) as u32,
        }
    }

    /// Places a source position back onto the canvas.
    pub fn to_canvas(&self, position: SourcePosition) -> Position {
        Position {
            x: position.column as f64 * self.units_per_column,
            y: position.line as f64 * self.units_per_line,
        }
    }
}
