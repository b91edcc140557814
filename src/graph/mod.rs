pub mod convert;
pub mod document;
pub mod index;
pub mod model;

pub use convert::*;
pub use index::*;
pub use model::*;
