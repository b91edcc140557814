pub mod expression;
pub mod program;
pub mod statement;
pub mod value;

pub use expression::*;
pub use program::*;
pub use statement::*;
pub use value::*;
