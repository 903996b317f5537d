//! Expression language adapters

pub mod path_expression;

pub use path_expression::{PathExpression, PathExpressionParser, Segment};
