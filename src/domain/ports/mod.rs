//! Port trait definitions
//!
//! Collaborators the processor configuration depends on but does not own:
//! - ResourceResolver: model locator resolution
//! - ExpressionParser / Expression: the input-selection expression language

pub mod expression;
pub mod resource_resolver;

pub use expression::{Expression, ExpressionParser};
pub use resource_resolver::ResourceResolver;
