//! Expression language port

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::error::{EvaluationError, ExpressionSyntaxError};
use crate::domain::models::Message;

/// A parsed expression over message data
///
/// The concrete expression language is pluggable; the processor only needs
/// the source text back and a way to evaluate against a message.
pub trait Expression: Debug + Send + Sync {
    /// The source text this expression was parsed from
    fn source_text(&self) -> &str;

    /// Evaluate the expression with the message as root object
    fn evaluate(&self, message: &Message) -> Result<Value, EvaluationError>;
}

/// Port for parsing expression source text
pub trait ExpressionParser: Send + Sync {
    /// Parse `source`, reporting the position of the first syntax error
    fn parse(&self, source: &str) -> Result<Arc<dyn Expression>, ExpressionSyntaxError>;
}
