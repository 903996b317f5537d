//! Error types for configuration binding and message processing

use thiserror::Error;

/// A model locator that could not be turned into a resource handle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot resolve resource '{locator}': {reason}")]
pub struct ResourceResolutionError {
    /// Locator as it was configured
    pub locator: String,
    /// Why it was rejected
    pub reason: String,
}

impl ResourceResolutionError {
    /// Create a resolution error for `locator`
    pub fn new(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            reason: reason.into(),
        }
    }
}

/// Expression source text rejected by the expression parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid expression '{expression}' at position {position}: {message}")]
pub struct ExpressionSyntaxError {
    /// The rejected source text
    pub expression: String,
    /// Character offset into `expression` where parsing failed
    pub position: usize,
    /// What the parser expected or found
    pub message: String,
}

/// Errors raised while binding settings into a processor configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting value of the wrong shape, such as a non-numeric index
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidConfiguration {
        /// Canonical setting name
        key: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The `model` locator could not be resolved
    #[error(transparent)]
    ResourceResolution(#[from] ResourceResolutionError),

    /// The `expression` setting does not parse
    #[error(transparent)]
    ExpressionSyntax(#[from] ExpressionSyntaxError),
}

impl ConfigError {
    pub(crate) fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while evaluating an expression against a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// An object has no property of that name
    #[error("Property '{property}' not found on {path}")]
    PropertyNotFound {
        /// Path evaluated so far
        path: String,
        /// Missing property
        property: String,
    },

    /// An array index past the end
    #[error("Index {index} out of bounds for {path} (length {len})")]
    IndexOutOfBounds {
        /// Path evaluated so far
        path: String,
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// An accessor applied to a value that does not support it
    #[error("Cannot apply {accessor} to {path}: value is {found}")]
    TypeMismatch {
        /// Path evaluated so far
        path: String,
        /// Accessor as written, e.g. `.name` or `[0]`
        accessor: String,
        /// Kind of value found instead
        found: &'static str,
    },
}

/// Errors raised while writing an inference result into a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// Header mode with no name to write the header under
    #[error("Header output mode requires 'outputName' or 'modelFetch' to be set")]
    MissingOutputName,
}
