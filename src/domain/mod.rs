//! Domain layer for the TensorFlow processor configuration
//!
//! This module contains the configuration model and the ports it binds
//! through.

pub mod error;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use error::{
    ConfigError, EvaluationError, ExpressionSyntaxError, OutputError, ResourceResolutionError,
};
