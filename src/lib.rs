//! Tensor Processor - configuration for a TensorFlow stream processor
//!
//! Binds named settings (YAML file, `TENSORFLOW_*` environment variables,
//! command-line overrides) into an immutable [`ProcessorConfig`]: where the
//! model lives, which output to fetch, where the result goes, and which part
//! of the incoming message feeds the model.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): the configuration model and its ports
//! - **Infrastructure Layer** (`infrastructure`): figment loader, resource
//!   resolver, expression parser, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use tensor_processor::infrastructure::expressions::PathExpressionParser;
//! use tensor_processor::infrastructure::resources::FileSystemResourceResolver;
//! use tensor_processor::{OutputMode, ProcessorConfig};
//!
//! let resolver = FileSystemResourceResolver::new("/srv/app", "/srv/app/resources");
//! let config = ProcessorConfig::bind(
//!     [("model", "/models/mnist.pb"), ("modelFetch", "output1")],
//!     &resolver,
//!     &PathExpressionParser::new(),
//! )?;
//!
//! assert_eq!(config.mode(), OutputMode::Payload);
//! assert_eq!(config.output_name(), Some("output1"));
//! # Ok::<(), tensor_processor::ConfigError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::error::{
    ConfigError, EvaluationError, ExpressionSyntaxError, OutputError, ResourceResolutionError,
};
pub use domain::models::{
    Message, OutputMode, ProcessorConfig, ResourceHandle, ResourceLocation, SettingKey,
};
pub use domain::ports::{Expression, ExpressionParser, ResourceResolver};
pub use infrastructure::config::ConfigLoader;
