//! Infrastructure layer: adapters behind the domain ports, configuration
//! sources, and logging.

pub mod config;
pub mod expressions;
pub mod logging;
pub mod resources;
