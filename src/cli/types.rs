//! Command-line argument types

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::extract::ExtractArgs;
use super::commands::show::ShowArgs;
use crate::infrastructure::logging::{LogConfig, LogFormat};

/// Top-level command line
#[derive(Parser, Debug)]
#[command(name = "tensor-processor")]
#[command(about = "Bind and inspect TensorFlow processor configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = "TENSOR_PROCESSOR_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Console log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Also write rolling JSON logs into this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Logging configuration from the global flags
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            log_dir: self.log_dir.clone(),
            ..LogConfig::default()
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bind settings and print the resulting processor configuration
    Show(ShowArgs),

    /// Select the inference input from a message and optionally write a result back
    Extract(ExtractArgs),
}
