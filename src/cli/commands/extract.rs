//! Implementation of the `tensor-processor extract` command.
//!
//! Runs the processor's message contract without a model: select the
//! inference input from a message and, given a result, write it back the way
//! the configured output mode says.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tokio::fs;

use super::SettingsArgs;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Message;

/// Arguments of `extract`
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Settings sources
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Message as JSON ({"payload": .., "headers": {..}}), or @FILE
    #[arg(short, long)]
    pub message: String,

    /// Inference result as JSON, or @FILE, to write into the message
    #[arg(short, long)]
    pub result: Option<String>,
}

/// Selected input and, when a result was given, the updated message
#[derive(Debug, Serialize)]
pub struct ExtractOutput {
    /// Inference input selected from the message
    pub input: Value,
    /// Message with the result written back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Message>,
}

impl CommandOutput for ExtractOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Input:\n{}", pretty(&self.input))];
        if let Some(message) = &self.output {
            lines.push(format!("\nOutput message:\n{}", pretty(message)));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Inline JSON, or the contents of the file named after `@`
async fn read_json_argument(raw: &str) -> Result<String> {
    match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {path}")),
        None => Ok(raw.to_string()),
    }
}

/// Run `extract` against the loaded configuration
pub async fn execute(args: ExtractArgs, json_mode: bool) -> Result<()> {
    let config = args.settings.loader()?.load()?;

    let message: Message = serde_json::from_str(&read_json_argument(&args.message).await?)
        .context("Failed to parse message JSON")?;

    let input = config
        .extract_input(&message)
        .context("Failed to select inference input")?;
    tracing::debug!(expression = ?config.expression_source(), "selected inference input");

    let output_message = match args.result {
        Some(raw) => {
            let result: Value = serde_json::from_str(&read_json_argument(&raw).await?)
                .context("Failed to parse result JSON")?;
            Some(config.write_output(message, result)?)
        }
        None => None,
    };

    output(
        &ExtractOutput {
            input,
            output: output_message,
        },
        json_mode,
    );
    Ok(())
}
