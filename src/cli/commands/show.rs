//! Implementation of the `tensor-processor show` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::SettingsArgs;
use crate::cli::output::{key_value_table, or_unset, output, CommandOutput};
use crate::domain::models::{OutputMode, ProcessorConfig, ResourceLocation};

/// Arguments of `show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Settings sources
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Bound configuration as printed by `show`
#[derive(Debug, Serialize)]
pub struct ShowOutput {
    /// Model locator as configured
    pub model: Option<String>,
    /// Resolved path or URL
    pub model_location: Option<String>,
    /// Whether a local model file exists; `None` for URLs
    pub model_exists: Option<bool>,
    /// Raw `modelFetch`
    pub model_fetch: Option<String>,
    /// `modelFetch` split into operation names
    pub fetch_names: Vec<String>,
    /// Output index of the fetched operation
    pub model_fetch_index: i32,
    /// Output mode
    pub mode: OutputMode,
    /// Effective output name
    pub output_name: Option<String>,
    /// Expression source text
    pub expression: Option<String>,
}

impl From<&ProcessorConfig> for ShowOutput {
    fn from(config: &ProcessorConfig) -> Self {
        let model = config.model();
        Self {
            model: model.map(|m| m.locator().to_string()),
            model_location: model.map(|m| match m.location() {
                ResourceLocation::File(path) | ResourceLocation::Bundled(path) => {
                    path.display().to_string()
                }
                ResourceLocation::Url(url) => url.to_string(),
            }),
            model_exists: model.and_then(|m| m.exists()),
            model_fetch: config.model_fetch().map(str::to_string),
            fetch_names: config.fetch_names().into_iter().map(str::to_string).collect(),
            model_fetch_index: config.model_fetch_index(),
            mode: config.mode(),
            output_name: config.output_name().map(str::to_string),
            expression: config.expression_source().map(str::to_string),
        }
    }
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let model = self.model.as_ref().map(|locator| {
            match (&self.model_location, self.model_exists) {
                (Some(location), Some(false)) => format!("{locator} -> {location} (missing)"),
                (Some(location), _) => format!("{locator} -> {location}"),
                (None, _) => locator.clone(),
            }
        });

        key_value_table([
            ("model", or_unset(model)),
            ("modelFetch", or_unset(self.model_fetch.as_ref())),
            ("modelFetchIndex", self.model_fetch_index.to_string()),
            ("mode", self.mode.to_string()),
            ("outputName", or_unset(self.output_name.as_ref())),
            ("expression", or_unset(self.expression.as_ref())),
        ])
        .to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Load the configuration and print it
pub fn execute(args: ShowArgs, json_mode: bool) -> Result<()> {
    let config = args.settings.loader()?.load()?;
    output(&ShowOutput::from(&config), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::expressions::PathExpressionParser;
    use crate::infrastructure::resources::FileSystemResourceResolver;

    #[test]
    fn test_show_output_from_config() {
        let resolver = FileSystemResourceResolver::new("/srv/app", "/srv/app/resources");
        let config = ProcessorConfig::bind(
            [("model", "https://example.com/m.pb"), ("modelFetch", "a,b"), ("mode", "header")],
            &resolver,
            &PathExpressionParser::new(),
        )
        .unwrap();

        let out = ShowOutput::from(&config);
        assert_eq!(out.model_location.as_deref(), Some("https://example.com/m.pb"));
        assert_eq!(out.model_exists, None);
        assert_eq!(out.fetch_names, vec!["a", "b"]);
        assert_eq!(out.output_name.as_deref(), Some("a,b"));

        let json = out.to_json();
        assert_eq!(json["mode"], "header");
        assert!(out.to_human().contains("modelFetchIndex"));
    }
}
