//! CLI command implementations.

pub mod extract;
pub mod show;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::infrastructure::config::ConfigLoader;

/// Where settings come from, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// YAML configuration file (defaults to ./application.yaml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override a setting, e.g. --set modelFetch=output1 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub overrides: Vec<(String, String)>,
}

impl SettingsArgs {
    /// Loader over the default collaborators with these sources applied
    pub fn loader(&self) -> Result<ConfigLoader> {
        let mut loader =
            ConfigLoader::with_default_collaborators()?.with_overrides(self.overrides.clone());
        if let Some(path) = &self.config {
            loader = loader.with_file(path);
        }
        Ok(loader)
    }
}

/// Parse a `KEY=VALUE` pair; the value may itself contain `=`
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("modelFetch=output1"),
            Ok(("modelFetch".to_string(), "output1".to_string()))
        );
        assert_eq!(
            parse_key_value("expression=headers['a=b']"),
            Ok(("expression".to_string(), "headers['a=b']".to_string()))
        );
        assert_eq!(parse_key_value("outputName="), Ok(("outputName".to_string(), String::new())));
        assert!(parse_key_value("modelFetch").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
