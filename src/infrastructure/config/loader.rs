//! Layered configuration loading

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::relaxed::RelaxedKeys;
use crate::domain::error::ConfigError;
use crate::domain::models::{ProcessorConfig, SETTINGS_PREFIX};
use crate::domain::ports::{ExpressionParser, ResourceResolver};
use crate::infrastructure::expressions::PathExpressionParser;
use crate::infrastructure::resources::FileSystemResourceResolver;

/// Configuration file read when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "application.yaml";

/// Prefix of environment variables carrying processor settings
pub const ENV_PREFIX: &str = "TENSORFLOW_";

/// Shape every source is merged into: settings live under `tensorflow:`
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    tensorflow: BTreeMap<String, Value>,
}

/// Configuration loader with hierarchical merging
///
/// Precedence (lowest to highest):
/// 1. Programmatic defaults (Serialized)
/// 2. YAML file (`application.yaml` unless another one is given)
/// 3. Environment variables (`TENSORFLOW_*` prefix)
/// 4. Explicit overrides (`--set key=value` on the command line)
///
/// Keys of every source go through relaxed matching before the merge, so
/// `TENSORFLOW_MODEL_FETCH` overrides `modelFetch` from the file.
pub struct ConfigLoader {
    resolver: Arc<dyn ResourceResolver>,
    parser: Arc<dyn ExpressionParser>,
    config_file: PathBuf,
    file_required: bool,
    overrides: BTreeMap<String, String>,
}

impl ConfigLoader {
    /// Loader reading the default file, binding through the given collaborators
    pub fn new(resolver: Arc<dyn ResourceResolver>, parser: Arc<dyn ExpressionParser>) -> Self {
        Self {
            resolver,
            parser,
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            file_required: false,
            overrides: BTreeMap::new(),
        }
    }

    /// Loader resolving models against the working directory and parsing
    /// expressions as property paths
    pub fn with_default_collaborators() -> Result<Self> {
        let resolver = FileSystemResourceResolver::from_current_dir()?;
        Ok(Self::new(Arc::new(resolver), Arc::new(PathExpressionParser::new())))
    }

    /// Read settings from `path` instead of the default file; the file must exist
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = path.as_ref().to_path_buf();
        self.file_required = true;
        self
    }

    /// Add overrides that win over every other source
    ///
    /// Keys may carry the `tensorflow.` prefix or not.
    #[must_use]
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The merged figment, before extraction
    pub fn figment(&self) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(SettingsDocument::default()))
            .merge(RelaxedKeys::new(Yaml::file(&self.config_file)))
            .merge(RelaxedKeys::new(Serialized::default(SETTINGS_PREFIX, env_settings())))
            .merge(RelaxedKeys::new(Serialized::default(
                SETTINGS_PREFIX,
                self.overrides.clone(),
            )))
    }

    /// Merged settings as the flat string map `ProcessorConfig::bind` takes
    pub fn settings(&self) -> Result<BTreeMap<String, String>> {
        if self.file_required && !self.config_file.exists() {
            anyhow::bail!("Configuration file not found: {}", self.config_file.display());
        }

        let document: SettingsDocument = self
            .figment()
            .extract()
            .context("Failed to extract processor settings from figment")?;

        let settings = flatten_settings(document.tensorflow)?;
        debug!(keys = ?settings.keys().collect::<Vec<_>>(), "merged processor settings");
        Ok(settings)
    }

    /// Bind an already flattened settings map with this loader's collaborators
    pub fn bind<I, K, V>(&self, settings: I) -> Result<ProcessorConfig, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        ProcessorConfig::bind(settings, self.resolver.as_ref(), self.parser.as_ref())
    }

    /// Load and bind the processor configuration from all sources
    pub fn load(&self) -> Result<ProcessorConfig> {
        let settings = self.settings()?;
        let config = self
            .bind(&settings)
            .context("Invalid processor configuration")?;

        info!(
            config_file = %self.config_file.display(),
            model = ?config.model().map(ToString::to_string),
            mode = %config.mode(),
            "processor configuration loaded"
        );
        Ok(config)
    }
}

/// `TENSORFLOW_*` variables with the prefix stripped
///
/// Values stay literal strings: `Env` as a provider would parse `007` into
/// the number `7`.
fn env_settings() -> BTreeMap<String, String> {
    Env::prefixed(ENV_PREFIX)
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), value))
        .collect()
}

/// Render scalar setting values to strings; nulls count as absent
fn flatten_settings(section: BTreeMap<String, Value>) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut settings = BTreeMap::new();
    for (key, value) in section {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other @ (Value::Array(_) | Value::Object(_)) => {
                return Err(ConfigError::invalid(key, other.to_string(), "expected a single value"));
            }
        };
        settings.insert(key, rendered);
    }
    Ok(settings)
}
