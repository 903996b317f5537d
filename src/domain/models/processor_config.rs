//! Processor configuration and settings binding

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{Message, OutputMode, ResourceHandle};
use crate::domain::error::{ConfigError, EvaluationError, OutputError};
use crate::domain::ports::{Expression, ExpressionParser, ResourceResolver};

/// Prefix the settings carry when they share a namespace with other properties
pub const SETTINGS_PREFIX: &str = "tensorflow";

/// The settings a processor configuration is bound from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    /// Location of the model resource
    Model,
    /// Operation(s) to fetch from the model
    ModelFetch,
    /// Index into the fetched operation's outputs
    ModelFetchIndex,
    /// Where the inference result is written
    Mode,
    /// Header name for the result in header mode
    OutputName,
    /// Expression selecting the inference input
    Expression,
}

impl SettingKey {
    /// Every setting, in canonical order
    pub const ALL: [Self; 6] = [
        Self::Model,
        Self::ModelFetch,
        Self::ModelFetchIndex,
        Self::Mode,
        Self::OutputName,
        Self::Expression,
    ];

    /// Canonical (camelCase) name of the setting
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::ModelFetch => "modelFetch",
            Self::ModelFetchIndex => "modelFetchIndex",
            Self::Mode => "mode",
            Self::OutputName => "outputName",
            Self::Expression => "expression",
        }
    }

    /// Match a key the relaxed way: case-insensitive, ignoring `-`, `_` and
    /// `.` separators, with an optional `tensorflow` prefix.
    ///
    /// `model-fetch`, `MODEL_FETCH` and `tensorflow.modelFetch` all map to
    /// [`SettingKey::ModelFetch`].
    pub fn from_relaxed(key: &str) -> Option<Self> {
        let relaxed = relaxed_form(strip_prefix(key));
        Self::ALL
            .into_iter()
            .find(|setting| setting.as_str().eq_ignore_ascii_case(&relaxed))
    }
}

fn strip_prefix(key: &str) -> &str {
    let key = key.trim();
    let bytes = key.as_bytes();
    let len = SETTINGS_PREFIX.len();
    if bytes.len() > len
        && bytes[..len].eq_ignore_ascii_case(SETTINGS_PREFIX.as_bytes())
        && matches!(bytes[len], b'.' | b'_' | b'-')
    {
        &key[len + 1..]
    } else {
        key
    }
}

/// Lowercased key with separators removed
pub fn relaxed_form(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '-' | '_' | '.'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Bound configuration of the TensorFlow processor
///
/// Built once by [`ProcessorConfig::bind`] and read-only afterwards, so it
/// can be shared across threads freely.
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    model: Option<ResourceHandle>,
    model_fetch: Option<String>,
    model_fetch_index: i32,
    mode: OutputMode,
    output_name: Option<String>,
    expression: Option<Arc<dyn Expression>>,
}

impl ProcessorConfig {
    /// Bind a flat settings map into a configuration
    ///
    /// Unrecognized keys are ignored. Two spellings of the same key are
    /// accepted only when they agree on the value.
    pub fn bind<I, K, V>(
        settings: I,
        resolver: &dyn ResourceResolver,
        parser: &dyn ExpressionParser,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = Vec::new();
        for (key, value) in settings {
            let key = key.as_ref();
            match SettingKey::from_relaxed(key) {
                Some(setting) => entries.push((setting, value.as_ref().to_string())),
                None => debug!(key = %key, "ignoring unrecognized processor setting"),
            }
        }
        // Sorted so conflicts are reported the same way for any input order
        entries.sort();

        let mut recognized: BTreeMap<SettingKey, String> = BTreeMap::new();
        for (setting, value) in entries {
            match recognized.entry(setting) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(slot) if *slot.get() == value => {}
                Entry::Occupied(slot) => {
                    return Err(ConfigError::invalid(
                        setting.as_str(),
                        value,
                        format!("conflicts with '{}' set through another spelling", slot.get()),
                    ));
                }
            }
        }

        let model = recognized
            .remove(&SettingKey::Model)
            .map(|locator| resolver.resolve(&locator))
            .transpose()?;

        let model_fetch = non_blank(recognized.remove(&SettingKey::ModelFetch));

        let model_fetch_index = match recognized.remove(&SettingKey::ModelFetchIndex) {
            Some(raw) => raw.trim().parse::<i32>().map_err(|e| {
                ConfigError::invalid(SettingKey::ModelFetchIndex.as_str(), &raw, e.to_string())
            })?,
            None => 0,
        };

        let mode = match recognized.remove(&SettingKey::Mode) {
            Some(raw) => raw
                .parse::<OutputMode>()
                .map_err(|reason| ConfigError::invalid(SettingKey::Mode.as_str(), &raw, reason))?,
            None => OutputMode::default(),
        };

        let output_name =
            non_blank(recognized.remove(&SettingKey::OutputName)).or_else(|| model_fetch.clone());

        let expression = non_blank(recognized.remove(&SettingKey::Expression))
            .map(|source| parser.parse(&source))
            .transpose()?;

        let config = Self {
            model,
            model_fetch,
            model_fetch_index,
            mode,
            output_name,
            expression,
        };

        debug!(
            model = ?config.model.as_ref().map(ToString::to_string),
            model_fetch = ?config.model_fetch,
            model_fetch_index = config.model_fetch_index,
            mode = %config.mode,
            output_name = ?config.output_name,
            expression = ?config.expression_source(),
            "bound processor configuration"
        );

        Ok(config)
    }

    /// The resolved model resource, if one was configured
    pub const fn model(&self) -> Option<&ResourceHandle> {
        self.model.as_ref()
    }

    /// Raw `modelFetch` value
    pub fn model_fetch(&self) -> Option<&str> {
        self.model_fetch.as_deref()
    }

    /// Operation names listed in `modelFetch`, which may be comma separated
    pub fn fetch_names(&self) -> Vec<&str> {
        self.model_fetch
            .as_deref()
            .map(|fetch| {
                fetch
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Output index of the fetched operation, `0` by default
    pub const fn model_fetch_index(&self) -> i32 {
        self.model_fetch_index
    }

    /// Where results go
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Output name, falling back to `modelFetch` when not set
    pub fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    /// The parsed input expression
    pub fn expression(&self) -> Option<&dyn Expression> {
        self.expression.as_deref()
    }

    /// Source text of the input expression
    pub fn expression_source(&self) -> Option<&str> {
        self.expression().map(Expression::source_text)
    }

    /// Select the inference input from a message
    ///
    /// Evaluates the configured expression, or takes the payload as is when
    /// there is none.
    pub fn extract_input(&self, message: &Message) -> Result<Value, EvaluationError> {
        self.expression()
            .map_or_else(|| Ok(message.payload.clone()), |expr| expr.evaluate(message))
    }

    /// Write an inference result into the message according to the output mode
    pub fn write_output(&self, mut message: Message, result: Value) -> Result<Message, OutputError> {
        match self.mode {
            OutputMode::Payload => message.payload = result,
            OutputMode::Header => {
                let name = self.output_name.as_ref().ok_or(OutputError::MissingOutputName)?;
                message.headers.insert(name.clone(), result);
            }
        }
        Ok(message)
    }
}

impl PartialEq for ProcessorConfig {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
            && self.model_fetch == other.model_fetch
            && self.model_fetch_index == other.model_fetch_index
            && self.mode == other.mode
            && self.output_name == other.output_name
            && self.expression_source() == other.expression_source()
    }
}

impl Eq for ProcessorConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ExpressionSyntaxError, ResourceResolutionError};
    use crate::domain::models::ResourceLocation;
    use serde_json::json;
    use std::path::PathBuf;

    struct StubResolver;

    impl ResourceResolver for StubResolver {
        fn resolve(&self, locator: &str) -> Result<ResourceHandle, ResourceResolutionError> {
            if locator.trim().is_empty() {
                return Err(ResourceResolutionError::new(locator, "empty locator"));
            }
            Ok(ResourceHandle::new(
                locator,
                ResourceLocation::File(PathBuf::from("/base").join(locator.trim_start_matches('/'))),
            ))
        }
    }

    #[derive(Debug)]
    struct LiteralExpression(String);

    impl Expression for LiteralExpression {
        fn source_text(&self) -> &str {
            &self.0
        }

        fn evaluate(&self, _message: &Message) -> Result<Value, EvaluationError> {
            Ok(Value::String(self.0.clone()))
        }
    }

    struct StubParser;

    impl ExpressionParser for StubParser {
        fn parse(&self, source: &str) -> Result<Arc<dyn Expression>, ExpressionSyntaxError> {
            if let Some(position) = source.find('!') {
                return Err(ExpressionSyntaxError {
                    expression: source.to_string(),
                    position,
                    message: "unexpected '!'".to_string(),
                });
            }
            Ok(Arc::new(LiteralExpression(source.to_string())))
        }
    }

    fn bind(settings: &[(&str, &str)]) -> Result<ProcessorConfig, ConfigError> {
        ProcessorConfig::bind(settings.iter().copied(), &StubResolver, &StubParser)
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let config = bind(&[]).unwrap();

        assert!(config.model().is_none());
        assert!(config.model_fetch().is_none());
        assert_eq!(config.model_fetch_index(), 0);
        assert_eq!(config.mode(), OutputMode::Payload);
        assert!(config.output_name().is_none());
        assert!(config.expression().is_none());
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn test_model_is_resolved() {
        let config = bind(&[("model", "/remote")]).unwrap();
        assert_eq!(config.model(), Some(&StubResolver.resolve("/remote").unwrap()));
    }

    #[test]
    fn test_unresolvable_model_fails() {
        let err = bind(&[("model", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::ResourceResolution(_)));
    }

    #[test]
    fn test_model_fetch_index_parses() {
        let config = bind(&[("modelFetchIndex", "666")]).unwrap();
        assert_eq!(config.model_fetch_index(), 666);

        let config = bind(&[("modelFetchIndex", " -1 ")]).unwrap();
        assert_eq!(config.model_fetch_index(), -1);
    }

    #[test]
    fn test_non_numeric_model_fetch_index_fails() {
        let err = bind(&[("modelFetchIndex", "six")]).unwrap_err();
        match err {
            ConfigError::InvalidConfiguration { key, value, .. } => {
                assert_eq!(key, "modelFetchIndex");
                assert_eq!(value, "six");
            }
            other => panic!("Expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_mode_parses_and_rejects_unknown() {
        assert_eq!(bind(&[("mode", "header")]).unwrap().mode(), OutputMode::Header);
        assert_eq!(bind(&[("mode", "PAYLOAD")]).unwrap().mode(), OutputMode::Payload);

        let err = bind(&[("mode", "tuple")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { ref key, .. } if key == "mode"));
    }

    #[test]
    fn test_output_name_falls_back_to_model_fetch() {
        let config = bind(&[("modelFetch", "output1")]).unwrap();
        assert_eq!(config.output_name(), Some("output1"));
    }

    #[test]
    fn test_explicit_output_name_wins() {
        let config = bind(&[("modelFetch", "output1"), ("outputName", "outputName2")]).unwrap();
        assert_eq!(config.model_fetch(), Some("output1"));
        assert_eq!(config.output_name(), Some("outputName2"));
    }

    #[test]
    fn test_blank_output_name_counts_as_unset() {
        let config = bind(&[("modelFetch", "output1"), ("outputName", "  ")]).unwrap();
        assert_eq!(config.output_name(), Some("output1"));
    }

    #[test]
    fn test_expression_keeps_source_text() {
        let config = bind(&[("expression", "header")]).unwrap();
        assert_eq!(config.expression_source(), Some("header"));
    }

    #[test]
    fn test_expression_syntax_error_propagates() {
        let err = bind(&[("expression", "payload!")]).unwrap_err();
        match err {
            ConfigError::ExpressionSyntax(e) => assert_eq!(e.position, 7),
            other => panic!("Expected ExpressionSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_relaxed_keys_bind() {
        let config = bind(&[
            ("tensorflow.model-fetch", "output1"),
            ("MODEL_FETCH_INDEX", "2"),
            ("output_name", "out"),
        ])
        .unwrap();

        assert_eq!(config.model_fetch(), Some("output1"));
        assert_eq!(config.model_fetch_index(), 2);
        assert_eq!(config.output_name(), Some("out"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = bind(&[("modelFetch", "a"), ("batchSize", "12"), ("tensorflowmodel", "x")]).unwrap();
        assert_eq!(config.model_fetch(), Some("a"));
        assert!(config.model().is_none());
    }

    #[test]
    fn test_conflicting_spellings_fail() {
        let err = bind(&[("modelFetch", "a"), ("model_fetch", "b")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));

        let config = bind(&[("modelFetch", "a"), ("model_fetch", "a")]).unwrap();
        assert_eq!(config.model_fetch(), Some("a"));
    }

    #[test]
    fn test_from_relaxed() {
        assert_eq!(SettingKey::from_relaxed("modelfetch"), Some(SettingKey::ModelFetch));
        assert_eq!(SettingKey::from_relaxed("Tensorflow_Mode"), Some(SettingKey::Mode));
        assert_eq!(SettingKey::from_relaxed("model.fetch.index"), Some(SettingKey::ModelFetchIndex));
        assert_eq!(SettingKey::from_relaxed("tensorflow"), None);
        assert_eq!(SettingKey::from_relaxed("models"), None);
    }

    #[test]
    fn test_fetch_names_split_on_commas() {
        let config = bind(&[("modelFetch", "detection_boxes, detection_scores,,")]).unwrap();
        assert_eq!(config.fetch_names(), vec!["detection_boxes", "detection_scores"]);
        assert!(ProcessorConfig::default().fetch_names().is_empty());
    }

    #[test]
    fn test_extract_input_defaults_to_payload() {
        let message = Message::new(json!([1.0, 2.0]));
        assert_eq!(ProcessorConfig::default().extract_input(&message).unwrap(), json!([1.0, 2.0]));

        let config = bind(&[("expression", "payload.x")]).unwrap();
        assert_eq!(config.extract_input(&message).unwrap(), json!("payload.x"));
    }

    #[test]
    fn test_write_output_by_mode() {
        let message = Message::new(json!("input"));

        let config = bind(&[("modelFetch", "scores")]).unwrap();
        let out = config.write_output(message.clone(), json!([0.9])).unwrap();
        assert_eq!(out.payload, json!([0.9]));
        assert!(out.headers.is_empty());

        let config = bind(&[("modelFetch", "scores"), ("mode", "header")]).unwrap();
        let out = config.write_output(message.clone(), json!([0.9])).unwrap();
        assert_eq!(out.payload, json!("input"));
        assert_eq!(out.header("scores"), Some(&json!([0.9])));

        let config = bind(&[("mode", "header")]).unwrap();
        assert_eq!(
            config.write_output(message, json!(1)).unwrap_err(),
            OutputError::MissingOutputName
        );
    }

    #[test]
    fn test_config_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessorConfig>();
    }
}
