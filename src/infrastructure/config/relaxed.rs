//! Relaxed key matching for figment providers

use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider};

use crate::domain::models::{relaxed_form, SettingKey, SETTINGS_PREFIX};

/// Provider wrapper that rewrites keys of the `tensorflow` section to their
/// canonical spelling before figment merges sources.
///
/// Without it `model-fetch` from a file and `MODEL_FETCH` from the
/// environment would land as two different keys and neither would override
/// the other.
pub struct RelaxedKeys<P> {
    inner: P,
}

impl<P: Provider> RelaxedKeys<P> {
    /// Wrap `inner`
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }
}

/// Canonical key for a recognized setting, relaxed form for anything else
pub fn canonical_key(key: &str) -> String {
    SettingKey::from_relaxed(key).map_or_else(|| relaxed_form(key), |setting| setting.as_str().to_string())
}

impl<P: Provider> Provider for RelaxedKeys<P> {
    fn metadata(&self) -> Metadata {
        self.inner.metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut data = self.inner.data()?;
        for dict in data.values_mut() {
            if let Some(Value::Dict(_, section)) = dict.get_mut(SETTINGS_PREFIX) {
                *section = std::mem::take(section)
                    .into_iter()
                    .map(|(key, value)| (canonical_key(&key), value))
                    .collect();
            }
        }
        Ok(data)
    }

    fn profile(&self) -> Option<Profile> {
        self.inner.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Yaml};
    use figment::Figment;
    use std::collections::BTreeMap;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("model-fetch"), "modelFetch");
        assert_eq!(canonical_key("model_fetch_index"), "modelFetchIndex");
        assert_eq!(canonical_key("OUTPUT_NAME"), "outputName");
        assert_eq!(canonical_key("batch-size"), "batchsize");
    }

    #[test]
    fn test_later_source_overrides_other_spelling() {
        let file = Yaml::string("tensorflow:\n  model-fetch: from_file\n  mode: header\n");
        let overrides = Yaml::string("tensorflow:\n  MODEL_FETCH: from_override\n");

        let section: BTreeMap<String, String> = Figment::new()
            .merge(RelaxedKeys::new(file))
            .merge(RelaxedKeys::new(overrides))
            .extract_inner(SETTINGS_PREFIX)
            .unwrap();

        assert_eq!(section.get("modelFetch").map(String::as_str), Some("from_override"));
        assert_eq!(section.get("mode").map(String::as_str), Some("header"));
        assert_eq!(section.len(), 2);
    }
}
