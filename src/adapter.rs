//! Bridges the receiver's own configuration tree and the Prometheus schema.
//!
//! The receiver reads its settings as a generic tree, but the part under
//! `config` (and the target allocator's `http_sd_config`) is written in the
//! Prometheus schema, which has its own strict decoding rules. Instead of
//! decoding those regions directly, they are captured as a plain mapping,
//! written back out as YAML and decoded again by the Prometheus types.

use crate::prometheus::{self, SchemaError, StrictYaml};
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use std::ops::Deref;
use thiserror::Error;
use tracing::trace;

/// Stand-in URL for `http_sd_config` blocks. The actual URL is derived from
/// the target allocator endpoint when scraping starts.
pub const PLACEHOLDER_URL: &str = "http://placeholder";

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("prometheus receiver: failed to marshal config to yaml: {0}")]
    Marshal(#[source] serde_yaml::Error),

    #[error(
        "prometheus receiver: failed to unmarshal yaml to prometheus config object: {}{}",
        .0,
        location_hint(.0)
    )]
    Unmarshal(#[source] SchemaError),
}

const LOCATION_HINT: &str = " (line and column refer to the re-encoded prometheus config)";

// Positions in decode errors point into the YAML written by `unmarshal_yaml`,
// not into the document the user wrote.
fn location_hint(err: &SchemaError) -> &'static str {
    match err {
        SchemaError::Yaml(err) if err.location().is_some() => LOCATION_HINT,
        _ => "",
    }
}

/// The Prometheus configuration embedded in the receiver's `config` key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct PromConfig(prometheus::Config);

impl PromConfig {
    /// Decode a Prometheus configuration from a generic tree. An empty tree
    /// yields the default configuration.
    pub fn from_mapping(map: &Mapping) -> Result<Self, AdapterError> {
        if map.is_empty() {
            return Ok(Self::default());
        }
        unmarshal_yaml(map).map(Self)
    }

    pub fn into_inner(self) -> prometheus::Config {
        self.0
    }
}

impl TryFrom<Mapping> for PromConfig {
    type Error = AdapterError;

    fn try_from(map: Mapping) -> Result<Self, Self::Error> {
        Self::from_mapping(&map)
    }
}

impl From<prometheus::Config> for PromConfig {
    fn from(config: prometheus::Config) -> Self {
        Self(config)
    }
}

impl Deref for PromConfig {
    type Target = prometheus::Config;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for PromConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// The HTTP discovery settings of the target allocator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct PromHttpSdConfig(Option<prometheus::HttpSdConfig>);

impl PromHttpSdConfig {
    /// Decode HTTP discovery settings from a generic tree.
    ///
    /// The `url` key is always replaced by [`PLACEHOLDER_URL`], the schema
    /// requires one but the target allocator provides the real URL. An empty
    /// tree yields no settings at all.
    pub fn from_mapping(map: &Mapping) -> Result<Self, AdapterError> {
        if map.is_empty() {
            return Ok(Self(None));
        }

        let mut map = map.clone();
        map.insert(Value::from("url"), Value::from(PLACEHOLDER_URL));

        unmarshal_yaml(&map).map(|config| Self(Some(config)))
    }

    pub fn get(&self) -> Option<&prometheus::HttpSdConfig> {
        self.0.as_ref()
    }
}

impl TryFrom<Mapping> for PromHttpSdConfig {
    type Error = AdapterError;

    fn try_from(map: Mapping) -> Result<Self, Self::Error> {
        Self::from_mapping(&map)
    }
}

impl Serialize for PromHttpSdConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(config) => config.serialize(serializer),
            None => Mapping::new().serialize(serializer),
        }
    }
}

fn unmarshal_yaml<T: StrictYaml>(map: &Mapping) -> Result<T, AdapterError> {
    let yaml = serde_yaml::to_string(map).map_err(AdapterError::Marshal)?;
    trace!(%yaml, "decoding prometheus configuration");

    T::from_yaml_str(&yaml).map_err(AdapterError::Unmarshal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn empty_mapping_is_the_default_config() {
        let config = PromConfig::from_mapping(&Mapping::new()).unwrap();
        assert_eq!(config, PromConfig::default());
        assert!(config.scrape_configs.is_empty());
    }

    #[test]
    fn decodes_scrape_configs() {
        let config = PromConfig::from_mapping(&mapping(
            r#"
            scrape_configs:
              - job_name: demo
                scrape_interval: 5s
                static_configs:
                  - targets: ["localhost:8888"]
            "#,
        ))
        .unwrap();

        assert_eq!(config.scrape_configs.len(), 1);
        assert_eq!(config.scrape_configs[0].job_name(), "demo");
        assert_eq!(
            config.scrape_configs[0].job.scrape_interval,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn unknown_fields_fail_to_decode() {
        let err = PromConfig::from_mapping(&mapping("scrape_config: []")).unwrap_err();

        assert!(matches!(err, AdapterError::Unmarshal(_)));
        assert!(err
            .to_string()
            .starts_with("prometheus receiver: failed to unmarshal yaml to prometheus config object:"));
    }

    #[test]
    fn decode_positions_are_marked_as_re_encoded() {
        let err = PromConfig::from_mapping(&mapping(
            r#"
            global:
              scrape_interval: 30s
            scrape_configs:
              - job_name: app
                scrape_intervall: 5s
            "#,
        ))
        .unwrap_err();

        let AdapterError::Unmarshal(SchemaError::Yaml(yaml)) = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(
            err.to_string().ends_with(LOCATION_HINT),
            yaml.location().is_some(),
            "{err}"
        );
    }

    #[test]
    fn schema_rule_errors_have_no_position() {
        let err = PromConfig::from_mapping(&mapping(
            r#"
            scrape_configs:
              - job_name: app
              - job_name: app
            "#,
        ))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "prometheus receiver: failed to unmarshal yaml to prometheus config object: \
             found multiple scrape configs with job name \"app\""
        );
    }

    #[test]
    fn http_sd_config_gets_placeholder_url() {
        let config = PromHttpSdConfig::from_mapping(&mapping("refresh_interval: 60s")).unwrap();
        let http_sd = config.get().expect("decoded http_sd_config");

        assert_eq!(http_sd.url, PLACEHOLDER_URL);
        assert_eq!(http_sd.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn http_sd_config_url_is_always_replaced() {
        let config =
            PromHttpSdConfig::from_mapping(&mapping("url: http://elsewhere:1234/sd")).unwrap();

        assert_eq!(config.get().map(|c| c.url.as_str()), Some(PLACEHOLDER_URL));
    }

    #[test]
    fn empty_http_sd_config_is_none() {
        let config = PromHttpSdConfig::from_mapping(&Mapping::new()).unwrap();
        assert!(config.get().is_none());
    }

    #[test]
    fn decoding_does_not_touch_the_input() {
        let input = mapping("refresh_interval: 30s");
        let first = PromHttpSdConfig::from_mapping(&input).unwrap();
        let second = PromHttpSdConfig::from_mapping(&input).unwrap();

        assert_eq!(first, second);
        assert!(!input.contains_key("url"));
    }
}
