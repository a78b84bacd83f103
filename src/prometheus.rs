//! The Prometheus configuration schema.
//!
//! These types follow the field names of the Prometheus YAML configuration
//! file and decode strictly: any key Prometheus itself would not understand
//! is an error. Decoding goes through [`StrictYaml::from_yaml_str`], which
//! also applies the consistency rules Prometheus enforces after parsing a
//! file (inherited defaults, unique job names and so on).

mod discovery;
mod http_client;

pub use discovery::{
    DiscoveryConfig, DnsRecordType, DnsSdConfig, FileSdConfig, HttpSdConfig, KubernetesRole,
    KubernetesSdConfig, KubernetesSelector, NamespaceDiscovery, StaticConfig,
};
pub use http_client::{Authorization, BasicAuth, HttpClientConfig, OAuth2, TlsConfig};

use crate::inline::split_inline;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while decoding a document in the Prometheus schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("global scrape timeout greater than scrape interval")]
    GlobalScrapeTimeoutTooLong,

    #[error("job_name is empty")]
    EmptyJobName,

    #[error("found multiple scrape configs with job name {0:?}")]
    DuplicateJobName(String),

    #[error("scrape timeout greater than scrape interval for scrape config with job name {0:?}")]
    ScrapeTimeoutTooLong(String),
}

/// Types that are decoded strictly from Prometheus flavoured YAML.
pub trait StrictYaml: DeserializeOwned {
    fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rule_files: Vec<String>,

    pub scrape_configs: Vec<ScrapeConfig>,

    #[serde(skip_serializing_if = "AlertingConfig::is_empty")]
    pub alerting: AlertingConfig,

    /// Remote write targets. Only their presence matters to the receiver, so
    /// the entries are kept as they were written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remote_write: Vec<serde_yaml::Value>,

    /// Remote read targets, kept as written for the same reason as
    /// `remote_write`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remote_read: Vec<serde_yaml::Value>,
}

impl StrictYaml for Config {
    fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let mut config: Config = serde_yaml::from_str(yaml)?;

        if config.global.scrape_timeout > config.global.scrape_interval {
            return Err(SchemaError::GlobalScrapeTimeoutTooLong);
        }

        let mut job_names = HashSet::new();
        for scrape_config in &mut config.scrape_configs {
            let job = &mut scrape_config.job;

            if job.job_name.is_empty() {
                return Err(SchemaError::EmptyJobName);
            }
            if !job_names.insert(job.job_name.clone()) {
                return Err(SchemaError::DuplicateJobName(job.job_name.clone()));
            }

            let interval = *job
                .scrape_interval
                .get_or_insert(config.global.scrape_interval);

            // An inherited timeout is capped at the job's own interval, an
            // explicit one has to fit on its own.
            let timeout = match job.scrape_timeout {
                Some(timeout) => timeout,
                None => config.global.scrape_timeout.min(interval),
            };
            if timeout > interval {
                return Err(SchemaError::ScrapeTimeoutTooLong(job.job_name.clone()));
            }
            job.scrape_timeout = Some(timeout);
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    #[serde(with = "humantime_serde")]
    pub scrape_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub scrape_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub evaluation_interval: Duration,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub external_labels: BTreeMap<String, String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            scrape_interval: Duration::from_secs(60),
            scrape_timeout: Duration::from_secs(10),
            evaluation_interval: Duration::from_secs(60),
            external_labels: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertingConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alert_relabel_configs: Vec<RelabelConfig>,

    /// Alertmanager targets, kept as written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alertmanagers: Vec<serde_yaml::Value>,
}

impl AlertingConfig {
    pub fn is_empty(&self) -> bool {
        self.alert_relabel_configs.is_empty() && self.alertmanagers.is_empty()
    }
}

/// A single scrape job: its own settings next to the HTTP client settings
/// used to reach its targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeConfig {
    #[serde(flatten)]
    pub job: ScrapeJob,

    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

impl<'de> Deserialize<'de> for ScrapeConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (job, http_client_config) = split_inline(deserializer)?;
        Ok(Self {
            job,
            http_client_config,
        })
    }
}

impl ScrapeConfig {
    pub fn job_name(&self) -> &str {
        &self.job.job_name
    }

    /// All discovery mechanisms configured for this job, in the order in
    /// which their kinds appear in the schema.
    pub fn service_discovery_configs(&self) -> Vec<&dyn DiscoveryConfig> {
        let job = &self.job;

        let mut configs: Vec<&dyn DiscoveryConfig> = Vec::new();
        configs.extend(job.static_configs.iter().map(|c| c as &dyn DiscoveryConfig));
        configs.extend(job.file_sd_configs.iter().map(|c| c as &dyn DiscoveryConfig));
        configs.extend(job.dns_sd_configs.iter().map(|c| c as &dyn DiscoveryConfig));
        configs.extend(job.http_sd_configs.iter().map(|c| c as &dyn DiscoveryConfig));
        configs.extend(job.kubernetes_sd_configs.iter().map(|c| c as &dyn DiscoveryConfig));
        configs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeJob {
    pub job_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_labels: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honor_timestamps: Option<bool>,

    /// Falls back to the global interval when not set.
    #[serde(
        default,
        with = "humantime_serde::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scrape_interval: Option<Duration>,

    #[serde(
        default,
        with = "humantime_serde::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scrape_timeout: Option<Duration>,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    #[serde(default)]
    pub scheme: Scheme,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_timestamps_staleness: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_compression: Option<bool>,

    /// Exposition formats to negotiate, in order of preference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scrape_protocols: Vec<ScrapeProtocol>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_classic_histograms: Option<bool>,

    /// Largest accepted uncompressed body, such as `10MB`. Empty means no
    /// limit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body_size_limit: String,

    // Zero means no limit for all of the limits below.
    #[serde(default)]
    pub sample_limit: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub target_limit: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub label_limit: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub label_name_length_limit: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub label_value_length_limit: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub native_histogram_bucket_limit: u64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub keep_dropped_targets: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relabel_configs: Vec<RelabelConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_relabel_configs: Vec<RelabelConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_configs: Vec<StaticConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_sd_configs: Vec<FileSdConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_sd_configs: Vec<DnsSdConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http_sd_configs: Vec<HttpSdConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kubernetes_sd_configs: Vec<KubernetesSdConfig>,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeProtocol {
    PrometheusProto,
    #[serde(rename = "OpenMetricsText1.0.0")]
    OpenMetricsText1,
    #[serde(rename = "OpenMetricsText0.0.1")]
    OpenMetricsText0,
    #[serde(rename = "PrometheusText0.0.4")]
    PrometheusText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelabelConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_labels: Vec<String>,
    pub separator: String,
    pub regex: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub modulus: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_label: String,
    pub replacement: String,
    pub action: RelabelAction,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            source_labels: Vec::new(),
            separator: ";".to_string(),
            regex: "(.*)".to_string(),
            modulus: 0,
            target_label: String::new(),
            replacement: "$1".to_string(),
            action: RelabelAction::Replace,
        }
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelabelAction {
    #[default]
    Replace,
    Keep,
    Drop,
    KeepEqual,
    DropEqual,
    HashMod,
    LabelMap,
    LabelDrop,
    LabelKeep,
    Lowercase,
    Uppercase,
}
