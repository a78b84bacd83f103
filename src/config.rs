use crate::adapter::{PromConfig, PromHttpSdConfig};
use crate::client::ClientSettings;
use crate::endpoint::parse_request_uri;
use crate::error::Error;
use crate::inline::split_inline;
use crate::prometheus::{HttpSdConfig, ScrapeConfig};
use crate::{credentials, features};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;


/// This struct represents the receiver configuration. Everything is optional
/// so that users only specify what they need, but at least one source of
/// scrape targets has to be configured for it to pass [`validate`].
///
/// [`validate`]: ReceiverConfig::validate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReceiverConfig {
    /// A regular Prometheus configuration, written in the Prometheus schema.
    #[serde(rename = "config", skip_serializing_if = "Option::is_none")]
    pub prometheus_config: Option<PromConfig>,

    pub trim_metric_suffixes: bool,

    /// Take the start time of counters from the `process_start_time_seconds`
    /// metric. Only correct when every counter of an endpoint started after
    /// the process did.
    pub use_start_time_metric: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_time_metric_regex: String,

    /// Report additional scrape metrics such as `scrape_body_size_bytes`.
    pub report_extra_scrape_metrics: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_allocator: Option<TargetAllocatorConfig>,

    /// Let the scraper negotiate the protobuf exposition format.
    pub enable_protobuf_negotiation: bool,
}

impl ReceiverConfig {
    /// Checks the receiver configuration is valid.
    ///
    /// Validation only reads the configuration (and the filesystem, for
    /// referenced credential files), so validating the same value twice
    /// gives the same result.
    pub fn validate(&self) -> Result<(), Error> {
        if self.scrape_configs().is_empty() && self.target_allocator.is_none() {
            return Err(Error::NoMetricsSource);
        }

        if let Some(config) = &self.prometheus_config {
            features::check_supported(config)?;
            credentials::check_scrape_configs(&config.scrape_configs)?;
        }

        if let Some(target_allocator) = &self.target_allocator {
            target_allocator.validate()?;
        }

        debug!(
            jobs = self.scrape_configs().len(),
            target_allocator = self.target_allocator.is_some(),
            "receiver configuration is valid"
        );
        Ok(())
    }

    /// The statically configured scrape jobs.
    pub fn scrape_configs(&self) -> &[ScrapeConfig] {
        self.prometheus_config
            .as_ref()
            .map(|config| config.scrape_configs.as_slice())
            .unwrap_or_default()
    }

    pub fn target_allocator(&self) -> Option<&TargetAllocatorConfig> {
        self.target_allocator.as_ref()
    }
}

/// Settings for fetching scrape jobs from a target allocator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAllocatorConfig {
    #[serde(flatten)]
    pub client: ClientSettings,

    /// How often to ask the target allocator for jobs.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Identifies this collector towards the target allocator.
    pub collector_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_sd_config: Option<PromHttpSdConfig>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetAllocatorFields {
    #[serde(default = "default_interval", with = "humantime_serde")]
    interval: Duration,
    #[serde(default)]
    collector_id: String,
    #[serde(default)]
    http_sd_config: Option<PromHttpSdConfig>,
}

fn default_interval() -> Duration {
    Duration::from_secs(30)
}

impl<'de> Deserialize<'de> for TargetAllocatorConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (fields, client): (TargetAllocatorFields, ClientSettings) =
            split_inline(deserializer)?;

        Ok(Self {
            client,
            interval: fields.interval,
            collector_id: fields.collector_id,
            http_sd_config: fields.http_sd_config,
        })
    }
}

impl TargetAllocatorConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let endpoint = &self.client.endpoint;
        if let Err(err) = parse_request_uri(endpoint) {
            debug!(%endpoint, %err, "target allocator endpoint does not parse");
            return Err(Error::InvalidTargetAllocatorEndpoint(endpoint.clone()));
        }

        // `${...}` means the collector id was meant to be expanded from the
        // environment but never was.
        if self.collector_id.is_empty() || self.collector_id.contains("${") {
            return Err(Error::InvalidCollectorId);
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.client.endpoint
    }

    pub fn http_sd_config(&self) -> Option<&HttpSdConfig> {
        self.http_sd_config.as_ref().and_then(PromHttpSdConfig::get)
    }
}
