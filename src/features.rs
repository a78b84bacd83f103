use crate::error::Error;
use crate::prometheus::Config;
use tracing::debug;

/// Reject Prometheus features that the receiver does not support.
///
/// Every offending feature is reported at once, sorted by name so that the
/// error reads the same regardless of the order the checks run in.
pub(crate) fn check_supported(config: &Config) -> Result<(), Error> {
    let mut unsupported = Vec::with_capacity(5);

    if !config.remote_write.is_empty() {
        unsupported.push("remote_write");
    }
    if !config.remote_read.is_empty() {
        unsupported.push("remote_read");
    }
    if !config.rule_files.is_empty() {
        unsupported.push("rule_files");
    }
    if !config.alerting.alert_relabel_configs.is_empty() {
        unsupported.push("alert_config.relabel_configs");
    }
    if !config.alerting.alertmanagers.is_empty() {
        unsupported.push("alert_config.alertmanagers");
    }

    if unsupported.is_empty() {
        return Ok(());
    }

    unsupported.sort_unstable();
    debug!(features = ?unsupported, "configuration uses unsupported features");

    Err(Error::UnsupportedFeatures(unsupported))
}
