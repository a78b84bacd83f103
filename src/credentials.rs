use crate::error::Error;
use crate::prometheus::{ScrapeConfig, TlsConfig};
use std::{fs, io};
use tracing::trace;

/// Make sure the credential and TLS files referenced by the scrape jobs
/// exist.
///
/// This only looks at the filesystem once, while validating. Whether the
/// files are readable, or still there by the time they are used, is not
/// checked.
pub(crate) fn check_scrape_configs(scrape_configs: &[ScrapeConfig]) -> Result<(), Error> {
    for scrape_config in scrape_configs {
        let job = scrape_config.job_name();
        let client = &scrape_config.http_client_config;

        let credentials_files = client
            .authorization
            .iter()
            .map(|authorization| &authorization.credentials_file)
            .chain(std::iter::once(&client.bearer_token_file));
        for path in credentials_files {
            check_file(path).map_err(|source| Error::CredentialsFile {
                job: job.to_string(),
                path: path.into(),
                source,
            })?;
        }

        check_tls_config(&client.tls_config, || format!("scrape job {job:?}"))?;

        for discovery in scrape_config.service_discovery_configs() {
            if let Some(client) = discovery.http_client_config() {
                check_tls_config(&client.tls_config, || {
                    format!("{}_sd_configs of scrape job {job:?}", discovery.name())
                })?;
            }
        }
    }

    Ok(())
}

/// Check the client certificate and key of a TLS config. `scope` describes
/// where the config came from and is only evaluated for errors.
fn check_tls_config(tls_config: &TlsConfig, scope: impl Fn() -> String) -> Result<(), Error> {
    check_file(&tls_config.cert_file).map_err(|source| Error::ClientCertFile {
        scope: scope(),
        path: tls_config.cert_file.clone().into(),
        source,
    })?;

    check_file(&tls_config.key_file).map_err(|source| Error::ClientKeyFile {
        scope: scope(),
        path: tls_config.key_file.clone().into(),
        source,
    })?;

    Ok(())
}

fn check_file(path: &str) -> io::Result<()> {
    // Nothing configured, nothing to check.
    if path.is_empty() {
        return Ok(());
    }

    trace!(path, "checking that file exists");
    fs::metadata(path).map(|_| ())
}
