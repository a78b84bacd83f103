use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a decoded receiver configuration is refused.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no Prometheus scrape_configs or target_allocator set")]
    NoMetricsSource,

    /// Prometheus features the receiver cannot honour, sorted by name.
    #[error("unsupported features:\n\t{}", .0.join("\n\t"))]
    UnsupportedFeatures(Vec<&'static str>),

    #[error("error checking authorization credentials file {path:?} of scrape job {job:?}: {source}")]
    CredentialsFile {
        job: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("error checking client cert file {path:?} of {scope}: {source}")]
    ClientCertFile {
        scope: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("error checking client key file {path:?} of {scope}: {source}")]
    ClientKeyFile {
        scope: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("TargetAllocator endpoint is not valid: {0}")]
    InvalidTargetAllocatorEndpoint(String),

    #[error("CollectorID is not a valid ID")]
    InvalidCollectorId,
}
