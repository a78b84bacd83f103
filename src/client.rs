//! Generic HTTP client settings, written in the receiver's own convention.

use crate::inline::InlineFields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Settings for an HTTP client talking to a single endpoint. These are
/// written inline in the block that owns them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSettings {
    /// Kept as written, validation is up to the owner.
    pub endpoint: String,

    #[serde(skip_serializing_if = "TlsClientSettings::is_empty")]
    pub tls: TlsClientSettings,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(
        with = "humantime_serde::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,

    /// Zero uses the client's default size.
    pub read_buffer_size: usize,

    /// Zero uses the client's default size.
    pub write_buffer_size: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,
}

impl InlineFields for ClientSettings {
    const FIELDS: &'static [&'static str] = &[
        "endpoint",
        "tls",
        "headers",
        "timeout",
        "read_buffer_size",
        "write_buffer_size",
        "compression",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsClientSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ca_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    pub insecure: bool,
    pub insecure_skip_verify: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server_name_override: String,
}

impl TlsClientSettings {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Gzip,
    Zlib,
    Deflate,
    Snappy,
    Zstd,
}
