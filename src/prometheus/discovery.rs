use super::{HttpClientConfig, StrictYaml};
use crate::inline::split_inline;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;
use url::Url;

/// A mechanism that discovers scrape targets for a job.
///
/// Checks that only care about a certain capability of a mechanism ask for
/// it through this trait instead of matching on concrete types, so new
/// mechanisms only need to implement the capabilities they have.
pub trait DiscoveryConfig: Debug {
    /// Short name of the mechanism, as used in its `<name>_sd_configs` key.
    fn name(&self) -> &'static str;

    /// The HTTP client settings this mechanism uses to reach its API, if it
    /// has any of its own.
    fn http_client_config(&self) -> Option<&HttpClientConfig> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticConfig {
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl DiscoveryConfig for StaticConfig {
    fn name(&self) -> &'static str {
        "static"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSdConfig {
    pub files: Vec<String>,
    #[serde(default = "default_file_refresh", with = "humantime_serde")]
    pub refresh_interval: Duration,
}

fn default_file_refresh() -> Duration {
    Duration::from_secs(5 * 60)
}

impl DiscoveryConfig for FileSdConfig {
    fn name(&self) -> &'static str {
        "file"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DnsSdConfig {
    pub names: Vec<String>,
    #[serde(default, rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default)]
    pub port: u16,
    #[serde(default = "default_dns_refresh", with = "humantime_serde")]
    pub refresh_interval: Duration,
}

fn default_dns_refresh() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    #[default]
    Srv,
    A,
    Aaaa,
    Mx,
    Ns,
}

impl DiscoveryConfig for DnsSdConfig {
    fn name(&self) -> &'static str {
        "dns"
    }
}

/// Discovers targets by polling an HTTP endpoint that returns target groups.
///
/// The client used to poll the endpoint is configured inline. It is decoded
/// so that documents written for Prometheus are accepted, but nothing
/// inspects it: the receiver serves these settings on behalf of the target
/// allocator and never reads files through them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpSdConfig {
    pub url: String,

    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,

    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HttpSdFields {
    #[serde(default)]
    url: String,
    #[serde(default = "default_http_refresh", with = "humantime_serde")]
    refresh_interval: Duration,
}

fn default_http_refresh() -> Duration {
    Duration::from_secs(60)
}

impl<'de> Deserialize<'de> for HttpSdConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (fields, http_client_config): (HttpSdFields, HttpClientConfig) =
            split_inline(deserializer)?;

        if fields.url.is_empty() {
            return Err(D::Error::custom("URL is missing"));
        }

        let url = Url::parse(&fields.url)
            .map_err(|err| D::Error::custom(format!("invalid URL: {err}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(D::Error::custom("URL scheme must be 'http' or 'https'"));
        }

        Ok(Self {
            url: fields.url,
            refresh_interval: fields.refresh_interval,
            http_client_config,
        })
    }
}

impl StrictYaml for HttpSdConfig {}

impl DiscoveryConfig for HttpSdConfig {
    fn name(&self) -> &'static str {
        "http"
    }
}

/// Discovers targets through the Kubernetes API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KubernetesSdConfig {
    pub role: KubernetesRole,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_server: Option<Url>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub kubeconfig_file: String,

    #[serde(skip_serializing_if = "NamespaceDiscovery::is_empty")]
    pub namespaces: NamespaceDiscovery,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<KubernetesSelector>,

    #[serde(flatten)]
    pub http_client_config: HttpClientConfig,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KubernetesFields {
    role: Option<KubernetesRole>,
    #[serde(default)]
    api_server: Option<Url>,
    #[serde(default)]
    kubeconfig_file: String,
    #[serde(default)]
    namespaces: NamespaceDiscovery,
    #[serde(default)]
    selectors: Vec<KubernetesSelector>,
}

impl<'de> Deserialize<'de> for KubernetesSdConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (fields, http_client_config): (KubernetesFields, HttpClientConfig) =
            split_inline(deserializer)?;

        let role = fields.role.ok_or_else(|| {
            D::Error::custom(
                "role missing (one of: pod, service, endpoints, endpointslice, node, ingress)",
            )
        })?;

        if fields.api_server.is_some() && !fields.kubeconfig_file.is_empty() {
            return Err(D::Error::custom(
                "cannot use 'kubeconfig_file' and 'api_server' simultaneously",
            ));
        }

        Ok(Self {
            role,
            api_server: fields.api_server,
            kubeconfig_file: fields.kubeconfig_file,
            namespaces: fields.namespaces,
            selectors: fields.selectors,
            http_client_config,
        })
    }
}

impl DiscoveryConfig for KubernetesSdConfig {
    fn name(&self) -> &'static str {
        "kubernetes"
    }

    fn http_client_config(&self) -> Option<&HttpClientConfig> {
        Some(&self.http_client_config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KubernetesRole {
    Pod,
    Service,
    Endpoints,
    EndpointSlice,
    Node,
    Ingress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamespaceDiscovery {
    pub own_namespace: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
}

impl NamespaceDiscovery {
    pub fn is_empty(&self) -> bool {
        !self.own_namespace && self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KubernetesSelector {
    pub role: KubernetesRole,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn kubernetes_exposes_its_http_client() {
        let config: KubernetesSdConfig = serde_yaml::from_str(
            r#"
            role: endpointslice
            namespaces:
              names: [monitoring]
            tls_config:
              ca_file: /var/run/secrets/ca.crt
            "#,
        )
        .unwrap();

        assert_eq!(config.role, KubernetesRole::EndpointSlice);
        assert_eq!(config.namespaces.names, vec!["monitoring".to_string()]);

        let client = config.http_client_config().expect("kubernetes has a client");
        assert_eq!(client.tls_config.ca_file, "/var/run/secrets/ca.crt");
    }

    #[rstest]
    #[case("namespaces: {}", "role missing")]
    #[case(
        "role: pod\napi_server: https://k8s.local\nkubeconfig_file: /etc/kube",
        "simultaneously"
    )]
    #[case("role: pod\nwatch: true", "unknown field `watch`")]
    fn invalid_kubernetes_configs(#[case] input: &str, #[case] expected: &str) {
        let err = serde_yaml::from_str::<KubernetesSdConfig>(input).unwrap_err();
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[rstest]
    #[case("refresh_interval: 30s", "URL is missing")]
    #[case("url: ftp://example.com", "URL scheme must be 'http' or 'https'")]
    #[case("url: http://example.com\nheaders: {}", "unknown field `headers`")]
    fn invalid_http_sd_configs(#[case] input: &str, #[case] expected: &str) {
        let err = HttpSdConfig::from_yaml_str(input).unwrap_err();
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[test]
    fn http_sd_reads_its_client_inline() {
        let config = HttpSdConfig::from_yaml_str(
            r#"
            url: https://sd.example.com/targets
            refresh_interval: 15s
            tls_config:
              ca_file: /etc/sd/ca.pem
            authorization:
              credentials_file: /etc/sd/token
            "#,
        )
        .unwrap();

        assert_eq!(config.url, "https://sd.example.com/targets");
        assert_eq!(config.refresh_interval, Duration::from_secs(15));
        assert_eq!(config.http_client_config.tls_config.ca_file, "/etc/sd/ca.pem");
        assert!(config.http_client_config.follow_redirects);
    }

    #[test]
    fn only_kubernetes_carries_a_client() {
        let file = FileSdConfig {
            files: vec!["targets.json".to_string()],
            refresh_interval: default_file_refresh(),
        };
        let http = HttpSdConfig::from_yaml_str("url: http://example.com/sd").unwrap();

        assert!(file.http_client_config().is_none());
        assert!(http.http_client_config().is_none());
        assert!(StaticConfig::default().http_client_config().is_none());
    }
}
