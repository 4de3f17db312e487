use controller_core::telemetry::{LogFormat, TelemetryConfig};

use std::collections::BTreeSet;
use std::path::PathBuf;

pub static FILTER_NAME_ENV_VAR: &str = "FILTER_NAME";
pub static KUBECONFIG_ENV_VAR: &str = "KUBECONFIG";
pub static EXCLUDED_NAMESPACES_ENV_VAR: &str = "EXCLUDE_K8S_NS";
pub static LOG_FORMAT_ENV_VAR: &str = "LOG_FORMAT";
pub static OTLP_ENDPOINT_ENV_VAR: &str = "OPENTELEMETRY_ENDPOINT_URL";

pub static DEFAULT_FILTER_NAME: &str = "database";
pub static DEFAULT_EXCLUDED_NAMESPACES: [&str; 2] = ["kube-system", "default"];
const DEFAULT_KUBECONFIG: &str = ".kube/config";

/// Settings for a single restart run, resolved once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Case-insensitive substring a workload name must contain to be restarted
    pub filter_name: String,
    pub kubeconfig_path: PathBuf,
    /// Namespaces that are never scanned
    pub excluded_namespaces: BTreeSet<String>,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the config through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let filter_name = lookup(FILTER_NAME_ENV_VAR).unwrap_or_else(|| DEFAULT_FILTER_NAME.to_string());
        let kubeconfig_path = lookup(KUBECONFIG_ENV_VAR).map(PathBuf::from).unwrap_or_else(|| {
            PathBuf::from(lookup("HOME").unwrap_or_default()).join(DEFAULT_KUBECONFIG)
        });
        let excluded_namespaces = lookup(EXCLUDED_NAMESPACES_ENV_VAR)
            .map(|value| parse_namespace_list(&value))
            .filter(|namespaces| !namespaces.is_empty())
            .unwrap_or_else(default_excluded_namespaces);
        let log_format = lookup(LOG_FORMAT_ENV_VAR)
            .and_then(|value| value.parse::<LogFormat>().ok())
            .unwrap_or_default();

        Self {
            filter_name,
            kubeconfig_path,
            excluded_namespaces,
            log_format,
            otlp_endpoint: lookup(OTLP_ENDPOINT_ENV_VAR),
        }
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            format: self.log_format,
            otlp_endpoint: self.otlp_endpoint.clone(),
        }
    }
}

pub fn default_excluded_namespaces() -> BTreeSet<String> {
    DEFAULT_EXCLUDED_NAMESPACES.iter().map(ToString::to_string).collect()
}

fn parse_namespace_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}
