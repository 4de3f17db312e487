use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubeconfig Error: {0}")]
    KubeconfigError(#[source] kube::config::KubeconfigError),

    #[error("Kube Error: {0}")]
    KubeError(#[source] kube::Error),

    #[error("Telemetry Error: {0}")]
    TelemetryError(String),
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Log and trace integrations
pub mod telemetry;
