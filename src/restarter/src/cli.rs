use controller_core::{telemetry, Error};
use kube_restarter::{Config, Restarter};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    telemetry::init(&config.telemetry()).await?;

    info!(
        "Restarting workloads containing keyword {} using {}",
        config.filter_name,
        config.kubeconfig_path.display(),
    );

    let restarter = match Restarter::try_from_config(config).await {
        Ok(restarter) => restarter,
        Err(err @ Error::KubeconfigError(_)) => {
            error!("Failed to load Kubernetes configuration: {}", err);
            return Ok(());
        }
        Err(err) => {
            error!("Failed to create Kubernetes client: {}", err);
            return Ok(());
        }
    };

    // a degraded run still exits cleanly, the log is the only report
    match restarter.run().await {
        Ok(summary) if summary.is_degraded() => {
            warn!(
                "Some workloads containing keyword {} were not restarted",
                restarter.config().filter_name,
            );
        }
        Ok(_) => {}
        Err(err) => error!("Failed to list namespaces, nothing was restarted: {}", err),
    }
    Ok(())
}
