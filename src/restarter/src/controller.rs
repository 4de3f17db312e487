use crate::config::Config;
use crate::model::{KindReport, RestartOutcome, RunSummary, WorkloadKind, WorkloadReference};
use crate::resources_logic::{list_workloads, name_matches, restart_workload, select_namespaces};

use controller_core::{telemetry, Error, Result};

use itertools::Itertools;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use kube::{
    api::{Api, ResourceExt},
    client::Client,
    config::{KubeConfigOptions, Kubeconfig},
};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::path::Path;
use tracing::*;

/// Build a client for the current context of the kubeconfig at `path`.
pub async fn client_from_kubeconfig(path: &Path) -> Result<Client> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(Error::KubeconfigError)?;
    let config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(Error::KubeconfigError)?;
    Client::try_from(config).map_err(Error::KubeError)
}

/// Drives a single restart pass over every selected namespace.
pub struct Restarter {
    client: Client,
    config: Config,
}

impl Restarter {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub async fn try_from_config(config: Config) -> Result<Self> {
        let client = client_from_kubeconfig(&config.kubeconfig_path).await?;
        Ok(Self::new(client, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Restart every matching workload outside the excluded namespaces.
    ///
    /// Only a failure to list namespaces is returned; listing and patch
    /// failures further down are logged and recorded in the summary.
    #[instrument(skip(self), fields(filter_name = %self.config.filter_name, trace_id))]
    pub async fn run(&self) -> Result<RunSummary> {
        let trace_id = telemetry::get_trace_id();
        Span::current().record("trace_id", &field::display(&trace_id));

        info!(
            "Excluding namespaces: {}",
            self.config.excluded_namespaces.iter().join(","),
        );
        let namespaces = select_namespaces(self.client.clone(), &self.config.excluded_namespaces).await?;
        info!("Found {} namespaces", namespaces.len());

        let mut summary = RunSummary::new(&self.config.filter_name);
        for ns in namespaces {
            let name = ns.name_any();
            self.restart_namespace(&name, &mut summary).await;
            summary.namespaces += 1;
        }

        info!(
            "Graceful restart process completed for workloads containing keyword {}: {} namespaces, {} scanned, {} restarted, {} failed restarts, {} failed scans",
            summary.filter_name,
            summary.namespaces,
            summary.scanned,
            summary.restarted.len(),
            summary.failed_restarts.len(),
            summary.failed_scans.len(),
        );
        Ok(summary)
    }

    async fn restart_namespace(&self, ns: &str, summary: &mut RunSummary) {
        info!("Searching namespace {}", ns);
        for kind in WorkloadKind::ALL {
            let report = match kind {
                WorkloadKind::Deployment => {
                    let api: Api<Deployment> = Api::namespaced(self.client.clone(), ns);
                    self.restart_namespaced_resources(api, kind, ns).await
                }
                WorkloadKind::StatefulSet => {
                    let api: Api<StatefulSet> = Api::namespaced(self.client.clone(), ns);
                    self.restart_namespaced_resources(api, kind, ns).await
                }
                WorkloadKind::DaemonSet => {
                    let api: Api<DaemonSet> = Api::namespaced(self.client.clone(), ns);
                    self.restart_namespaced_resources(api, kind, ns).await
                }
            };

            match report {
                Ok(report) => summary.record(report),
                Err(err) => {
                    warn!("Failed to list {} in namespace {}, skipping: {}", kind, ns, err);
                    summary.record_failed_scan(ns, kind);
                }
            }
        }
    }

    async fn restart_namespaced_resources<R>(
        &self,
        resources: Api<R>,
        kind: WorkloadKind,
        ns: &str,
    ) -> Result<KindReport>
    where
        R: ResourceExt + Clone + DeserializeOwned + Debug,
    {
        let mut report = KindReport::new(kind, ns);
        for resource in list_workloads(&resources).await? {
            let name = resource.name_any();
            info!("Scanning {} {}/{}", kind, ns, name);

            if name_matches(&name, &self.config.filter_name) {
                let workload = WorkloadReference::new(kind, ns, &name);
                let outcome = match restart_workload(&resources, &name).await {
                    Ok(_) => {
                        info!("Restarted {}", workload);
                        RestartOutcome::Restarted(workload)
                    }
                    Err(err) => {
                        warn!("Failed to restart {}: {}", workload, err);
                        RestartOutcome::Failed(workload, err)
                    }
                };
                report.outcomes.push(outcome);
            }
            report.scanned.push(name);
        }

        Ok(report)
    }
}
