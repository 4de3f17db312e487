use controller_core::Error;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::Resource;
use std::fmt;

/// Workload controllers eligible for a rolling restart, in processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 3] = [
        WorkloadKind::Deployment,
        WorkloadKind::StatefulSet,
        WorkloadKind::DaemonSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => Deployment::KIND,
            WorkloadKind::StatefulSet => StatefulSet::KIND,
            WorkloadKind::DaemonSet => DaemonSet::KIND,
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkloadReference {
    pub kind: WorkloadKind,
    pub namespace: String,
    pub name: String,
}

impl WorkloadReference {
    pub fn new(kind: WorkloadKind, namespace: &str, name: &str) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for WorkloadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

#[derive(Debug)]
pub enum RestartOutcome {
    Restarted(WorkloadReference),
    Failed(WorkloadReference, Error),
}

/// Result of scanning one kind of workload in one namespace.
#[derive(Debug)]
pub struct KindReport {
    pub kind: WorkloadKind,
    pub namespace: String,
    /// Names of every listed object, in API order
    pub scanned: Vec<String>,
    /// One entry per object whose name matched the filter
    pub outcomes: Vec<RestartOutcome>,
}

impl KindReport {
    pub fn new(kind: WorkloadKind, namespace: &str) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            scanned: Vec::new(),
            outcomes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub filter_name: String,
    pub namespaces: usize,
    pub scanned: usize,
    pub restarted: Vec<WorkloadReference>,
    pub failed_restarts: Vec<WorkloadReference>,
    /// (namespace, kind) pairs whose listing failed
    pub failed_scans: Vec<(String, WorkloadKind)>,
}

impl RunSummary {
    pub fn new(filter_name: &str) -> Self {
        Self {
            filter_name: filter_name.to_string(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, report: KindReport) {
        self.scanned += report.scanned.len();
        for outcome in report.outcomes {
            match outcome {
                RestartOutcome::Restarted(workload) => self.restarted.push(workload),
                RestartOutcome::Failed(workload, _) => self.failed_restarts.push(workload),
            }
        }
    }

    pub fn record_failed_scan(&mut self, namespace: &str, kind: WorkloadKind) {
        self.failed_scans.push((namespace.to_string(), kind));
    }

    pub fn is_degraded(&self) -> bool {
        !self.failed_restarts.is_empty() || !self.failed_scans.is_empty()
    }
}
