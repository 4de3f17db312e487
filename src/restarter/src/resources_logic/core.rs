use super::{generate_restart_patch, FIELD_MANAGER};
use controller_core::{Error, Result};

use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{Api, ListParams, PatchParams, ResourceExt},
    client::Client,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Case-insensitive substring match of a workload name against the filter.
///
/// An empty `keyword` matches every name.
pub fn name_matches(name: &str, keyword: &str) -> bool {
    name.to_lowercase().contains(&keyword.to_lowercase())
}

/// Drops namespaces whose name is excluded, keeping the API server's order.
pub fn filter_namespaces(mut namespaces: Vec<Namespace>, excluded: &BTreeSet<String>) -> Vec<Namespace> {
    namespaces.retain(|ns| !excluded.contains(&ns.name_any()));
    namespaces
}

pub async fn select_namespaces(client: Client, excluded: &BTreeSet<String>) -> Result<Vec<Namespace>> {
    let namespaces: Api<Namespace> = Api::all(client);
    let namespaces = namespaces
        .list(&ListParams::default())
        .await
        .map_err(Error::KubeError)?;

    Ok(filter_namespaces(namespaces.items, excluded))
}

pub async fn list_workloads<R>(resources: &Api<R>) -> Result<Vec<R>>
where
    R: Clone + DeserializeOwned + Debug,
{
    let list = resources
        .list(&ListParams::default())
        .await
        .map_err(Error::KubeError)?;
    Ok(list.items)
}

/// Triggers a rolling restart of the named workload through its pod template.
pub async fn restart_workload<R>(resources: &Api<R>, name: &str) -> Result<R>
where
    R: Clone + DeserializeOwned + Debug,
{
    let params = PatchParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    };
    let patch = generate_restart_patch(chrono::Utc::now());
    resources
        .patch(name, &params, &patch)
        .await
        .map_err(Error::KubeError)
}
