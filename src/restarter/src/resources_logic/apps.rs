use super::RESTARTED_AT_ANNOTATION;

use chrono::{DateTime, SecondsFormat, Utc};
use kube::api::Patch;
use serde_json::{json, Value};

/// Strategic merge patch stamping the pod template with `restarted_at`.
///
/// The controller only rolls pods when the template changes, so every
/// restart must carry its own timestamp.
pub fn generate_restart_patch(restarted_at: DateTime<Utc>) -> Patch<Value> {
    Patch::Strategic(json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        RESTARTED_AT_ANNOTATION: restarted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    }
                }
            }
        }
    }))
}
