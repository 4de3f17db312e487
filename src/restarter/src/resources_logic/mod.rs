mod apps;
mod core;

pub use self::apps::generate_restart_patch;
pub use self::core::*;

/// Pod template annotation `kubectl rollout restart` bumps to recreate pods.
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";
const FIELD_MANAGER: &str = "kube-restarter";
