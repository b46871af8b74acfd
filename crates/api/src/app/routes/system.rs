use std::sync::Arc;

use axum::{Json, extract::Extension};
use serde_json::{Value, json};

use dancu_infra::config::DispatchMode;

use crate::app::dto::WhoAmI;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Liveness plus the change-dispatch health counters.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Json<Value> {
    let dispatch = match services.dispatch_mode {
        DispatchMode::Sync => "sync",
        DispatchMode::Async => "async",
    };

    Json(json!({
        "status": "ok",
        "dispatch": dispatch,
        "publish_failures": services.notifier.publish_failures(),
    }))
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<WhoAmI> {
    Json(WhoAmI::from(&principal))
}
