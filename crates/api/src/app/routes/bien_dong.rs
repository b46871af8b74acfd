use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use dancu_auth::Permission;
use dancu_core::ChangeRecordId;
use dancu_population::ChangeRecordDraft;

use crate::app::errors;
use crate::app::routes::common::{guard, parse_id};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn list_change_records(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.change_records.list() {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_change_record(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: ChangeRecordId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.change_records.get(id) {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_change_record(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<ChangeRecordDraft>, JsonRejection>,
) -> Response {
    let body = match guard(&principal, Permission::CHANGE_RECORDS_WRITE, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let Json(draft) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_rejection(rej),
    };

    match services.change_records.create(draft, &principal.actor()) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_change_record(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<ChangeRecordDraft>, JsonRejection>,
) -> Response {
    let body = match guard(&principal, Permission::CHANGE_RECORDS_WRITE, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let id: ChangeRecordId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(draft) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_rejection(rej),
    };

    match services.change_records.update(id, draft, &principal.actor()) {
        Ok(record) => Json(record).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_change_record(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ChangeRecordId = match guard(&principal, Permission::CHANGE_RECORDS_WRITE, id)
        .and_then(|id| parse_id(&id))
    {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.change_records.delete(id, &principal.actor()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
