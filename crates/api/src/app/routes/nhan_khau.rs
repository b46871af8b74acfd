use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use dancu_auth::Permission;
use dancu_core::CitizenId;
use dancu_population::CitizenDraft;

use crate::app::dto::CitizenFilter;
use crate::app::errors;
use crate::app::routes::common::{guard, parse_id};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn list_citizens(
    Extension(services): Extension<Arc<AppServices>>,
    filter: Result<Query<CitizenFilter>, QueryRejection>,
) -> Response {
    let Query(filter) = match filter {
        Ok(q) => q,
        Err(rej) => return errors::query_rejection(rej),
    };

    let result = filter
        .household_id()
        .and_then(|household_id| services.citizens.list(household_id));

    match result {
        Ok(citizens) => Json(citizens).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_citizen(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: CitizenId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.citizens.get(id) {
        Ok(citizen) => Json(citizen).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_citizen(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<CitizenDraft>, JsonRejection>,
) -> Response {
    let body = match guard(&principal, Permission::CITIZENS_WRITE, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let Json(draft) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_rejection(rej),
    };

    match services.citizens.create(draft, &principal.actor()) {
        Ok(citizen) => (StatusCode::CREATED, Json(citizen)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_citizen(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<CitizenDraft>, JsonRejection>,
) -> Response {
    let body = match guard(&principal, Permission::CITIZENS_WRITE, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let id: CitizenId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(draft) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_rejection(rej),
    };

    match services.citizens.update(id, draft, &principal.actor()) {
        Ok(citizen) => Json(citizen).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_citizen(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: CitizenId = match guard(&principal, Permission::CITIZENS_WRITE, id).and_then(|id| parse_id(&id)) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.citizens.delete(id, &principal.actor()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
