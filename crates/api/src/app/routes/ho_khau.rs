use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use dancu_auth::Permission;
use dancu_core::{DomainError, HouseholdId};
use dancu_population::HouseholdDraft;

use crate::app::errors;
use crate::app::routes::common::{guard, parse_id};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn list_households(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.households.list() {
        Ok(households) => Json(households).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_household(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: HouseholdId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.households.get(id) {
        Ok(household) => Json(household).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Fee read model. 404 until the listener has computed it, and after the
/// household is deleted.
pub async fn get_household_fee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let id: HouseholdId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.fees.get(id) {
        Ok(Some(fee)) => Json(fee).into_response(),
        Ok(None) => errors::domain_error_to_response(DomainError::NotFound),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_household(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<HouseholdDraft>, JsonRejection>,
) -> Response {
    let body = match guard(&principal, Permission::HOUSEHOLDS_WRITE, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let Json(draft) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_rejection(rej),
    };

    match services.households.create(draft, &principal.actor()) {
        Ok(household) => (StatusCode::CREATED, Json(household)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_household(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Result<Json<HouseholdDraft>, JsonRejection>,
) -> Response {
    let body = match guard(&principal, Permission::HOUSEHOLDS_WRITE, body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let id: HouseholdId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(draft) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_rejection(rej),
    };

    match services.households.update(id, draft, &principal.actor()) {
        Ok(household) => Json(household).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_household(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let id: HouseholdId = match guard(&principal, Permission::HOUSEHOLDS_WRITE, id).and_then(|id| parse_id(&id)) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.households.delete(id, &principal.actor()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
