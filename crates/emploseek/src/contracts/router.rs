use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use tracing::debug;

use super::domain::{ContractFields, ContractId};
use super::lifecycle::ContractLifecycleService;
use super::number::ContractNumberGenerator;
use super::verification::{VerificationError, VerificationQuery, VerificationService};
use crate::http::{deleted_response, json_body};
use crate::identity::Principal;
use crate::store::{ContractRepository, RepositoryError};

/// Admin surface over the lifecycle service. Callers layer the admin gate over it.
pub fn contract_router<R, G>(service: Arc<ContractLifecycleService<R, G>>) -> Router
where
    R: ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
{
    Router::new()
        .route(
            "/api/admin/contracts",
            get(list_handler::<R, G>).post(create_handler::<R, G>),
        )
        .route(
            "/api/admin/contracts/:id",
            put(update_handler::<R, G>).delete(delete_handler::<R, G>),
        )
        .with_state(service)
}

/// Public, unauthenticated lookup.
pub fn verification_router<R>(service: Arc<VerificationService<R>>) -> Router
where
    R: ContractRepository + 'static,
{
    Router::new()
        .route("/api/verify", get(verify_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R, G>(
    State(service): State<Arc<ContractLifecycleService<R, G>>>,
) -> Response
where
    R: ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
{
    match service.list() {
        Ok(contracts) => (StatusCode::OK, Json(contracts)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<R, G>(
    State(service): State<Arc<ContractLifecycleService<R, G>>>,
    principal: Option<Extension<Principal>>,
    payload: Result<Json<ContractFields>, JsonRejection>,
) -> Response
where
    R: ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
{
    let fields = match json_body(payload) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    if let Some(Extension(principal)) = &principal {
        debug!(subject = %principal.subject, "contract create requested");
    }

    match service.create(fields) {
        Ok(contract) => (StatusCode::OK, Json(contract)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<R, G>(
    State(service): State<Arc<ContractLifecycleService<R, G>>>,
    Path(id): Path<String>,
    payload: Result<Json<ContractFields>, JsonRejection>,
) -> Response
where
    R: ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
{
    let fields = match json_body(payload) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    let Some(id) = ContractId::parse(&id) else {
        return RepositoryError::NotFound.into_response();
    };

    match service.update(&id, fields) {
        Ok(contract) => (StatusCode::OK, Json(contract)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<R, G>(
    State(service): State<Arc<ContractLifecycleService<R, G>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
{
    let Some(id) = ContractId::parse(&id) else {
        return deleted_response();
    };

    match service.delete(&id) {
        Ok(()) => deleted_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn verify_handler<R>(
    State(service): State<Arc<VerificationService<R>>>,
    query: Result<Query<VerificationQuery>, QueryRejection>,
) -> Response
where
    R: ContractRepository + 'static,
{
    let Ok(Query(query)) = query else {
        return VerificationError::MissingCredentials.into_response();
    };

    match service.verify(&query) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}
