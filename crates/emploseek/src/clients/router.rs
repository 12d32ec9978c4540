use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};

use super::domain::{ClientDraft, ClientId};
use super::service::ClientService;
use crate::http::{deleted_response, json_body};
use crate::store::{ClientRepository, RepositoryError};

pub fn client_router<R>(service: Arc<ClientService<R>>) -> Router
where
    R: ClientRepository + 'static,
{
    Router::new()
        .route(
            "/api/admin/clients",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/admin/clients/:id",
            put(update_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<ClientService<R>>>) -> Response
where
    R: ClientRepository + 'static,
{
    match service.list() {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    payload: Result<Json<ClientDraft>, JsonRejection>,
) -> Response
where
    R: ClientRepository + 'static,
{
    let draft = match json_body(payload) {
        Ok(draft) => draft,
        Err(response) => return response,
    };

    match service.create(draft) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<ClientDraft>, JsonRejection>,
) -> Response
where
    R: ClientRepository + 'static,
{
    let draft = match json_body(payload) {
        Ok(draft) => draft,
        Err(response) => return response,
    };
    let Some(id) = ClientId::parse(&id) else {
        return RepositoryError::NotFound.into_response();
    };

    match service.update(&id, draft) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<ClientService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ClientRepository + 'static,
{
    // An id that cannot exist deletes nothing, like any other absent id.
    let Some(id) = ClientId::parse(&id) else {
        return deleted_response();
    };

    match service.delete(&id) {
        Ok(()) => deleted_response(),
        Err(err) => err.into_response(),
    }
}
