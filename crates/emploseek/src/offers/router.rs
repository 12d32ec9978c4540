use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};

use super::domain::{OfferDraft, OfferId, OfferUpdate};
use super::service::OfferService;
use crate::http::{deleted_response, json_body};
use crate::store::{OfferRepository, RepositoryError};

/// Admin surface. Callers layer the admin gate over it.
pub fn offer_router<R>(service: Arc<OfferService<R>>) -> Router
where
    R: OfferRepository + 'static,
{
    Router::new()
        .route(
            "/api/admin/offers",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/admin/offers/:id",
            put(update_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(service)
}

/// Public listing of visible offers.
pub fn public_offer_router<R>(service: Arc<OfferService<R>>) -> Router
where
    R: OfferRepository + 'static,
{
    Router::new()
        .route("/api/offers", get(public_list_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<OfferService<R>>>) -> Response
where
    R: OfferRepository + 'static,
{
    match service.list() {
        Ok(offers) => (StatusCode::OK, Json(offers)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn public_list_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
) -> Response
where
    R: OfferRepository + 'static,
{
    match service.list_active() {
        Ok(offers) => (StatusCode::OK, Json(offers)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    payload: Result<Json<OfferDraft>, JsonRejection>,
) -> Response
where
    R: OfferRepository + 'static,
{
    let draft = match json_body(payload) {
        Ok(draft) => draft,
        Err(response) => return response,
    };

    match service.create(draft) {
        Ok(offer) => (StatusCode::OK, Json(offer)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<OfferUpdate>, JsonRejection>,
) -> Response
where
    R: OfferRepository + 'static,
{
    let draft = match json_body(payload) {
        Ok(update) => OfferDraft::from(update),
        Err(response) => return response,
    };
    let Some(id) = OfferId::parse(&id) else {
        return RepositoryError::NotFound.into_response();
    };

    match service.update(&id, draft) {
        Ok(offer) => (StatusCode::OK, Json(offer)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: OfferRepository + 'static,
{
    let Some(id) = OfferId::parse(&id) else {
        return deleted_response();
    };

    match service.delete(&id) {
        Ok(()) => deleted_response(),
        Err(err) => err.into_response(),
    }
}
