use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::contracts::router::{
    create_handler, delete_handler, list_handler, update_handler, verify_handler,
};
use crate::contracts::{
    contract_router, verification_router, ContractLifecycleService, VerificationQuery,
    VerificationService,
};

#[tokio::test]
async fn create_handler_returns_generated_number() {
    let (service, store) = build_service(permissive(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());

    let response = create_handler::<_, ScriptedNumbers>(
        State(Arc::new(service)),
        None,
        Ok(Json(pending_fields(&client))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let number = payload["contract_number"].as_str().expect("number present");
    assert!(number.starts_with("CTR-"));
    assert_eq!(payload["status"], "pending");
    assert_eq!(payload["type"], "emploi");
    assert_eq!(payload["client_id"], json!(client.id));
    assert!(payload["notes"].is_null());
}

#[tokio::test]
async fn create_route_rejects_unknown_status_with_error_body() {
    let (service, store) = build_service(permissive(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());
    let router = contract_router(Arc::new(service));

    let body = json!({
        "client_id": client.id,
        "type": "emploi",
        "status": "archived",
        "start_date": "2024-01-01",
    });
    let response = router
        .oneshot(
            Request::post("/api/admin/contracts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
    assert!(store_is_empty(&store));
}

fn store_is_empty(store: &crate::store::MemoryStore) -> bool {
    use crate::store::ContractRepository;
    store.list_contracts().expect("list").is_empty()
}

#[tokio::test]
async fn create_route_ignores_client_supplied_number() {
    let (service, store) = build_service(permissive(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());
    let router = contract_router(Arc::new(service));

    let body = json!({
        "contract_number": "CTR-2000-11111",
        "client_id": client.id,
        "type": "sejour",
        "status": "active",
        "start_date": "2024-07-01",
        "end_date": "2024-08-31",
        "notes": "sejour linguistique a Dublin",
    });
    let response = router
        .oneshot(
            Request::post("/api/admin/contracts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_ne!(payload["contract_number"], "CTR-2000-11111");
    assert_eq!(payload["end_date"], "2024-08-31");
}

#[tokio::test]
async fn update_handler_maps_unknown_ids_to_not_found() {
    let (service, store) = build_service(permissive(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());
    let service = Arc::new(service);

    for id in ["not-a-uuid", "6f1c1a52-0d55-4a53-9d0c-3f2b0fb0a9b1"] {
        let response = update_handler(
            State(service.clone()),
            Path(id.to_string()),
            Ok(Json(pending_fields(&client))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let payload = read_json_body(response).await;
        assert!(payload["error"].is_string());
    }
}

#[tokio::test]
async fn update_handler_reports_refused_transition() {
    let (service, store) = build_service(guarded(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());
    let mut fields = pending_fields(&client);
    fields.status = crate::contracts::ContractStatus::Expired;
    let contract = service.create(fields.clone()).expect("contract created");

    fields.status = crate::contracts::ContractStatus::Pending;
    let response = update_handler(
        State(Arc::new(service)),
        Path(contract.id.to_string()),
        Ok(Json(fields)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        "status transition from expired to pending is not allowed"
    );
}

#[tokio::test]
async fn delete_handler_reports_success_even_when_absent() {
    let (service, _store) = build_service(permissive(), ScriptedNumbers::default());
    let response = delete_handler(
        State(Arc::new(service)),
        Path("6f1c1a52-0d55-4a53-9d0c-3f2b0fb0a9b1".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn list_handler_surfaces_store_message_as_internal_error() {
    let service = Arc::new(ContractLifecycleService::new(
        Arc::new(UnavailableStore),
        Arc::new(ScriptedNumbers::default()),
        permissive(),
    ));

    let response = list_handler(State(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "store unavailable: database offline");
}

#[tokio::test]
async fn verify_handler_maps_errors_to_statuses() {
    let (service, store) = build_service(permissive(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());
    let contract = service
        .create(pending_fields(&client))
        .expect("contract created");
    let verification = Arc::new(VerificationService::new(store));

    let missing = verify_handler(
        State(verification.clone()),
        Ok(Query(VerificationQuery {
            contract_number: Some(contract.contract_number.to_string()),
            email: None,
        })),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json_body(missing).await["error"],
        "Numero de contrat et email requis"
    );

    let mismatch = verify_handler(
        State(verification.clone()),
        Ok(Query(VerificationQuery::new(
            contract.contract_number.as_str(),
            "wrong@x.com",
        ))),
    )
    .await;
    assert_eq!(mismatch.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        read_json_body(mismatch).await["error"],
        "Contrat non trouve. Verifiez vos informations."
    );

    let found = verify_handler(
        State(verification),
        Ok(Query(VerificationQuery::new(
            contract.contract_number.as_str(),
            "jean@x.com",
        ))),
    )
    .await;
    assert_eq!(found.status(), StatusCode::OK);
    let payload = read_json_body(found).await;
    assert_eq!(payload["status"], "pending");
    assert_eq!(payload["client"]["email"], "jean@x.com");
}

#[tokio::test]
async fn verify_route_reads_query_string() {
    let (service, store) = build_service(permissive(), ScriptedNumbers::default());
    let client = seed_client(&store, jean());
    let contract = service
        .create(pending_fields(&client))
        .expect("contract created");
    let router = verification_router(Arc::new(VerificationService::new(store)));

    let uri = format!(
        "/api/verify?contract_number={}&email=jean%40x.com",
        contract.contract_number
    );
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["contract_number"], contract.contract_number.as_str());
    assert!(payload["client"].get("phone").is_none());
}
