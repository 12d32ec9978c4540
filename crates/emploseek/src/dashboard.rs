//! Admin landing page figures.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::contracts::{ContractId, ContractListing, ContractNumber, ContractStatus};
use crate::store::{ClientRepository, ContractRepository, OfferRepository, RepositoryError};

const RECENT_CONTRACTS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub clients: usize,
    pub contracts: usize,
    pub offers: usize,
    pub recent_contracts: Vec<RecentContract>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentContract {
    pub id: ContractId,
    pub contract_number: ContractNumber,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
    pub client: Option<RecentContractClient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentContractClient {
    pub first_name: String,
    pub last_name: String,
}

impl From<ContractListing> for RecentContract {
    fn from(listing: ContractListing) -> Self {
        Self {
            id: listing.contract.id,
            contract_number: listing.contract.contract_number,
            status: listing.contract.fields.status,
            created_at: listing.contract.created_at,
            client: listing.clients.map(|client| RecentContractClient {
                first_name: client.first_name,
                last_name: client.last_name,
            }),
        }
    }
}

pub struct DashboardService<S> {
    store: Arc<S>,
}

impl<S> DashboardService<S>
where
    S: ClientRepository + OfferRepository + ContractRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn summary(&self) -> Result<DashboardSummary, RepositoryError> {
        let clients = self.store.list_clients()?.len();
        let offers = self.store.list_offers()?.len();
        let contracts = self.store.list_contracts()?;

        Ok(DashboardSummary {
            clients,
            contracts: contracts.len(),
            offers,
            recent_contracts: contracts
                .into_iter()
                .take(RECENT_CONTRACTS)
                .map(RecentContract::from)
                .collect(),
        })
    }
}

pub fn dashboard_router<S>(service: Arc<DashboardService<S>>) -> Router
where
    S: ClientRepository + OfferRepository + ContractRepository + 'static,
{
    Router::new()
        .route("/api/admin/dashboard", get(summary_handler::<S>))
        .with_state(service)
}

pub(crate) async fn summary_handler<S>(State(service): State<Arc<DashboardService<S>>>) -> Response
where
    S: ClientRepository + OfferRepository + ContractRepository + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => err.into_response(),
    }
}
