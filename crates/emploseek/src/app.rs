//! Assembles the public and admin routers over one store.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::clients::{client_router, ClientService};
use crate::config::ContractPolicyConfig;
use crate::contracts::{
    contract_router, verification_router, ContractLifecycleService, ContractNumberGenerator,
    LifecyclePolicy, VerificationService,
};
use crate::dashboard::{dashboard_router, DashboardService};
use crate::identity::{require_admin, IdentityProvider};
use crate::offers::{offer_router, public_offer_router, OfferService};
use crate::store::{ClientRepository, ContractRepository, OfferRepository};

/// Every `/api/admin/*` route sits behind the admin gate; `/api/verify` and
/// `/api/offers` are public.
pub fn api_router<S, G, P>(
    store: Arc<S>,
    numbers: Arc<G>,
    identity: Arc<P>,
    policy: &ContractPolicyConfig,
) -> Router
where
    S: ClientRepository + OfferRepository + ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
    P: IdentityProvider + 'static,
{
    let offers = Arc::new(OfferService::new(store.clone(), policy.offer_deletion));
    let contracts = Arc::new(ContractLifecycleService::new(
        store.clone(),
        numbers,
        LifecyclePolicy::from(policy),
    ));

    let admin = Router::new()
        .merge(client_router(Arc::new(ClientService::new(store.clone()))))
        .merge(offer_router(offers.clone()))
        .merge(contract_router(contracts))
        .merge(dashboard_router(Arc::new(DashboardService::new(store.clone()))))
        .route_layer(from_fn_with_state(identity, require_admin::<P>));

    Router::new()
        .merge(admin)
        .merge(public_offer_router(offers))
        .merge(verification_router(Arc::new(VerificationService::new(store))))
}
