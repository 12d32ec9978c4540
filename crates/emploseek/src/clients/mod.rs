//! Client records managed from the admin dashboard.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{Client, ClientDraft, ClientId, ClientSummary};
pub use router::client_router;
pub use service::ClientService;
