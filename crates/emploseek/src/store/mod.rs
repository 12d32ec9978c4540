//! Relational store boundary.
//!
//! Services only see these traits, so the managed database and the in-memory tables used
//! by the development server and the tests are interchangeable. Implementations own the
//! schema guarantees: generated ids and timestamps, foreign keys, the unique contract
//! number, and referential actions on delete.

mod memory;

pub use memory::MemoryStore;

use crate::clients::{Client, ClientDraft, ClientId};
use crate::contracts::{
    Contract, ContractFields, ContractId, ContractListing, ContractNumber, ContractStatus,
    NewContract, TransitionPolicy, VerificationView,
};
use crate::offers::{Offer, OfferDraft, OfferId};

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate key value violates unique constraint")]
    Conflict,
    #[error("insert or update violates foreign key constraint \"{constraint}\"")]
    ForeignKey { constraint: &'static str },
    #[error("delete violates foreign key constraint \"{constraint}\"")]
    Referenced { constraint: &'static str },
    #[error("status transition from {from} to {to} is not allowed")]
    TransitionRefused {
        from: ContractStatus,
        to: ContractStatus,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Referential action applied to contracts when their offer disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    SetNull,
    Restrict,
}

pub trait ClientRepository: Send + Sync {
    fn insert_client(&self, draft: ClientDraft) -> Result<Client, RepositoryError>;
    fn update_client(&self, id: &ClientId, draft: ClientDraft) -> Result<Client, RepositoryError>;
    /// Cascades to every contract owned by the client.
    fn delete_client(&self, id: &ClientId) -> Result<(), RepositoryError>;
    /// Newest first.
    fn list_clients(&self) -> Result<Vec<Client>, RepositoryError>;
}

pub trait OfferRepository: Send + Sync {
    fn insert_offer(&self, draft: OfferDraft) -> Result<Offer, RepositoryError>;
    fn update_offer(&self, id: &OfferId, draft: OfferDraft) -> Result<Offer, RepositoryError>;
    fn delete_offer(&self, id: &OfferId, action: ReferentialAction) -> Result<(), RepositoryError>;
    /// Newest first.
    fn list_offers(&self) -> Result<Vec<Offer>, RepositoryError>;
}

pub trait ContractRepository: Send + Sync {
    fn insert_contract(&self, contract: NewContract) -> Result<Contract, RepositoryError>;
    /// The stored status is checked against `transitions` within the same write.
    fn update_contract(
        &self,
        id: &ContractId,
        fields: ContractFields,
        transitions: TransitionPolicy,
    ) -> Result<Contract, RepositoryError>;
    fn delete_contract(&self, id: &ContractId) -> Result<(), RepositoryError>;
    /// Newest first, joined with client and offer summaries.
    fn list_contracts(&self) -> Result<Vec<ContractListing>, RepositoryError>;
    /// Exact match on the number and on the owning client's email.
    fn find_verification(
        &self,
        number: &ContractNumber,
        email: &str,
    ) -> Result<Option<VerificationView>, RepositoryError>;
}
