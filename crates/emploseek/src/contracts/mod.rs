//! Contract lifecycle and the public verification lookup.
//!
//! A contract binds a client to an optional offer. Numbers are generated here and made
//! unique by the store; status changes go through a configurable transition policy that
//! defaults to accepting every change, so admins can correct mistakes by hand.

pub mod domain;
pub mod lifecycle;
pub mod number;
pub mod router;
pub mod verification;

#[cfg(test)]
mod tests;

pub use domain::{
    Contract, ContractFields, ContractId, ContractListing, ContractStatus, NewContract,
    TransitionPolicy, VerificationView, VerifiedClient, VerifiedOffer,
};
pub use lifecycle::{ContractLifecycleService, ContractServiceError, LifecyclePolicy};
pub use number::{ContractNumber, ContractNumberGenerator, RandomContractNumbers};
pub use router::{contract_router, verification_router};
pub use verification::{VerificationError, VerificationQuery, VerificationService};
