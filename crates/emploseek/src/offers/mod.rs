//! Job, internship and language-stay offers.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    Offer, OfferDeletionPolicy, OfferDraft, OfferId, OfferSummary, OfferUpdate, OpportunityType,
};
pub use router::{offer_router, public_offer_router};
pub use service::OfferService;
