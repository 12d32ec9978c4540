use std::sync::Arc;

use tracing::info;

use super::domain::{Offer, OfferDeletionPolicy, OfferDraft, OfferId};
use crate::store::{OfferRepository, ReferentialAction, RepositoryError};

pub struct OfferService<R> {
    repository: Arc<R>,
    deletion: OfferDeletionPolicy,
}

impl<R> OfferService<R>
where
    R: OfferRepository + 'static,
{
    pub fn new(repository: Arc<R>, deletion: OfferDeletionPolicy) -> Self {
        Self {
            repository,
            deletion,
        }
    }

    /// Every offer, visible or not, for the admin table.
    pub fn list(&self) -> Result<Vec<Offer>, RepositoryError> {
        self.repository.list_offers()
    }

    /// Offers shown on the public site.
    pub fn list_active(&self) -> Result<Vec<Offer>, RepositoryError> {
        let mut offers = self.repository.list_offers()?;
        offers.retain(|offer| offer.is_active);
        Ok(offers)
    }

    pub fn create(&self, draft: OfferDraft) -> Result<Offer, RepositoryError> {
        let offer = self.repository.insert_offer(draft.normalized())?;
        info!(offer_id = %offer.id, kind = offer.kind.label(), "offer created");
        Ok(offer)
    }

    pub fn update(&self, id: &OfferId, draft: OfferDraft) -> Result<Offer, RepositoryError> {
        let offer = self.repository.update_offer(id, draft.normalized())?;
        info!(offer_id = %offer.id, is_active = offer.is_active, "offer updated");
        Ok(offer)
    }

    pub fn delete(&self, id: &OfferId) -> Result<(), RepositoryError> {
        let action = match self.deletion {
            OfferDeletionPolicy::Detach => ReferentialAction::SetNull,
            OfferDeletionPolicy::Restrict => ReferentialAction::Restrict,
        };
        self.repository.delete_offer(id, action)?;
        info!(offer_id = %id, policy = ?self.deletion, "offer deleted");
        Ok(())
    }
}
