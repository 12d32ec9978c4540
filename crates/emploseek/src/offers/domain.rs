use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub Uuid);

impl OfferId {
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of opportunity: a job, an internship, or a language stay.
///
/// Offers and contracts both carry one; a contract's kind is not tied to its offer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityType {
    Emploi,
    Stage,
    Sejour,
}

impl OpportunityType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Emploi => "Emploi",
            Self::Stage => "Stage",
            Self::Sejour => "Sejour linguistique",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub duration: Option<String>,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    #[serde(default)]
    pub duration: Option<String>,
    pub description: String,
    #[serde(default = "visible_by_default")]
    pub is_active: bool,
}

fn visible_by_default() -> bool {
    true
}

impl OfferDraft {
    pub fn normalized(mut self) -> Self {
        self.duration = self.duration.filter(|duration| !duration.is_empty());
        self
    }
}

/// Full-overwrite payload for an existing offer. Visibility must be restated so an
/// edit never republishes a hidden offer by omission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferUpdate {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    #[serde(default)]
    pub duration: Option<String>,
    pub description: String,
    pub is_active: bool,
}

impl From<OfferUpdate> for OfferDraft {
    fn from(update: OfferUpdate) -> Self {
        Self {
            title: update.title,
            company: update.company,
            location: update.location,
            kind: update.kind,
            duration: update.duration,
            description: update.description,
            is_active: update.is_active,
        }
    }
}

/// Joined offer columns embedded in contract listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSummary {
    pub id: OfferId,
    pub title: String,
    pub company: String,
}

impl From<&Offer> for OfferSummary {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id,
            title: offer.title.clone(),
            company: offer.company.clone(),
        }
    }
}

/// What happens to contracts referencing an offer when that offer is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfferDeletionPolicy {
    /// Referencing contracts keep existing with `offer_id` cleared.
    #[default]
    Detach,
    /// Deletion is refused while any contract references the offer.
    Restrict,
}

impl OfferDeletionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "detach" | "set_null" => Some(Self::Detach),
            "restrict" | "block" => Some(Self::Restrict),
            _ => None,
        }
    }
}
