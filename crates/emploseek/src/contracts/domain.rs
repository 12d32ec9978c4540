use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clients::{ClientId, ClientSummary};
use crate::offers::{OfferId, OfferSummary, OpportunityType};

use super::number::ContractNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub Uuid);

impl ContractId {
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Contract status. Closed set: nothing else can be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl ContractStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Pending, Self::Active, Self::Expired, Self::Cancelled]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }

    pub fn can_transition_to(self, next: Self, policy: TransitionPolicy) -> bool {
        match policy {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Guarded => !self.is_closed() || self == next,
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rules applied when an update changes a contract's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may follow any other, including reopening cancelled contracts.
    #[default]
    Permissive,
    /// `expired` and `cancelled` are terminal.
    Guarded,
}

impl TransitionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Some(Self::Permissive),
            "guarded" => Some(Self::Guarded),
            _ => None,
        }
    }
}

/// Mutable contract columns. Used for both create and full-overwrite update;
/// `contract_number`, `id` and `created_at` are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFields {
    pub client_id: ClientId,
    #[serde(default)]
    pub offer_id: Option<OfferId>,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub status: ContractStatus,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContractFields {
    pub fn normalized(mut self) -> Self {
        self.notes = self.notes.filter(|notes| !notes.is_empty());
        self
    }
}

/// Row handed to the store on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContract {
    pub contract_number: ContractNumber,
    pub fields: ContractFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub contract_number: ContractNumber,
    #[serde(flatten)]
    pub fields: ContractFields,
    pub created_at: DateTime<Utc>,
}

/// Contract joined with summaries of its client and offer for the admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractListing {
    #[serde(flatten)]
    pub contract: Contract,
    pub clients: Option<ClientSummary>,
    pub offers: Option<OfferSummary>,
}

/// Public projection returned by a successful verification.
///
/// Carries only the client name and email; never the phone or any other column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationView {
    pub id: ContractId,
    pub contract_number: ContractNumber,
    pub status: ContractStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub client: VerifiedClient,
    pub offer: Option<VerifiedOffer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedOffer {
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
}
