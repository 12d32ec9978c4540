use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::error;

use super::domain::VerificationView;
use super::number::ContractNumber;
use crate::http::error_response;
use crate::store::{ContractRepository, RepositoryError};

/// Query string of the public lookup. Both halves are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerificationQuery {
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl VerificationQuery {
    pub fn new(contract_number: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            contract_number: Some(contract_number.into()),
            email: Some(email.into()),
        }
    }
}

/// Read-only resolution of a contract from its number and its owner's email.
pub struct VerificationService<R> {
    repository: Arc<R>,
}

impl<R> VerificationService<R>
where
    R: ContractRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// A number that exists but belongs to another client's email fails exactly like
    /// a number that does not exist.
    pub fn verify(&self, query: &VerificationQuery) -> Result<VerificationView, VerificationError> {
        let present = |value: &Option<String>| value.clone().filter(|value| !value.is_empty());
        let (Some(number), Some(email)) = (present(&query.contract_number), present(&query.email))
        else {
            return Err(VerificationError::MissingCredentials);
        };

        let number = ContractNumber::from_raw(number);
        if !number.is_well_formed() {
            return Err(VerificationError::NotFound);
        }

        self.repository
            .find_verification(&number, &email)?
            .ok_or(VerificationError::NotFound)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Numero de contrat et email requis")]
    MissingCredentials,
    #[error("Contrat non trouve. Verifiez vos informations.")]
    NotFound,
    #[error("Verification indisponible")]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        let status = match &self {
            VerificationError::MissingCredentials => StatusCode::BAD_REQUEST,
            VerificationError::NotFound => StatusCode::NOT_FOUND,
            VerificationError::Repository(source) => {
                // The public endpoint never echoes store messages.
                error!(error = %source, "verification lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error_response(status, self.to_string())
    }
}
