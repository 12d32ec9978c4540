use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{Datelike, Utc};
use tracing::{error, info, warn};

use super::domain::{
    Contract, ContractFields, ContractId, ContractListing, ContractStatus, NewContract,
    TransitionPolicy,
};
use super::number::ContractNumberGenerator;
use crate::config::ContractPolicyConfig;
use crate::http::error_response;
use crate::store::{ContractRepository, RepositoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub transitions: TransitionPolicy,
    /// How many candidate numbers to try before giving up on a create.
    pub number_attempts: u8,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::from(&ContractPolicyConfig::default())
    }
}

impl From<&ContractPolicyConfig> for LifecyclePolicy {
    fn from(config: &ContractPolicyConfig) -> Self {
        Self {
            transitions: config.transitions,
            number_attempts: config.number_attempts,
        }
    }
}

/// Creates, updates and deletes contracts. The only writer of contract rows.
pub struct ContractLifecycleService<R, G> {
    repository: Arc<R>,
    numbers: Arc<G>,
    policy: LifecyclePolicy,
}

impl<R, G> ContractLifecycleService<R, G>
where
    R: ContractRepository + 'static,
    G: ContractNumberGenerator + 'static,
{
    pub fn new(repository: Arc<R>, numbers: Arc<G>, policy: LifecyclePolicy) -> Self {
        Self {
            repository,
            numbers,
            policy,
        }
    }

    pub fn list(&self) -> Result<Vec<ContractListing>, ContractServiceError> {
        Ok(self.repository.list_contracts()?)
    }

    /// Persist a new contract under a freshly generated number for the current year.
    ///
    /// A number already held by another contract is regenerated, up to the configured
    /// attempt budget. Dates, status and the offer's type are taken as given.
    pub fn create(&self, fields: ContractFields) -> Result<Contract, ContractServiceError> {
        let fields = fields.normalized();
        let year = Utc::now().year();
        let attempts = self.policy.number_attempts.max(1);

        for attempt in 1..=attempts {
            let contract_number = self.numbers.generate(year);
            let candidate = NewContract {
                contract_number: contract_number.clone(),
                fields: fields.clone(),
            };

            match self.repository.insert_contract(candidate) {
                Ok(contract) => {
                    info!(
                        contract_id = %contract.id,
                        contract_number = %contract.contract_number,
                        client_id = %contract.fields.client_id,
                        status = %contract.fields.status,
                        "contract created"
                    );
                    return Ok(contract);
                }
                Err(RepositoryError::Conflict) => {
                    warn!(attempt, %contract_number, "contract number already taken");
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(ContractServiceError::NumberSpaceExhausted { attempts })
    }

    /// Overwrite every mutable column of an existing contract.
    ///
    /// The store applies the transition policy against the row it is about to overwrite.
    pub fn update(
        &self,
        id: &ContractId,
        fields: ContractFields,
    ) -> Result<Contract, ContractServiceError> {
        let fields = fields.normalized();

        let contract = self
            .repository
            .update_contract(id, fields, self.policy.transitions)
            .map_err(|err| match err {
                RepositoryError::TransitionRefused { from, to } => {
                    ContractServiceError::Transition { from, to }
                }
                other => ContractServiceError::Repository(other),
            })?;
        info!(
            contract_id = %contract.id,
            contract_number = %contract.contract_number,
            status = %contract.fields.status,
            "contract updated"
        );
        Ok(contract)
    }

    /// Remove a contract. Absent ids are a no-op.
    pub fn delete(&self, id: &ContractId) -> Result<(), ContractServiceError> {
        self.repository.delete_contract(id)?;
        info!(contract_id = %id, "contract deleted");
        Ok(())
    }
}

/// Error raised by the contract lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum ContractServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("status transition from {from} to {to} is not allowed")]
    Transition {
        from: ContractStatus,
        to: ContractStatus,
    },
    #[error("no free contract number after {attempts} attempts")]
    NumberSpaceExhausted { attempts: u8 },
}

impl IntoResponse for ContractServiceError {
    fn into_response(self) -> Response {
        match self {
            ContractServiceError::Repository(err) => err.into_response(),
            ContractServiceError::Transition { .. } => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ContractServiceError::NumberSpaceExhausted { attempts } => {
                error!(attempts, "contract number generation exhausted");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}
