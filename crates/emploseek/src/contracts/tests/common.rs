use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::clients::{Client, ClientDraft};
use crate::contracts::{
    Contract, ContractFields, ContractId, ContractLifecycleService, ContractListing,
    ContractNumber, ContractNumberGenerator, ContractStatus, LifecyclePolicy, NewContract,
    TransitionPolicy, VerificationView,
};
use crate::offers::{Offer, OfferDraft, OpportunityType};
use crate::store::{
    ClientRepository, ContractRepository, MemoryStore, OfferRepository, RepositoryError,
};

pub(super) fn jean() -> ClientDraft {
    ClientDraft {
        first_name: "Jean".to_string(),
        last_name: "Dupont".to_string(),
        email: "jean@x.com".to_string(),
        phone: Some("+33 6 12 34 56 78".to_string()),
    }
}

pub(super) fn marie() -> ClientDraft {
    ClientDraft {
        first_name: "Marie".to_string(),
        last_name: "Curie".to_string(),
        email: "marie@x.com".to_string(),
        phone: None,
    }
}

pub(super) fn internship() -> OfferDraft {
    OfferDraft {
        title: "Stage developpeur".to_string(),
        company: "Atelier Nord".to_string(),
        location: "Lyon".to_string(),
        kind: OpportunityType::Stage,
        duration: Some("6 mois".to_string()),
        description: "Stage backend".to_string(),
        is_active: true,
    }
}

pub(super) fn seed_client(store: &MemoryStore, draft: ClientDraft) -> Client {
    store.insert_client(draft).expect("client inserts")
}

pub(super) fn seed_offer(store: &MemoryStore) -> Offer {
    store.insert_offer(internship()).expect("offer inserts")
}

pub(super) fn pending_fields(client: &Client) -> ContractFields {
    ContractFields {
        client_id: client.id,
        offer_id: None,
        kind: OpportunityType::Emploi,
        status: ContractStatus::Pending,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        end_date: None,
        notes: None,
    }
}

/// Hands out queued numbers first, then a counter, so collisions can be staged.
#[derive(Default)]
pub(super) struct ScriptedNumbers {
    queue: Mutex<VecDeque<ContractNumber>>,
    fallback: Mutex<u32>,
}

impl ScriptedNumbers {
    pub(super) fn with_queue(numbers: impl IntoIterator<Item = ContractNumber>) -> Self {
        Self {
            queue: Mutex::new(numbers.into_iter().collect()),
            fallback: Mutex::new(0),
        }
    }
}

impl ContractNumberGenerator for ScriptedNumbers {
    fn generate(&self, year: i32) -> ContractNumber {
        if let Some(number) = self.queue.lock().expect("queue mutex poisoned").pop_front() {
            return number;
        }
        let mut next = self.fallback.lock().expect("counter mutex poisoned");
        *next += 1;
        ContractNumber::compose(year, *next)
    }
}

pub(super) type TestService = ContractLifecycleService<MemoryStore, ScriptedNumbers>;

pub(super) fn build_service(
    policy: LifecyclePolicy,
    numbers: ScriptedNumbers,
) -> (TestService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = ContractLifecycleService::new(store.clone(), Arc::new(numbers), policy);
    (service, store)
}

pub(super) fn permissive() -> LifecyclePolicy {
    LifecyclePolicy {
        transitions: TransitionPolicy::Permissive,
        number_attempts: 5,
    }
}

pub(super) fn guarded() -> LifecyclePolicy {
    LifecyclePolicy {
        transitions: TransitionPolicy::Guarded,
        number_attempts: 5,
    }
}

pub(super) struct UnavailableStore;

impl ContractRepository for UnavailableStore {
    fn insert_contract(&self, _contract: NewContract) -> Result<Contract, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_contract(
        &self,
        _id: &ContractId,
        _fields: ContractFields,
        _transitions: TransitionPolicy,
    ) -> Result<Contract, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_contract(&self, _id: &ContractId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_contracts(&self) -> Result<Vec<ContractListing>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_verification(
        &self,
        _number: &ContractNumber,
        _email: &str,
    ) -> Result<Option<VerificationView>, RepositoryError> {
        Err(RepositoryError::Unavailable("relation \"contracts\" is locked".to_string()))
    }
}

/// Commits a staged edit from another admin right before the next update reaches the
/// backing store.
pub(super) struct InterleavingStore {
    pub(super) inner: Arc<MemoryStore>,
    competing: Mutex<Option<ContractFields>>,
}

impl InterleavingStore {
    pub(super) fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            competing: Mutex::new(None),
        }
    }

    pub(super) fn stage(&self, fields: ContractFields) {
        *self.competing.lock().expect("staging mutex poisoned") = Some(fields);
    }
}

impl ContractRepository for InterleavingStore {
    fn insert_contract(&self, contract: NewContract) -> Result<Contract, RepositoryError> {
        self.inner.insert_contract(contract)
    }

    fn update_contract(
        &self,
        id: &ContractId,
        fields: ContractFields,
        transitions: TransitionPolicy,
    ) -> Result<Contract, RepositoryError> {
        let competing = self.competing.lock().expect("staging mutex poisoned").take();
        if let Some(competing) = competing {
            self.inner
                .update_contract(id, competing, TransitionPolicy::Permissive)?;
        }
        self.inner.update_contract(id, fields, transitions)
    }

    fn delete_contract(&self, id: &ContractId) -> Result<(), RepositoryError> {
        self.inner.delete_contract(id)
    }

    fn list_contracts(&self) -> Result<Vec<ContractListing>, RepositoryError> {
        self.inner.list_contracts()
    }

    fn find_verification(
        &self,
        number: &ContractNumber,
        email: &str,
    ) -> Result<Option<VerificationView>, RepositoryError> {
        self.inner.find_verification(number, email)
    }
}

pub(super) fn stored_contract(store: &MemoryStore, id: &ContractId) -> Option<Contract> {
    store
        .list_contracts()
        .expect("list")
        .into_iter()
        .map(|listing| listing.contract)
        .find(|contract| &contract.id == id)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
