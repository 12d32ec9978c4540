use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::{
    ClientRepository, ContractRepository, OfferRepository, ReferentialAction, RepositoryError,
};
use crate::clients::{Client, ClientDraft, ClientId, ClientSummary};
use crate::contracts::{
    Contract, ContractFields, ContractId, ContractListing, ContractNumber, NewContract,
    TransitionPolicy, VerificationView, VerifiedClient, VerifiedOffer,
};
use crate::offers::{Offer, OfferDraft, OfferId, OfferSummary};

const CONTRACTS_CLIENT_FK: &str = "contracts_client_id_fkey";
const CONTRACTS_OFFER_FK: &str = "contracts_offer_id_fkey";

/// Row plus its insertion sequence, used to break `created_at` ties.
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    row: T,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    clients: HashMap<ClientId, Stored<Client>>,
    offers: HashMap<OfferId, Stored<Offer>>,
    contracts: HashMap<ContractId, Stored<Contract>>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn check_contract_references(&self, fields: &ContractFields) -> Result<(), RepositoryError> {
        if !self.clients.contains_key(&fields.client_id) {
            return Err(RepositoryError::ForeignKey {
                constraint: CONTRACTS_CLIENT_FK,
            });
        }
        if let Some(offer_id) = &fields.offer_id {
            if !self.offers.contains_key(offer_id) {
                return Err(RepositoryError::ForeignKey {
                    constraint: CONTRACTS_OFFER_FK,
                });
            }
        }
        Ok(())
    }

    fn number_taken(&self, number: &ContractNumber) -> bool {
        self.contracts
            .values()
            .any(|stored| &stored.row.contract_number == number)
    }

    fn listing(&self, contract: &Contract) -> ContractListing {
        let clients = self
            .clients
            .get(&contract.fields.client_id)
            .map(|stored| ClientSummary::from(&stored.row));
        let offers = contract
            .fields
            .offer_id
            .and_then(|id| self.offers.get(&id))
            .map(|stored| OfferSummary::from(&stored.row));

        ContractListing {
            contract: contract.clone(),
            clients,
            offers,
        }
    }
}

/// In-process relational store with the constraints of the production schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = (chrono::DateTime<Utc>, u64, T)>) -> Vec<T> {
    let mut rows: Vec<_> = rows.collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    rows.into_iter().map(|(_, _, row)| row).collect()
}

impl ClientRepository for MemoryStore {
    fn insert_client(&self, draft: ClientDraft) -> Result<Client, RepositoryError> {
        let mut tables = self.lock()?;
        let client = Client {
            id: ClientId(Uuid::new_v4()),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.clients.insert(
            client.id,
            Stored {
                seq,
                row: client.clone(),
            },
        );
        Ok(client)
    }

    fn update_client(&self, id: &ClientId, draft: ClientDraft) -> Result<Client, RepositoryError> {
        let mut tables = self.lock()?;
        let stored = tables
            .clients
            .get_mut(id)
            .ok_or(RepositoryError::NotFound)?;
        stored.row.first_name = draft.first_name;
        stored.row.last_name = draft.last_name;
        stored.row.email = draft.email;
        stored.row.phone = draft.phone;
        Ok(stored.row.clone())
    }

    fn delete_client(&self, id: &ClientId) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if tables.clients.remove(id).is_some() {
            tables
                .contracts
                .retain(|_, stored| &stored.row.fields.client_id != id);
        }
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.clients.values().map(|stored| {
            (stored.row.created_at, stored.seq, stored.row.clone())
        })))
    }
}

impl OfferRepository for MemoryStore {
    fn insert_offer(&self, draft: OfferDraft) -> Result<Offer, RepositoryError> {
        let mut tables = self.lock()?;
        let offer = Offer {
            id: OfferId(Uuid::new_v4()),
            title: draft.title,
            company: draft.company,
            location: draft.location,
            kind: draft.kind,
            duration: draft.duration,
            description: draft.description,
            is_active: draft.is_active,
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.offers.insert(
            offer.id,
            Stored {
                seq,
                row: offer.clone(),
            },
        );
        Ok(offer)
    }

    fn update_offer(&self, id: &OfferId, draft: OfferDraft) -> Result<Offer, RepositoryError> {
        let mut tables = self.lock()?;
        let stored = tables.offers.get_mut(id).ok_or(RepositoryError::NotFound)?;
        stored.row.title = draft.title;
        stored.row.company = draft.company;
        stored.row.location = draft.location;
        stored.row.kind = draft.kind;
        stored.row.duration = draft.duration;
        stored.row.description = draft.description;
        stored.row.is_active = draft.is_active;
        Ok(stored.row.clone())
    }

    fn delete_offer(&self, id: &OfferId, action: ReferentialAction) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.offers.contains_key(id) {
            return Ok(());
        }

        let referencing = |contract: &Contract| contract.fields.offer_id.as_ref() == Some(id);
        match action {
            ReferentialAction::Restrict => {
                if tables.contracts.values().any(|stored| referencing(&stored.row)) {
                    return Err(RepositoryError::Referenced {
                        constraint: CONTRACTS_OFFER_FK,
                    });
                }
            }
            ReferentialAction::SetNull => {
                for stored in tables.contracts.values_mut() {
                    if referencing(&stored.row) {
                        stored.row.fields.offer_id = None;
                    }
                }
            }
        }

        tables.offers.remove(id);
        Ok(())
    }

    fn list_offers(&self) -> Result<Vec<Offer>, RepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.offers.values().map(|stored| {
            (stored.row.created_at, stored.seq, stored.row.clone())
        })))
    }
}

impl ContractRepository for MemoryStore {
    fn insert_contract(&self, contract: NewContract) -> Result<Contract, RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_contract_references(&contract.fields)?;
        if tables.number_taken(&contract.contract_number) {
            return Err(RepositoryError::Conflict);
        }

        let row = Contract {
            id: ContractId(Uuid::new_v4()),
            contract_number: contract.contract_number,
            fields: contract.fields,
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.contracts.insert(
            row.id,
            Stored {
                seq,
                row: row.clone(),
            },
        );
        Ok(row)
    }

    fn update_contract(
        &self,
        id: &ContractId,
        fields: ContractFields,
        transitions: TransitionPolicy,
    ) -> Result<Contract, RepositoryError> {
        let mut tables = self.lock()?;
        let from = tables
            .contracts
            .get(id)
            .map(|stored| stored.row.fields.status)
            .ok_or(RepositoryError::NotFound)?;
        if !from.can_transition_to(fields.status, transitions) {
            return Err(RepositoryError::TransitionRefused {
                from,
                to: fields.status,
            });
        }
        tables.check_contract_references(&fields)?;

        let stored = tables
            .contracts
            .get_mut(id)
            .ok_or(RepositoryError::NotFound)?;
        stored.row.fields = fields;
        Ok(stored.row.clone())
    }

    fn delete_contract(&self, id: &ContractId) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables.contracts.remove(id);
        Ok(())
    }

    fn list_contracts(&self) -> Result<Vec<ContractListing>, RepositoryError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.contracts.values().map(|stored| {
            (stored.row.created_at, stored.seq, tables.listing(&stored.row))
        })))
    }

    fn find_verification(
        &self,
        number: &ContractNumber,
        email: &str,
    ) -> Result<Option<VerificationView>, RepositoryError> {
        let tables = self.lock()?;
        let Some(contract) = tables
            .contracts
            .values()
            .map(|stored| &stored.row)
            .find(|contract| &contract.contract_number == number)
        else {
            return Ok(None);
        };

        let Some(client) = tables
            .clients
            .get(&contract.fields.client_id)
            .map(|stored| &stored.row)
            .filter(|client| client.email == email)
        else {
            return Ok(None);
        };

        let offer = contract
            .fields
            .offer_id
            .and_then(|id| tables.offers.get(&id))
            .map(|stored| VerifiedOffer {
                title: stored.row.title.clone(),
                company: stored.row.company.clone(),
                kind: stored.row.kind,
            });

        Ok(Some(VerificationView {
            id: contract.id,
            contract_number: contract.contract_number.clone(),
            status: contract.fields.status,
            start_date: contract.fields.start_date,
            end_date: contract.fields.end_date,
            kind: contract.fields.kind,
            client: VerifiedClient {
                first_name: client.first_name.clone(),
                last_name: client.last_name.clone(),
                email: client.email.clone(),
            },
            offer,
        }))
    }
}
