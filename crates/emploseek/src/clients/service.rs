use std::sync::Arc;

use tracing::info;

use super::domain::{Client, ClientDraft, ClientId};
use crate::store::{ClientRepository, RepositoryError};

/// Field passthrough over the client table.
pub struct ClientService<R> {
    repository: Arc<R>,
}

impl<R> ClientService<R>
where
    R: ClientRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        self.repository.list_clients()
    }

    pub fn create(&self, draft: ClientDraft) -> Result<Client, RepositoryError> {
        let client = self.repository.insert_client(draft.normalized())?;
        info!(client_id = %client.id, "client created");
        Ok(client)
    }

    pub fn update(&self, id: &ClientId, draft: ClientDraft) -> Result<Client, RepositoryError> {
        let client = self.repository.update_client(id, draft.normalized())?;
        info!(client_id = %client.id, "client updated");
        Ok(client)
    }

    /// Contracts owned by the client are removed with it.
    pub fn delete(&self, id: &ClientId) -> Result<(), RepositoryError> {
        self.repository.delete_client(id)?;
        info!(client_id = %id, "client deleted with its contracts");
        Ok(())
    }
}
