//! Sequences a write against the backend with a reconciling read, so the
//! local mirror reflects the mutation. The coordinator only ever touches
//! the poller it was constructed against.

use crate::api::{PostMonitorClient, TransportError};
use crate::models::IncidentRecord;
use crate::poller::Poller;
use tracing::warn;

pub struct MutationCoordinator {
    client: PostMonitorClient,
    poller: Poller<Vec<IncidentRecord>>,
}

impl MutationCoordinator {
    pub fn new(client: PostMonitorClient, poller: Poller<Vec<IncidentRecord>>) -> Self {
        Self { client, poller }
    }

    /// Deletes one record and refetches the owning poller's state. The
    /// refetch runs even when the delete failed, so a partial server-side
    /// success cannot leave the mirror silently diverged.
    pub async fn delete_request(&self, id: u64) -> Result<(), TransportError> {
        let result = self.client.delete_one(id).await;
        if let Err(ref e) = result {
            warn!("delete of record {id} failed: {e}");
        }
        self.poller.refetch().await;
        result
    }

    /// Clears the whole incident log, then reconciles.
    pub async fn clear_all(&self) -> Result<(), TransportError> {
        let result = self.client.clear_all().await;
        if let Err(ref e) = result {
            warn!("clear-all failed: {e}");
        }
        self.poller.refetch().await;
        result
    }
}
