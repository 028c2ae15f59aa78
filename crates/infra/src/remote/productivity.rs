//! `productividad` collection adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use slipway_core::productivity::ports::ProductivityStore;
use slipway_domain::constants::PRODUCTIVIDAD_COLLECTION;
use slipway_domain::{ProductivityEvent, RemoteError};

use super::client::DocStoreClient;

#[derive(Debug, Deserialize)]
struct CreatedDoc {
    id: String,
}

/// HTTP implementation of the remote `productividad` collection.
pub struct HttpProductivityStore {
    client: Arc<DocStoreClient>,
}

impl HttpProductivityStore {
    /// Create an adapter over the shared client.
    pub fn new(client: Arc<DocStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductivityStore for HttpProductivityStore {
    async fn create_event(&self, event: &ProductivityEvent) -> Result<String, RemoteError> {
        // Sync flags are client-side state; the serializer already skips
        // them when clear, so clear them before the write.
        let mut payload = event.clone();
        payload.pending_sync = false;
        payload.synced = false;
        let created: CreatedDoc = self.client.post(PRODUCTIVIDAD_COLLECTION, &payload).await?;
        Ok(created.id)
    }

    async fn list_events(&self) -> Result<Vec<ProductivityEvent>, RemoteError> {
        self.client.query_ordered_desc(PRODUCTIVIDAD_COLLECTION, &[], "createdAt").await
    }
}
