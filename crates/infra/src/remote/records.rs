//! `avances` collection adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use slipway_core::records::ports::ProgressStore;
use slipway_domain::constants::AVANCES_COLLECTION;
use slipway_domain::{ProgressRecord, RemoteError, ReworkEvent};

use super::client::DocStoreClient;

#[derive(Debug, Deserialize)]
struct CreatedDoc {
    id: String,
}

/// HTTP implementation of the remote `avances` collection.
pub struct HttpProgressStore {
    client: Arc<DocStoreClient>,
}

impl HttpProgressStore {
    /// Create an adapter over the shared client.
    pub fn new(client: Arc<DocStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProgressStore for HttpProgressStore {
    async fn create_record(&self, record: &ProgressRecord) -> Result<String, RemoteError> {
        // The local pending id and sync state stay client-side; the store
        // assigns the permanent identifier.
        let mut payload = serde_json::to_value(record)
            .map_err(|err| RemoteError::new(slipway_domain::RemoteErrorCode::Internal, err.to_string()))?;
        if let Some(doc) = payload.as_object_mut() {
            doc.remove("id");
            doc.remove("pendingReprocesos");
            doc.remove("syncing");
        }
        let created: CreatedDoc = self.client.post(AVANCES_COLLECTION, &payload).await?;
        Ok(created.id)
    }

    async fn records_by_user(&self, user_id: &str) -> Result<Vec<ProgressRecord>, RemoteError> {
        self.client
            .query_ordered_desc(AVANCES_COLLECTION, &[("userId", user_id)], "createdAt")
            .await
    }

    async fn append_rework(
        &self,
        record_id: &str,
        event: &ReworkEvent,
    ) -> Result<(), RemoteError> {
        // One request; the store applies the array append and the
        // invested-hours increment atomically.
        let path = format!("{AVANCES_COLLECTION}/{record_id}/reprocesos");
        self.client.post_unit(&path, event).await
    }
}
