//! `users` collection adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use slipway_core::user::ports::RemoteUserStore;
use slipway_domain::constants::USERS_COLLECTION;
use slipway_domain::{RemoteError, Role, UserProfile};

use super::client::DocStoreClient;

/// HTTP implementation of the remote `users` collection.
pub struct HttpUserStore {
    client: Arc<DocStoreClient>,
}

impl HttpUserStore {
    /// Create an adapter over the shared client.
    pub fn new(client: Arc<DocStoreClient>) -> Self {
        Self { client }
    }

    fn doc_path(id: &str) -> String {
        format!("{USERS_COLLECTION}/{id}")
    }
}

#[async_trait]
impl RemoteUserStore for HttpUserStore {
    async fn create_profile(
        &self,
        id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, RemoteError> {
        // Local-only flags never travel to the server
        let payload = profile.without_local_flags();
        self.client.post(&Self::doc_path(id), &payload).await
    }

    async fn fetch_profile(&self, id: &str) -> Result<Option<UserProfile>, RemoteError> {
        self.client.get_optional(&Self::doc_path(id)).await
    }

    async fn merge_profile(&self, id: &str, profile: &UserProfile) -> Result<(), RemoteError> {
        let payload = profile.without_local_flags();
        self.client.patch_unit(&Self::doc_path(id), &payload).await
    }

    async fn update_role(&self, id: &str, rol: Role) -> Result<(), RemoteError> {
        self.client.patch_unit(&Self::doc_path(id), &json!({ "rol": rol })).await
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, RemoteError> {
        self.client.get(USERS_COLLECTION).await
    }

    async fn profiles_by_role(&self, rol: Role) -> Result<Vec<UserProfile>, RemoteError> {
        self.client.get_query(USERS_COLLECTION, &[("rol", rol.as_str())]).await
    }
}
