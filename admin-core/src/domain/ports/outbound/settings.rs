use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AdminProfile, ApiError, SettingsGroup, SettingsId};

/// Outbound port for a settings collection (team, notifications, ...).
///
/// The backend keeps at most one meaningful object per collection; the
/// first element of `list_settings` is the one the page edits.
#[async_trait]
pub trait SettingsClient<G: SettingsGroup>: Send + Sync {
    async fn list_settings(&self) -> Result<Vec<G>, ApiError>;

    /// Create the group. The returned object carries its new id.
    async fn create_settings(&self, group: &G) -> Result<G, ApiError>;

    async fn update_settings(&self, id: &SettingsId, group: &G) -> Result<G, ApiError>;
}

/// Outbound port for the signed-in admin's profile.
///
/// Passed explicitly to whatever needs it instead of living in shared
/// page-wide state.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn current_profile(&self) -> Result<AdminProfile, ApiError>;

    async fn update_profile(&self, profile: &AdminProfile) -> Result<AdminProfile, ApiError>;
}

/// Presents a [`ProfileStore`] as a single-element settings collection so
/// the profile tab can share the group edit controller.
#[derive(Clone)]
pub struct ProfileSettings {
    store: Arc<dyn ProfileStore>,
}

impl ProfileSettings {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsClient<AdminProfile> for ProfileSettings {
    async fn list_settings(&self) -> Result<Vec<AdminProfile>, ApiError> {
        Ok(vec![self.store.current_profile().await?])
    }

    async fn create_settings(&self, group: &AdminProfile) -> Result<AdminProfile, ApiError> {
        self.store.update_profile(group).await
    }

    async fn update_settings(
        &self,
        _id: &SettingsId,
        group: &AdminProfile,
    ) -> Result<AdminProfile, ApiError> {
        self.store.update_profile(group).await
    }
}
