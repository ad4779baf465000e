use std::sync::Arc;

use admin_client::{ApiClient, ClientConfig};
use admin_core::adapters::{MemoryProfileStore, MemorySessionClient, MemorySettingsClient};
use admin_core::{NotificationSettings, SessionClient, SettingsBackends, TeamSettings};
use anyhow::Result;

use crate::dev;

/// The ports a command runs against.
#[derive(Clone)]
pub struct Backend {
    pub sessions: Arc<dyn SessionClient>,
    pub settings: SettingsBackends,
}

impl Backend {
    pub fn remote(config: &ClientConfig) -> Result<Self> {
        let client = Arc::new(ApiClient::from_config(config)?);
        tracing::debug!(api_url = %client.base_url(), "using remote backend");
        Ok(Self {
            sessions: client.clone(),
            settings: SettingsBackends::with_local_advanced(
                client.clone(),
                client.clone(),
                client,
            ),
        })
    }

    /// Local in-memory data. Nothing is kept between runs.
    pub fn dev() -> Self {
        tracing::debug!("using in-memory dev backend");
        Self {
            sessions: Arc::new(MemorySessionClient::new().with_sessions(dev::sessions())),
            settings: SettingsBackends::with_local_advanced(
                Arc::new(MemoryProfileStore::new(dev::profile())),
                Arc::new(MemorySettingsClient::<TeamSettings>::new().with_groups(dev::team_settings())),
                Arc::new(MemorySettingsClient::<NotificationSettings>::new()),
            ),
        }
    }
}
