use std::collections::HashMap;
use std::path::Path;

use admin_client::ClientConfig;
use anyhow::{Context, Result};

/// Read the client config file and apply `ADMIN__*` environment overrides.
///
/// `env` replaces the process environment when given.
pub fn read_config(path: &Path, env: Option<HashMap<String, String>>) -> Result<ClientConfig> {
    let defaults = ClientConfig::default();

    let settings = config::Config::builder()
        .set_default("api_url", defaults.api_url)?
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("ADMIN")
                .prefix_separator("__")
                .separator("__")
                .source(env),
        )
        .build()
        .with_context(|| format!("Failed to read config at {}", path.display()))?;

    settings
        .try_deserialize::<ClientConfig>()
        .context("Invalid client configuration")
}
