//! HTTP implementation of the session admin ports.

mod client;
mod config;
mod dto;

pub use client::{ApiClient, SettingsRoute};
pub use config::ClientConfig;
