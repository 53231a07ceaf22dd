//! Shared configuration for the marktfeed service.
//!
//! Everything the transcoder and server need to know about a deployment —
//! upstream feed URL, listing constants, target schema variant — is built
//! once at startup into an immutable [`AppConfig`] and passed down. No
//! module-level globals.

pub mod app_config;
pub mod config;

use thiserror::Error;

pub use app_config::{AppConfig, ListingConfig, SchemaVariant, ShippingOption};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
