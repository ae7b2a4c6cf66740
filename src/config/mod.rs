//! Configuration management for funcmap
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use funcmap::config::Settings;
//!
//! let settings = Settings::load().expect("Failed to load configuration");
//! println!("Error strategy: {}", settings.errors.strategy);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `FUNCMAP__<section>__<key>`
//!
//! Examples:
//! - `FUNCMAP__ERRORS__STRATEGY=return_default_value`
//! - `FUNCMAP__ERRORS__CHANNEL_CAPACITY=128`
//! - `FUNCMAP__LOGGING__LEVEL=funcmap=debug`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/funcmap.toml`.
//! This can be overridden using the `FUNCMAP_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    ErrorSettings, LogFormat, LoggingSettings, RenderSettings, SendPolicySetting, Settings,
};
pub use validation::ValidationError;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::errors::HelperError;
use crate::handler::{ErrorChannel, ErrorStrategy, HandlerOption};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Settings {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = sources::load()?;
        validation::validate(&settings)?;
        Ok(settings)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let settings = sources::load_from_sources(path)?;
        validation::validate(&settings)?;
        Ok(settings)
    }
}

impl ErrorSettings {
    /// Function handler options matching these settings
    ///
    /// With the `error_channel` strategy a channel of `channel_capacity`
    /// slots is created; its receiver is returned and must be drained by the
    /// caller for as long as the handler is in use.
    pub fn handler_options(&self) -> (Vec<HandlerOption>, Option<mpsc::Receiver<HelperError>>) {
        let mut options = vec![HandlerOption::Strategy(self.strategy)];

        if self.strategy != ErrorStrategy::ErrorChannel {
            return (options, None);
        }

        let (channel, receiver) =
            ErrorChannel::bounded(self.channel_capacity.max(1), self.send_policy());
        options.push(HandlerOption::ErrorChannel(channel));
        (options, Some(receiver))
    }
}
