use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::handler::{ErrorStrategy, SendPolicy};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub errors: ErrorSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

/// Error handling configuration for the function handler
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorSettings {
    #[serde(default)]
    pub strategy: ErrorStrategy,
    /// Slots in the error channel created for the `error_channel` strategy
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default)]
    pub send_policy: SendPolicySetting,
    /// Only used with `send_policy = "timeout"`
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for ErrorSettings {
    fn default() -> Self {
        Self {
            strategy: ErrorStrategy::default(),
            channel_capacity: default_channel_capacity(),
            send_policy: SendPolicySetting::default(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl ErrorSettings {
    /// Channel send policy for the configured setting
    ///
    /// `block` maps to [`SendPolicy::Block`], whose sends panic on a thread
    /// that drives an async runtime. Only choose it when renders run on plain
    /// threads or in `spawn_blocking`, as the `render` command does.
    pub fn send_policy(&self) -> SendPolicy {
        match self.send_policy {
            SendPolicySetting::Drop => SendPolicy::DropOnFull,
            SendPolicySetting::Block => SendPolicy::Block,
            SendPolicySetting::Timeout => {
                SendPolicy::Timeout(Duration::from_millis(self.send_timeout_ms))
            }
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}

fn default_send_timeout_ms() -> u64 {
    250
}

/// Send policy as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SendPolicySetting {
    Drop,
    /// Wait for the consumer; renders must not run on an async worker thread
    Block,
    #[default]
    Timeout,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `funcmap=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Template engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RenderSettings {
    /// Fail on missing template variables
    #[serde(default)]
    pub strict_mode: bool,
    /// HTML-escape rendered values
    #[serde(default)]
    pub escape_html: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.errors.strategy, ErrorStrategy::Unconfigured);
        assert_eq!(settings.errors.channel_capacity, 64);
        assert_eq!(
            settings.errors.send_policy(),
            SendPolicy::Timeout(Duration::from_millis(250))
        );
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.render.strict_mode);
        assert!(!settings.render.escape_html);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[errors]
strategy = "return_default_value"
send_policy = "drop"
        "#,
        )
        .unwrap();

        assert_eq!(settings.errors.strategy, ErrorStrategy::ReturnDefaultValue);
        assert_eq!(settings.errors.send_policy(), SendPolicy::DropOnFull);
        assert_eq!(settings.errors.channel_capacity, 64);
        assert_eq!(settings.logging.format, LogFormat::Full);
    }
}
