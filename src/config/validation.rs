use super::models::{SendPolicySetting, Settings};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("errors.channel_capacity must be positive")]
    ZeroChannelCapacity,

    #[error("errors.send_timeout_ms must be positive when send_policy is 'timeout'")]
    ZeroSendTimeout,

    #[error("Invalid logging.level directive '{level}': {reason}")]
    InvalidLogLevel { level: String, reason: String },
}

/// Validate the entire configuration
pub fn validate(settings: &Settings) -> Result<(), ValidationError> {
    validate_errors(settings)?;
    validate_logging(settings)?;
    Ok(())
}

fn validate_errors(settings: &Settings) -> Result<(), ValidationError> {
    if settings.errors.channel_capacity == 0 {
        return Err(ValidationError::ZeroChannelCapacity);
    }

    if settings.errors.send_policy == SendPolicySetting::Timeout
        && settings.errors.send_timeout_ms == 0
    {
        return Err(ValidationError::ZeroSendTimeout);
    }

    Ok(())
}

fn validate_logging(settings: &Settings) -> Result<(), ValidationError> {
    EnvFilter::try_new(settings.logging.level.as_str()).map_err(|e| {
        ValidationError::InvalidLogLevel {
            level: settings.logging.level.clone(),
            reason: e.to_string(),
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut settings = Settings::default();
        settings.errors.channel_capacity = 0;

        assert!(matches!(
            validate(&settings),
            Err(ValidationError::ZeroChannelCapacity)
        ));
    }

    #[test]
    fn test_zero_timeout_only_matters_for_timeout_policy() {
        let mut settings = Settings::default();
        settings.errors.send_timeout_ms = 0;
        assert!(matches!(
            validate(&settings),
            Err(ValidationError::ZeroSendTimeout)
        ));

        settings.errors.send_policy = SendPolicySetting::Drop;
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = Settings::default();
        settings.logging.level = "funcmap=loud".to_string();

        assert!(matches!(
            validate(&settings),
            Err(ValidationError::InvalidLogLevel { .. })
        ));
    }
}
