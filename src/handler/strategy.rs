use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a [`FunctionHandler`](super::FunctionHandler) does with a helper failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    /// Nothing selected; behaves exactly like [`ErrorStrategy::TemplateError`]
    #[default]
    Unconfigured,
    /// Mask the failure with the zero value of the helper's return shape
    ReturnDefaultValue,
    /// Surface the failure to the template engine, aborting the render
    TemplateError,
    /// Unwind the current call stack with the handled error as payload
    Panic,
    /// Mask the failure and forward it to the configured error channel
    ErrorChannel,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown error strategy '{0}' (expected one of: template_error, return_default_value, panic, error_channel)")]
pub struct ParseStrategyError(pub String);

impl ErrorStrategy {
    /// Strategy actually applied; `Unconfigured` fails loud
    pub fn effective(self) -> Self {
        match self {
            ErrorStrategy::Unconfigured => ErrorStrategy::TemplateError,
            other => other,
        }
    }

    /// Whether a failure under this strategy reaches the template as success
    pub fn masks_errors(self) -> bool {
        matches!(
            self.effective(),
            ErrorStrategy::ReturnDefaultValue | ErrorStrategy::ErrorChannel
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorStrategy::Unconfigured => "unconfigured",
            ErrorStrategy::ReturnDefaultValue => "return_default_value",
            ErrorStrategy::TemplateError => "template_error",
            ErrorStrategy::Panic => "panic",
            ErrorStrategy::ErrorChannel => "error_channel",
        }
    }
}

/// Numeric strategy codes, in declaration order.
///
/// Codes outside the known range map to `TemplateError`.
impl From<u8> for ErrorStrategy {
    fn from(code: u8) -> Self {
        match code {
            0 => ErrorStrategy::Unconfigured,
            1 => ErrorStrategy::ReturnDefaultValue,
            2 => ErrorStrategy::TemplateError,
            3 => ErrorStrategy::Panic,
            4 => ErrorStrategy::ErrorChannel,
            _ => ErrorStrategy::TemplateError,
        }
    }
}

impl FromStr for ErrorStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "unconfigured" => Ok(ErrorStrategy::Unconfigured),
            "return_default_value" | "default" => Ok(ErrorStrategy::ReturnDefaultValue),
            "template_error" => Ok(ErrorStrategy::TemplateError),
            "panic" => Ok(ErrorStrategy::Panic),
            "error_channel" | "channel" => Ok(ErrorStrategy::ErrorChannel),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

impl fmt::Display for ErrorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconfigured() {
        assert_eq!(ErrorStrategy::default(), ErrorStrategy::Unconfigured);
    }

    #[test]
    fn test_unconfigured_fails_loud() {
        assert_eq!(
            ErrorStrategy::Unconfigured.effective(),
            ErrorStrategy::TemplateError
        );
        assert!(!ErrorStrategy::Unconfigured.masks_errors());
    }

    #[test]
    fn test_masking_strategies() {
        assert!(ErrorStrategy::ReturnDefaultValue.masks_errors());
        assert!(ErrorStrategy::ErrorChannel.masks_errors());
        assert!(!ErrorStrategy::TemplateError.masks_errors());
        assert!(!ErrorStrategy::Panic.masks_errors());
    }

    #[test]
    fn test_unknown_code_maps_to_template_error() {
        assert_eq!(ErrorStrategy::from(0), ErrorStrategy::Unconfigured);
        assert_eq!(ErrorStrategy::from(4), ErrorStrategy::ErrorChannel);
        assert_eq!(ErrorStrategy::from(42), ErrorStrategy::TemplateError);
    }

    #[test]
    fn test_parse_accepts_kebab_and_snake_case() {
        assert_eq!(
            "return-default-value".parse::<ErrorStrategy>().unwrap(),
            ErrorStrategy::ReturnDefaultValue
        );
        assert_eq!(
            "ERROR_CHANNEL".parse::<ErrorStrategy>().unwrap(),
            ErrorStrategy::ErrorChannel
        );
        assert!("explode".parse::<ErrorStrategy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for strategy in [
            ErrorStrategy::Unconfigured,
            ErrorStrategy::ReturnDefaultValue,
            ErrorStrategy::TemplateError,
            ErrorStrategy::Panic,
            ErrorStrategy::ErrorChannel,
        ] {
            assert_eq!(strategy.to_string().parse::<ErrorStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: ErrorStrategy,
        }

        let parsed: Wrapper = toml::from_str(r#"strategy = "error_channel""#).unwrap();
        assert_eq!(parsed.strategy, ErrorStrategy::ErrorChannel);
    }
}
