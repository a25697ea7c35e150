use pacerace_core::{ConfigError, RaceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("harness config error: {0}")]
    Config(String),
    #[error("race error: {0}")]
    Race(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<ConfigError> for HarnessError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<RaceError> for HarnessError {
    fn from(value: RaceError) -> Self {
        Self::Race(value.to_string())
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
