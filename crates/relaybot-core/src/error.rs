use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid setting `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

impl From<figment::Error> for RelayError {
    fn from(e: figment::Error) -> Self {
        RelayError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
