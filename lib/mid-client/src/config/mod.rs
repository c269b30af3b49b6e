use thiserror::Error;

pub mod client_config;


pub use client_config::{ClientConfig, ClientIdentity, InputFormat, ServiceUrls, SessionPoolConfig};

#[derive(Debug, Error)]
pub enum ConfigParsingError {
    #[error("Config parsing error: {0}")]
    GeneralParsingError(String),
}

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Missing value for `{0}`")]
    MissingValue(&'static str),
    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
