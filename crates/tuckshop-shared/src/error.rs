use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price '{0}' has no amount (expected '<currency> <amount>')")]
    MissingAmount(String),

    #[error("Price amount '{0}' is not a whole number")]
    InvalidAmount(String),

    #[error("Total for {amount} x {quantity} is too large")]
    Overflow { amount: u64, quantity: u32 },
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading credential file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed credential file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid credential file: {0}")]
    Invalid(String),
}
