use thiserror::Error;
use tuckshop_shared::error::PriceError;
use tuckshop_store::StoreError;

use crate::views::{Notice, NoticeLevel};

/// Failure of a user action. Every variant leaves the store unchanged
/// except where noted on the command itself.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Please log in first")]
    NotLoggedIn,

    /// A required field is empty or does not parse.
    #[error("{0}")]
    Validation(String),

    /// The action needs a selected row.
    #[error("{0}")]
    NoSelection(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl CommandError {
    pub fn level(&self) -> NoticeLevel {
        match self {
            CommandError::NotLoggedIn
            | CommandError::Validation(_)
            | CommandError::NoSelection(_) => NoticeLevel::Warning,
            CommandError::NotFound(_) => NoticeLevel::Info,
            CommandError::Price(_) | CommandError::Store(_) | CommandError::LockPoisoned(_) => {
                NoticeLevel::Error
            }
        }
    }

    pub fn to_notice(&self) -> Notice {
        Notice {
            level: self.level(),
            text: self.to_string(),
        }
    }
}
