//! Shared types for the bonus engine.

use bigtree_network::{MemberId, NetworkError};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Error types for bonus, PIN and session operations.
#[derive(Debug, thiserror::Error)]
pub enum BonusError {
    /// Tree or ledger operation failed
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Operation needs an ABO
    #[error("Member {0} is not an ABO")]
    NotAnAbo(MemberId),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Persistence failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, BonusError>;

/// Outcome of a qualification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    Qualified,
    NotQualified,
    /// Rule not modeled yet. Never treated as qualified.
    NotImplemented,
}

impl Qualification {
    pub fn from_bool(qualified: bool) -> Self {
        if qualified {
            Self::Qualified
        } else {
            Self::NotQualified
        }
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Self::Qualified)
    }
}
