//! Error types for network and ledger operations.

use crate::member::MemberId;

/// Error types for network operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// Volume amounts must be finite and non-negative
    #[error("Invalid volume amount: {0}")]
    InvalidVolume(f64),

    /// No member with this stamp exists in the network
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// Only ABOs may sponsor other members
    #[error("Member {0} is not an ABO and cannot sponsor")]
    NotASponsor(MemberId),

    /// The member already has a sponsor
    #[error("Member {0} is already attached to a sponsor")]
    AlreadyAttached(MemberId),

    /// The sponsor lies inside the subtree being attached
    #[error("Attaching {member} under {sponsor} would create a cycle")]
    WouldCycle { member: MemberId, sponsor: MemberId },

    /// A persisted record names a sponsor but no member precedes it
    #[error("Record {0} references a sponsor but no member precedes it")]
    OrphanRecord(MemberId),

    /// A persisted record names a sponsor that is not in the reconstructed chain
    #[error("Sponsor {sponsor} referenced by {member} was not found")]
    SponsorNotFound { member: MemberId, sponsor: u64 },

    /// Two persisted records share a stamp
    #[error("Duplicate member stamp: {0}")]
    DuplicateStamp(MemberId),

    /// Stamp is reserved for the root sponsor or leaves no room for the next one
    #[error("Invalid member stamp: {0}")]
    InvalidStamp(u64),

    /// Persisted member class ordinal is out of range
    #[error("Unknown member class ordinal: {0}")]
    UnknownMemberClass(u8),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
