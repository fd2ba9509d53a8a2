//! Per-member sales volume counters.
//!
//! The ledger only holds the numbers. Propagating a change up the sponsor
//! chain is the job of [`Network`](crate::tree::Network), which owns the tree.

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Personal volume given to members created without an explicit amount.
pub const DEFAULT_PV: f64 = 20.0;

/// Running volume counters for one member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeLedger {
    /// Volume attributed directly to this member
    personal: f64,
    /// Personal volume plus all descendants' personal volume
    group: f64,
    /// `group` at the last base reset, for change display only
    base_group: f64,
}

impl VolumeLedger {
    /// A fresh ledger for a member with no descendants.
    pub fn new(personal: f64) -> Result<Self> {
        validate_amount(personal)?;
        Ok(Self {
            personal,
            group: personal,
            base_group: 0.0,
        })
    }

    /// Volume attributed to this member alone.
    pub fn personal(&self) -> f64 {
        self.personal
    }

    /// Personal volume plus every descendant's.
    pub fn group(&self) -> f64 {
        self.group
    }

    /// Group volume at the last base reset.
    pub fn base_group(&self) -> f64 {
        self.base_group
    }

    /// Change in group volume since the last base reset.
    pub fn group_change(&self) -> f64 {
        self.group - self.base_group
    }

    /// Snapshot the current group volume as the base.
    pub fn reset_base(&mut self) {
        self.base_group = self.group;
    }

    /// Add to personal volume. Returns the delta the ancestors must receive.
    pub(crate) fn credit_personal(&mut self, amount: f64) -> f64 {
        self.personal += amount;
        self.group += amount;
        amount
    }

    /// Subtract from personal volume, never going below zero.
    /// Returns the amount actually removed.
    pub(crate) fn debit_personal(&mut self, amount: f64) -> f64 {
        let effective = amount.min(self.personal);
        self.personal -= effective;
        self.group -= effective;
        effective
    }

    /// Roll a descendant's change into the group total.
    pub(crate) fn apply_group_delta(&mut self, delta: f64) {
        self.group += delta;
    }
}

/// Reject negative, NaN and infinite volume amounts.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(NetworkError::InvalidVolume(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger() {
        let ledger = VolumeLedger::new(20.0).unwrap();
        assert_eq!(ledger.personal(), 20.0);
        assert_eq!(ledger.group(), 20.0);
        assert_eq!(ledger.group_change(), 20.0);

        assert_eq!(
            VolumeLedger::new(-1.0),
            Err(NetworkError::InvalidVolume(-1.0))
        );
        assert!(VolumeLedger::new(f64::NAN).is_err());
    }

    #[test]
    fn test_debit_is_clamped() {
        let mut ledger = VolumeLedger::new(30.0).unwrap();
        assert_eq!(ledger.debit_personal(50.0), 30.0);
        assert_eq!(ledger.personal(), 0.0);
        assert_eq!(ledger.group(), 0.0);
    }

    #[test]
    fn test_base_tracking() {
        let mut ledger = VolumeLedger::new(100.0).unwrap();
        ledger.reset_base();
        ledger.credit_personal(40.0);
        assert_eq!(ledger.group_change(), 40.0);
    }
}
