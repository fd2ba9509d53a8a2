//! Categories whose rules are not modeled yet.

use bigtree_network::{BonusKind, MemberId};

use super::BonusCategory;
use crate::engine::BonusEngine;
use crate::types::Qualification;

/// Never qualifies and always pays zero.
pub struct PendingBonus {
    kind: BonusKind,
}

impl PendingBonus {
    pub fn new(kind: BonusKind) -> Self {
        Self { kind }
    }
}

impl BonusCategory for PendingBonus {
    fn kind(&self) -> BonusKind {
        self.kind
    }

    fn qualification(&self, _engine: &BonusEngine<'_>, _abo: MemberId) -> Qualification {
        Qualification::NotImplemented
    }

    fn amount(&self, _engine: &BonusEngine<'_>, _abo: MemberId) -> f64 {
        0.0
    }
}
