//! First (performance) bonus.

use bigtree_network::{BonusKind, MemberId};

use super::BonusCategory;
use crate::engine::BonusEngine;
use crate::types::Qualification;

/// Stairstep bonus on the whole group, less what each direct ABO partner
/// earns on its own group. Every ABO qualifies.
pub struct FirstBonus;

impl FirstBonus {
    /// Stairstep amount on a member's full group volume.
    pub fn group_bonus(engine: &BonusEngine<'_>, id: MemberId) -> f64 {
        engine.group_bv(id) * engine.first_bonus_rate(id)
    }
}

impl BonusCategory for FirstBonus {
    fn kind(&self) -> BonusKind {
        BonusKind::First
    }

    fn qualification(&self, _engine: &BonusEngine<'_>, _abo: MemberId) -> Qualification {
        Qualification::Qualified
    }

    fn amount(&self, engine: &BonusEngine<'_>, abo: MemberId) -> f64 {
        let partners: f64 = engine
            .network()
            .abo_partners(abo)
            .into_iter()
            .map(|p| Self::group_bonus(engine, p))
            .sum();
        Self::group_bonus(engine, abo) - partners
    }
}
