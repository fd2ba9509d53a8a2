//! Leadership bonus.
//!
//! Qualified ABOs collect the pass-up of each independent line. An
//! unqualified ABO forwards its lines' pass-up, plus its own, to its sponsor.

use bigtree_network::{BonusKind, MemberId};

use super::BonusCategory;
use crate::engine::BonusEngine;
use crate::types::Qualification;

pub struct LeadershipBonus;

impl LeadershipBonus {
    /// At least one independent line, and either a second line or enough
    /// personal group volume.
    pub fn is_qualified(engine: &BonusEngine<'_>, id: MemberId) -> bool {
        let independents = engine.independent_partners(id).len();
        let partial = engine.config().leadership.partial_pv;
        independents > 1 || (independents == 1 && engine.personal_group_pv(id) >= partial)
    }

    fn pure_pass_up_bv(engine: &BonusEngine<'_>, id: MemberId) -> f64 {
        engine.personal_group_bv(id) * engine.config().leadership.rate
    }

    /// BV this ABO contributes to its sponsor's leadership bonus.
    pub fn pass_up_bv(engine: &BonusEngine<'_>, id: MemberId) -> f64 {
        let pure = Self::pure_pass_up_bv(engine, id);
        if Self::is_qualified(engine, id) {
            pure.max(engine.config().leadership.minimum_assure)
        } else {
            Self::partners_pass_up_bv(engine, id) + pure
        }
    }

    fn partners_pass_up_bv(engine: &BonusEngine<'_>, id: MemberId) -> f64 {
        engine
            .independent_partners(id)
            .into_iter()
            .map(|p| Self::pass_up_bv(engine, p))
            .sum()
    }
}

impl BonusCategory for LeadershipBonus {
    fn kind(&self) -> BonusKind {
        BonusKind::Leadership
    }

    fn qualification(&self, engine: &BonusEngine<'_>, abo: MemberId) -> Qualification {
        Qualification::from_bool(Self::is_qualified(engine, abo))
    }

    fn amount(&self, engine: &BonusEngine<'_>, abo: MemberId) -> f64 {
        if !Self::is_qualified(engine, abo) {
            return 0.0;
        }

        let config = &engine.config().leadership;
        let bonus = Self::partners_pass_up_bv(engine, abo);
        if engine.personal_group_pv(abo) >= config.full_pv {
            return bonus;
        }

        // below full volume the ABO funds its own minimum pass-up
        let shortfall = config.minimum_assure - Self::pure_pass_up_bv(engine, abo);
        if shortfall > 0.0 {
            bonus - shortfall
        } else {
            bonus
        }
    }
}
