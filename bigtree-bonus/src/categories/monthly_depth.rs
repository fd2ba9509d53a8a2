//! Monthly depth (MD) bonus.
//!
//! Paid on the second tier of independent lines. Each independent passes up
//! 1% of its personal group; one that is itself MD-qualified passes up 1% of
//! each first-tier line's personal group, floored at the full volume, instead
//! of forwarding their pass-up.

use bigtree_network::{BonusKind, MemberId};

use super::BonusCategory;
use crate::engine::BonusEngine;
use crate::types::Qualification;

/// Independent lines needed to qualify.
pub const MONTHLY_DEPTH_MIN_LINES: usize = 3;

pub struct MonthlyDepthBonus;

impl MonthlyDepthBonus {
    pub fn is_qualified(engine: &BonusEngine<'_>, id: MemberId) -> bool {
        engine.independent_partners(id).len() >= MONTHLY_DEPTH_MIN_LINES
    }

    /// BV passed up to the sponsor's MD bonus. Zero unless independent.
    pub fn pass_up_bv(engine: &BonusEngine<'_>, id: MemberId) -> f64 {
        if !engine.is_independent(id) {
            return 0.0;
        }

        let config = &engine.config().monthly_depth;
        let partners = engine.independent_partners(id);
        let lines: f64 = if partners.len() >= MONTHLY_DEPTH_MIN_LINES {
            partners
                .iter()
                .map(|p| engine.personal_group_bv(*p).max(config.full_bv) * config.rate)
                .sum()
        } else {
            partners.iter().map(|p| Self::pass_up_bv(engine, *p)).sum()
        };
        engine.personal_group_bv(id) * config.rate + lines
    }
}

impl BonusCategory for MonthlyDepthBonus {
    fn kind(&self) -> BonusKind {
        BonusKind::MonthlyDepth
    }

    fn qualification(&self, engine: &BonusEngine<'_>, abo: MemberId) -> Qualification {
        Qualification::from_bool(Self::is_qualified(engine, abo))
    }

    fn amount(&self, engine: &BonusEngine<'_>, abo: MemberId) -> f64 {
        if !Self::is_qualified(engine, abo) {
            return 0.0;
        }

        let config = &engine.config().monthly_depth;
        let mut bonus = 0.0;
        for line in engine.independent_partners(abo) {
            for sub in engine.independent_partners(line) {
                bonus += Self::pass_up_bv(engine, sub);
            }
            let personal_group = engine.personal_group_bv(line);
            if personal_group < config.full_bv {
                bonus -= (config.full_bv - personal_group) * config.rate;
            }
        }
        bonus
    }
}
