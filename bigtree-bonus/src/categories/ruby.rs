//! Ruby bonus.

use bigtree_network::{BonusKind, MemberId, PinTitle};

use super::BonusCategory;
use crate::engine::BonusEngine;
use crate::types::Qualification;

/// Percentage of personal volume plus every non-independent line, paid once
/// personal group volume reaches the ruby level.
pub struct RubyBonus;

impl RubyBonus {
    pub fn is_qualified(engine: &BonusEngine<'_>, id: MemberId) -> bool {
        engine.personal_group_pv(id) >= engine.config().ruby.full_pv
    }

    /// BV the ruby rate applies to.
    pub fn base_bv(engine: &BonusEngine<'_>, id: MemberId) -> f64 {
        let mut bv = engine.personal_bv(id);
        for member in engine.network().support_members(id) {
            let is_abo = engine.network().member(*member).map_or(false, |m| m.is_abo());
            if is_abo && engine.is_independent(*member) {
                continue;
            }
            // qualified platinums below the top rate are paid separately
            if is_abo && engine.qualified_pin(*member, PinTitle::Pt).is_qualified() {
                continue;
            }
            bv += engine.group_bv(*member);
        }
        bv
    }
}

impl BonusCategory for RubyBonus {
    fn kind(&self) -> BonusKind {
        BonusKind::Ruby
    }

    fn qualification(&self, engine: &BonusEngine<'_>, abo: MemberId) -> Qualification {
        Qualification::from_bool(Self::is_qualified(engine, abo))
    }

    fn amount(&self, engine: &BonusEngine<'_>, abo: MemberId) -> f64 {
        if !Self::is_qualified(engine, abo) {
            return 0.0;
        }
        Self::base_bv(engine, abo) * engine.config().ruby.rate
    }
}
