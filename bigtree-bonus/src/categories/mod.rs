//! Bonus category definitions.
//!
//! Each category computes its qualification and amount for one ABO from the
//! engine's view of the network. The engine sums whatever is registered, so a
//! new category only needs an implementation and a registry entry.

pub mod first;
pub mod leadership;
pub mod monthly_depth;
pub mod pending;
pub mod ruby;

pub use first::FirstBonus;
pub use leadership::LeadershipBonus;
pub use monthly_depth::MonthlyDepthBonus;
pub use pending::PendingBonus;
pub use ruby::RubyBonus;

use bigtree_network::{BonusKind, MemberId};

use crate::engine::BonusEngine;
use crate::types::Qualification;

/// Trait for a single bonus category.
///
/// Callers guarantee `abo` is an ABO in the engine's network.
pub trait BonusCategory: Send + Sync {
    /// Which category this computes
    fn kind(&self) -> BonusKind;

    /// Whether the ABO qualifies this month
    fn qualification(&self, engine: &BonusEngine<'_>, abo: MemberId) -> Qualification;

    /// Amount earned, in BV. Zero when not qualified.
    fn amount(&self, engine: &BonusEngine<'_>, abo: MemberId) -> f64;
}

/// The standard plan, one entry per [`BonusKind`] in reporting order.
pub fn standard_categories() -> Vec<Box<dyn BonusCategory>> {
    vec![
        Box::new(FirstBonus),
        Box::new(LeadershipBonus),
        Box::new(RubyBonus),
        Box::new(MonthlyDepthBonus),
        Box::new(PendingBonus::new(BonusKind::Emerald)),
        Box::new(PendingBonus::new(BonusKind::Diamond)),
        Box::new(PendingBonus::new(BonusKind::DiamondPlus)),
        Box::new(PendingBonus::new(BonusKind::OneTime)),
        Box::new(PendingBonus::new(BonusKind::Faa)),
    ]
}
