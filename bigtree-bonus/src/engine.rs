//! Bonus engine: per-ABO amounts, totals and summaries.
//!
//! Nothing is cached. Every amount is recomputed from the current tree and
//! ledger when asked, so results always reflect the latest edits.

use bigtree_network::{
    AboProfile, BonusAmounts, BonusKind, Member, MemberId, Network, PinTitle,
};
use serde::Serialize;

use crate::categories::{standard_categories, BonusCategory};
use crate::config::BonusConfig;
use crate::types::{BonusError, Qualification, Result};

/// Read-only view of a network under a bonus plan.
pub struct BonusEngine<'a> {
    network: &'a Network,
    config: &'a BonusConfig,
    categories: Vec<Box<dyn BonusCategory>>,
}

/// One category's result for one ABO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryOutcome {
    pub kind: BonusKind,
    pub qualification: Qualification,
    pub amount: f64,
}

/// Every category's result for one ABO.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusSummary {
    pub member: MemberId,
    pub categories: Vec<CategoryOutcome>,
    pub total: f64,
    /// Total minus the total at the last base reset
    pub total_change: f64,
}

impl BonusSummary {
    pub fn get(&self, kind: BonusKind) -> Option<&CategoryOutcome> {
        self.categories.iter().find(|c| c.kind == kind)
    }

    /// Amounts keyed by category.
    pub fn amounts(&self) -> BonusAmounts {
        let mut amounts = BonusAmounts::default();
        for outcome in &self.categories {
            amounts.set(outcome.kind, outcome.amount);
        }
        amounts
    }

    /// Non-zero categories as `[First]12.6, [Leadership]60.0`.
    pub fn describe(&self) -> String {
        self.categories
            .iter()
            .filter(|c| c.amount != 0.0)
            .map(|c| format!("[{}]{:.1}", c.kind.title(), c.amount))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> BonusEngine<'a> {
    /// Engine with the standard set of categories.
    pub fn new(network: &'a Network, config: &'a BonusConfig) -> Self {
        Self::with_categories(network, config, standard_categories())
    }

    /// Engine with a custom set of categories.
    pub fn with_categories(
        network: &'a Network,
        config: &'a BonusConfig,
        categories: Vec<Box<dyn BonusCategory>>,
    ) -> Self {
        Self {
            network,
            config,
            categories,
        }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    pub fn config(&self) -> &'a BonusConfig {
        self.config
    }

    pub fn categories(&self) -> &[Box<dyn BonusCategory>] {
        &self.categories
    }

    pub(crate) fn profile(&self, abo: MemberId) -> Result<&'a AboProfile> {
        self.require_abo(abo)?
            .abo()
            .ok_or(BonusError::NotAnAbo(abo))
    }

    /// Qualification and amount for every registered category.
    pub fn summary(&self, abo: MemberId) -> Result<BonusSummary> {
        let profile = self.profile(abo)?;
        let categories: Vec<_> = self
            .categories
            .iter()
            .map(|c| CategoryOutcome {
                kind: c.kind(),
                qualification: c.qualification(self, abo),
                amount: c.amount(self, abo),
            })
            .collect();
        let total = categories.iter().map(|c| c.amount).sum::<f64>();

        Ok(BonusSummary {
            member: abo,
            categories,
            total,
            total_change: total - profile.bonus_base_total,
        })
    }

    /// Amount for one category. Zero if no category of that kind is registered.
    pub fn amount(&self, abo: MemberId, kind: BonusKind) -> Result<f64> {
        self.require_abo(abo)?;
        Ok(self
            .categories
            .iter()
            .find(|c| c.kind() == kind)
            .map_or(0.0, |c| c.amount(self, abo)))
    }

    pub fn amounts(&self, abo: MemberId) -> Result<BonusAmounts> {
        self.require_abo(abo)?;
        let mut amounts = BonusAmounts::default();
        for category in &self.categories {
            amounts.set(category.kind(), category.amount(self, abo));
        }
        Ok(amounts)
    }

    /// Sum over every registered category.
    pub fn total(&self, abo: MemberId) -> Result<f64> {
        Ok(self.amounts(abo)?.total())
    }

    pub fn total_change(&self, abo: MemberId) -> Result<f64> {
        let base = self.profile(abo)?.bonus_base_total;
        Ok(self.total(abo)? - base)
    }

    /// Non-zero amounts as one display line.
    pub fn describe(&self, abo: MemberId) -> Result<String> {
        Ok(self.summary(abo)?.describe())
    }

    /// Current PIN abbreviation, or the stairstep percentage such as `9%`
    /// when no PIN is held.
    pub fn pin_title(&self, abo: MemberId) -> Result<String> {
        let profile = self.profile(abo)?;
        if profile.pin == PinTitle::None {
            let percent = (self.first_bonus_rate(abo) * 100.0).round() as i64;
            Ok(format!("{}%", percent))
        } else {
            Ok(profile.pin.to_string())
        }
    }

    /// `[name], B=first` with `/total` appended when other categories pay.
    pub fn title_line(&self, abo: MemberId) -> Result<String> {
        let member = self.require_abo(abo)?;
        let amounts = self.amounts(abo)?;
        let first = amounts.get(BonusKind::First);
        let total = amounts.total();

        let mut title = format!("[{}], B={:.1}", member.name, first);
        if total != first {
            title.push_str(&format!("/{:.1}", total));
        }
        Ok(title)
    }

    /// `[Personal]20.0, [Personal group]140.0, [Group]140.0`
    pub fn volume_line(&self, abo: MemberId) -> Result<String> {
        self.require_abo(abo)?;
        Ok(format!(
            "[Personal]{:.1}, [Personal group]{:.1}, [Group]{:.1}",
            self.personal_pv(abo),
            self.personal_group_pv(abo),
            self.group_pv(abo)
        ))
    }

    /// Current totals of every ABO in a subtree, to become their new base.
    pub fn base_totals(&self, root: MemberId) -> Result<Vec<(MemberId, f64)>> {
        self.network.get(root)?;
        self.network
            .preorder(root)
            .into_iter()
            .filter(|id| self.network.member(*id).map_or(false, Member::is_abo))
            .map(|id| -> Result<(MemberId, f64)> { Ok((id, self.total(id)?)) })
            .collect()
    }
}

/// Snapshot group volume and bonus totals as the base for a subtree.
pub fn reset_base(network: &mut Network, config: &BonusConfig, root: MemberId) -> Result<()> {
    let totals = BonusEngine::new(network, config).base_totals(root)?;
    network.reset_base(root)?;
    for (id, total) in totals {
        if let Some(profile) = network.member_mut(id).and_then(Member::abo_mut) {
            profile.bonus_base_total = total;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigtree_network::{MemberClass, Scenario};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn you_six(net: &Network) -> MemberId {
        *net.roots()
            .iter()
            .find(|r| net.get(**r).unwrap().name == "You-6")
            .unwrap()
    }

    #[test]
    fn test_you_six_summary() {
        let config = BonusConfig::default();
        let net = Scenario::Network.default_network("Owner").unwrap();
        let you = you_six(&net);
        let engine = BonusEngine::new(&net, &config);

        assert_eq!(engine.personal_group_pv(you), 140.0);
        let summary = engine.summary(you).unwrap();
        // 140 * 9% - 6 * (20 * 3%)
        assert!(close(summary.total, 9.0));
        assert_eq!(summary.categories.len(), 9);
        assert_eq!(
            summary.get(BonusKind::Emerald).map(|c| c.qualification),
            Some(Qualification::NotImplemented)
        );
        assert_eq!(summary.describe(), "[First]9.0");
        assert_eq!(engine.pin_title(you).unwrap(), "9%");
        assert_eq!(engine.title_line(you).unwrap(), "[You-6], B=9.0");
        assert_eq!(
            engine.volume_line(you).unwrap(),
            "[Personal]20.0, [Personal group]140.0, [Group]140.0"
        );
    }

    #[test]
    fn test_total_includes_every_category() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 1000.0).unwrap();
        net.add_child(top, MemberClass::Abo, "A", 1000.0).unwrap();
        net.add_child(top, MemberClass::Abo, "B", 1000.0).unwrap();
        let engine = BonusEngine::new(&net, &config);

        let amounts = engine.amounts(top).unwrap();
        // 3000 * 21% - 2 * 210
        assert!(close(amounts.get(BonusKind::First), 210.0));
        assert!(close(amounts.get(BonusKind::Leadership), 120.0));
        assert_eq!(amounts.get(BonusKind::Ruby), 0.0);
        assert!(close(engine.total(top).unwrap(), 330.0));
        assert_eq!(engine.title_line(top).unwrap(), "[Top], B=210.0/330.0");
        assert_eq!(
            engine.describe(top).unwrap(),
            "[First]210.0, [Leadership]120.0"
        );
    }

    #[test]
    fn test_reset_base_tracks_change() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();

        reset_base(&mut net, &config, top).unwrap();
        assert!(close(BonusEngine::new(&net, &config).total_change(top).unwrap(), 0.0));

        net.add_personal(top, 20.0).unwrap();
        let engine = BonusEngine::new(&net, &config);
        // 120 * 9% - 100 * 6%
        assert!(close(engine.total_change(top).unwrap(), 4.8));
        assert_eq!(net.get(top).unwrap().volume().group_change(), 20.0);
    }

    #[test]
    fn test_non_abo_rejected() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        let shop = net.add_child(top, MemberClass::OffMember, "Shop", 10.0).unwrap();
        let engine = BonusEngine::new(&net, &config);

        assert!(matches!(engine.summary(shop), Err(BonusError::NotAnAbo(_))));
        assert!(matches!(
            engine.total(MemberId(42)),
            Err(BonusError::Network(_))
        ));
    }
}
