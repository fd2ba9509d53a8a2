//! Volume views that depend on the bonus plan.
//!
//! Independence is defined by the first bonus stairstep, so personal group
//! volume (group minus independent lines) is derived here rather than stored
//! in the ledger. Everything is recomputed on read; the ledger's group totals
//! are already current, so each query only looks at direct partners.

use bigtree_network::{Member, MemberId, VolumeLedger};

use crate::engine::BonusEngine;
use crate::types::{BonusError, Result};

impl<'a> BonusEngine<'a> {
    /// Look up a member that must be an ABO.
    pub fn require_abo(&self, id: MemberId) -> Result<&'a Member> {
        let member = self.network().get(id)?;
        if member.is_abo() {
            Ok(member)
        } else {
            Err(BonusError::NotAnAbo(id))
        }
    }

    fn ledger(&self, id: MemberId) -> Option<&'a VolumeLedger> {
        self.network().member(id).map(Member::volume)
    }

    /// Personal PV, zero for unknown members.
    pub fn personal_pv(&self, id: MemberId) -> f64 {
        self.ledger(id).map_or(0.0, VolumeLedger::personal)
    }

    /// Group PV, zero for unknown members.
    pub fn group_pv(&self, id: MemberId) -> f64 {
        self.ledger(id).map_or(0.0, VolumeLedger::group)
    }

    /// Personal volume converted to BV.
    pub fn personal_bv(&self, id: MemberId) -> f64 {
        self.config().pv_to_bv(self.personal_pv(id))
    }

    /// Group volume converted to BV.
    pub fn group_bv(&self, id: MemberId) -> f64 {
        self.config().pv_to_bv(self.group_pv(id))
    }

    /// Stairstep rate earned by the member's group volume.
    pub fn first_bonus_rate(&self, id: MemberId) -> f64 {
        self.config().first_bonus_rate(self.group_pv(id))
    }

    /// An ABO whose own group volume reaches the top stairstep rate.
    pub fn is_independent(&self, id: MemberId) -> bool {
        self.network().member(id).map_or(false, Member::is_abo)
            && self.first_bonus_rate(id) >= self.config().max_first_bonus_rate()
    }

    /// Direct ABO partners that are independent, in display order.
    pub fn independent_partners(&self, id: MemberId) -> Vec<MemberId> {
        self.network()
            .abo_partners(id)
            .into_iter()
            .filter(|p| self.is_independent(*p))
            .collect()
    }

    /// Group volume of the independent partners.
    pub fn independent_pv(&self, id: MemberId) -> f64 {
        self.independent_partners(id)
            .iter()
            .map(|p| self.group_pv(*p))
            .sum()
    }

    /// Independent partners' group volume in BV.
    pub fn independent_bv(&self, id: MemberId) -> f64 {
        self.config().pv_to_bv(self.independent_pv(id))
    }

    /// Group volume excluding independent lines.
    pub fn personal_group_pv(&self, id: MemberId) -> f64 {
        self.group_pv(id) - self.independent_pv(id)
    }

    /// Personal group volume in BV.
    pub fn personal_group_bv(&self, id: MemberId) -> f64 {
        self.config().pv_to_bv(self.personal_group_pv(id))
    }

    /// Independent with no independent partners of its own.
    pub fn is_pure_independent(&self, id: MemberId) -> bool {
        self.is_independent(id) && self.independent_partners(id).is_empty()
    }

    /// The deepest independents reachable through independent lines: each
    /// independent partner if it has no independents below it, otherwise its
    /// own pure downline.
    pub fn pure_independent_downline(&self, id: MemberId) -> Vec<MemberId> {
        let mut downline = Vec::new();
        for partner in self.independent_partners(id) {
            if self.independent_partners(partner).is_empty() {
                downline.push(partner);
            } else {
                downline.extend(self.pure_independent_downline(partner));
            }
        }
        downline
    }
}

#[cfg(test)]
mod tests {
    use bigtree_network::{MemberClass, Network};

    use crate::config::BonusConfig;
    use crate::engine::BonusEngine;
    use crate::types::BonusError;

    #[test]
    fn test_independence_depends_on_own_group() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        let a = net.add_child(top, MemberClass::Abo, "A", 999.0).unwrap();
        let b = net.add_child(top, MemberClass::Abo, "B", 400.0).unwrap();
        net.add_child(b, MemberClass::Abo, "B1", 600.0).unwrap();

        let engine = BonusEngine::new(&net, &config);
        assert!(!engine.is_independent(a));
        assert!(engine.is_independent(b));
        assert_eq!(engine.independent_partners(top), vec![b]);
        assert_eq!(engine.independent_pv(top), 1000.0);
        assert_eq!(engine.personal_group_pv(top), 1099.0);
        // top itself reaches the top rate from group volume alone
        assert!(engine.is_independent(top));
    }

    #[test]
    fn test_graft_keeps_personal_group_consistent() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        let mid = net.add_child(top, MemberClass::Abo, "Mid", 100.0).unwrap();
        let leg = net.add_root(MemberClass::Abo, "Leg", 1000.0).unwrap();

        net.attach(leg, mid).unwrap();
        {
            let engine = BonusEngine::new(&net, &config);
            assert_eq!(engine.personal_group_pv(mid), 100.0);
            assert!(engine.is_independent(mid));
            assert_eq!(engine.personal_group_pv(top), 100.0);
        }

        net.detach(leg).unwrap();
        let engine = BonusEngine::new(&net, &config);
        assert_eq!(engine.personal_group_pv(mid), 100.0);
        assert_eq!(engine.personal_group_pv(top), 200.0);
    }

    #[test]
    fn test_pure_independent_downline() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        let a = net.add_child(top, MemberClass::Abo, "A", 0.0).unwrap();
        let a1 = net.add_child(a, MemberClass::Abo, "A1", 1000.0).unwrap();
        let b = net.add_child(top, MemberClass::Abo, "B", 1000.0).unwrap();

        let engine = BonusEngine::new(&net, &config);
        assert!(engine.is_pure_independent(a1));
        assert!(!engine.is_pure_independent(a));
        assert_eq!(engine.pure_independent_downline(top), vec![a1, b]);
    }

    #[test]
    fn test_non_abo_is_never_independent() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        let shop = net.add_child(top, MemberClass::OnMember, "Shop", 5000.0).unwrap();

        let engine = BonusEngine::new(&net, &config);
        assert!(!engine.is_independent(shop));
        assert!(matches!(engine.require_abo(shop), Err(BonusError::NotAnAbo(_))));
        assert_eq!(engine.personal_group_pv(top), 5000.0);
    }
}
