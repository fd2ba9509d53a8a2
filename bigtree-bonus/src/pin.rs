//! PIN qualification.
//!
//! SP and SPS are judged on the current ledger. GP and PT are judged on the
//! PINs stored in finalized monthly records. Ranks above PT are not modeled
//! and report [`Qualification::NotImplemented`].

use bigtree_network::{MemberId, Month, PinCount, PinTitle};

use crate::engine::BonusEngine;
use crate::types::{Qualification, Result};

impl<'a> BonusEngine<'a> {
    /// Whether an ABO qualifies for `pin` in `month`.
    pub fn pin_qualification(
        &self,
        abo: MemberId,
        pin: PinTitle,
        month: Month,
    ) -> Result<Qualification> {
        self.require_abo(abo)?;
        let rules = &self.config().pin;

        let qualification = match pin {
            PinTitle::None => Qualification::Qualified,
            PinTitle::Sp => {
                let independents = self.independent_partners(abo).len();
                let personal_group = self.personal_group_pv(abo);
                Qualification::from_bool(
                    personal_group >= rules.sp_pv_minimum
                        || (independents == 1 && personal_group >= rules.sp_pv_condition)
                        || independents >= 2,
                )
            }
            PinTitle::Sps => {
                let independents = self.independent_partners(abo).len();
                Qualification::from_bool(
                    independents == 1 && self.personal_group_pv(abo) < rules.sp_pv_condition,
                )
            }
            PinTitle::Gp => {
                let sp = self.count_pin_within_year(abo, PinTitle::Sp, month)?;
                Qualification::from_bool(sp.count >= rules.gp_sp_months)
            }
            PinTitle::Pt => {
                let sp = self.count_pin_within_fiscal_year(abo, PinTitle::Sp, month)?;
                Qualification::from_bool(
                    sp.count >= rules.pt_sp_months && sp.streak >= rules.pt_sp_streak,
                )
            }
            PinTitle::FPt
            | PinTitle::Rb
            | PinTitle::FRb
            | PinTitle::Sa
            | PinTitle::FSa
            | PinTitle::Em
            | PinTitle::FEm
            | PinTitle::Dia
            | PinTitle::FDia
            | PinTitle::Edc
            | PinTitle::FEdc
            | PinTitle::Ddc
            | PinTitle::FDdc
            | PinTitle::Tdc
            | PinTitle::FTdc
            | PinTitle::Cr
            | PinTitle::FCr
            | PinTitle::Ca
            | PinTitle::FCa => Qualification::NotImplemented,
        };
        Ok(qualification)
    }

    /// Highest PIN the ABO qualifies for in `month`.
    pub fn evaluate_pin(&self, abo: MemberId, month: Month) -> Result<PinTitle> {
        for pin in PinTitle::all_descending() {
            if self.pin_qualification(abo, pin, month)?.is_qualified() {
                return Ok(pin);
            }
        }
        Ok(PinTitle::None)
    }

    /// Records holding `pin` within `start..=end`.
    pub fn count_pin_within(
        &self,
        abo: MemberId,
        pin: PinTitle,
        start: Month,
        end: Month,
    ) -> Result<PinCount> {
        Ok(self.profile(abo)?.records.count_pin_within(pin, start, end))
    }

    /// Records holding `pin` in the twelve months ending at `month`.
    pub fn count_pin_within_year(
        &self,
        abo: MemberId,
        pin: PinTitle,
        month: Month,
    ) -> Result<PinCount> {
        self.count_pin_within(abo, pin, month - 11, month)
    }

    /// Records holding `pin` from the start of the fiscal year to `month`.
    pub fn count_pin_within_fiscal_year(
        &self,
        abo: MemberId,
        pin: PinTitle,
        month: Month,
    ) -> Result<PinCount> {
        self.count_pin_within(abo, pin, month.fiscal_year_start(), month)
    }

    /// Whether the ABO currently holds `pin` as a qualified rank.
    // TODO: derive from the record book once the rules for retaining a PIN
    // across fiscal years are modeled.
    pub fn qualified_pin(&self, _abo: MemberId, _pin: PinTitle) -> Qualification {
        Qualification::NotImplemented
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BonusConfig;
    use bigtree_network::{BonusAmounts, MemberClass, MonthlyRecord, Network};
    use chrono::Utc;

    fn with_records(net: &mut Network, abo: MemberId, first: Month, pins: &[PinTitle]) {
        let profile = net.member_mut(abo).unwrap().abo_mut().unwrap();
        for (i, pin) in pins.iter().enumerate() {
            profile.records.replace_from(MonthlyRecord {
                month: first + i as i32,
                group_volume: 0.0,
                personal_volume: 0.0,
                personal_group_volume: 0.0,
                pin: *pin,
                bonuses: BonusAmounts::default(),
                finalized_at: Utc::now(),
            });
        }
    }

    #[test]
    fn test_sp_by_personal_group() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 1000.0).unwrap();
        let small = net.add_root(MemberClass::Abo, "Small", 999.0).unwrap();
        let engine = BonusEngine::new(&net, &config);
        let month = Month::new(2018, 9);

        assert_eq!(engine.evaluate_pin(top, month).unwrap(), PinTitle::Sp);
        assert_eq!(engine.evaluate_pin(small, month).unwrap(), PinTitle::None);
    }

    #[test]
    fn test_sp_and_sps_with_one_line() {
        let config = BonusConfig::default();
        let month = Month::new(2018, 9);

        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        net.add_child(top, MemberClass::Abo, "A", 1000.0).unwrap();
        let engine = BonusEngine::new(&net, &config);
        assert_eq!(engine.evaluate_pin(top, month).unwrap(), PinTitle::Sps);
        assert_eq!(
            engine.pin_qualification(top, PinTitle::Sp, month).unwrap(),
            Qualification::NotQualified
        );

        net.add_personal(top, 300.0).unwrap();
        let engine = BonusEngine::new(&net, &config);
        assert_eq!(engine.evaluate_pin(top, month).unwrap(), PinTitle::Sp);
    }

    #[test]
    fn test_sp_with_two_lines() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        net.add_child(top, MemberClass::Abo, "A", 1000.0).unwrap();
        net.add_child(top, MemberClass::Abo, "B", 1000.0).unwrap();
        let engine = BonusEngine::new(&net, &config);

        assert_eq!(
            engine.evaluate_pin(top, Month::new(2018, 9)).unwrap(),
            PinTitle::Sp
        );
    }

    #[test]
    fn test_gp_needs_three_sp_months_in_a_year() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        let start = Month::new(2018, 1);
        with_records(
            &mut net,
            top,
            start,
            &[PinTitle::Sp, PinTitle::None, PinTitle::Sp, PinTitle::Sp],
        );
        let engine = BonusEngine::new(&net, &config);

        assert_eq!(engine.evaluate_pin(top, start + 4).unwrap(), PinTitle::Gp);
        // January drops out of the trailing year in 2019-01
        assert_eq!(engine.evaluate_pin(top, start + 12).unwrap(), PinTitle::None);
    }

    #[test]
    fn test_pt_needs_six_months_and_a_streak() {
        let config = BonusConfig::default();
        let fiscal_start = Month::new(2018, 9);

        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        with_records(&mut net, top, fiscal_start, &[PinTitle::Sp; 6]);
        let engine = BonusEngine::new(&net, &config);
        assert_eq!(engine.evaluate_pin(top, fiscal_start + 5).unwrap(), PinTitle::Pt);

        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        let alternating = [
            PinTitle::Sp,
            PinTitle::Sp,
            PinTitle::None,
            PinTitle::Sp,
            PinTitle::Sp,
            PinTitle::None,
            PinTitle::Sp,
            PinTitle::Sp,
        ];
        with_records(&mut net, top, fiscal_start, &alternating);
        let engine = BonusEngine::new(&net, &config);
        // six SP months but the current run is only two
        assert_eq!(engine.evaluate_pin(top, fiscal_start + 7).unwrap(), PinTitle::Gp);
    }

    #[test]
    fn test_pt_window_is_the_fiscal_year() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 0.0).unwrap();
        // 2018-06 .. 2018-11 straddles the September fiscal boundary
        with_records(&mut net, top, Month::new(2018, 6), &[PinTitle::Sp; 6]);
        let engine = BonusEngine::new(&net, &config);

        let count = engine
            .count_pin_within_fiscal_year(top, PinTitle::Sp, Month::new(2018, 11))
            .unwrap();
        assert_eq!(count, PinCount { count: 3, streak: 3 });
        assert_eq!(
            engine.pin_qualification(top, PinTitle::Pt, Month::new(2018, 11)).unwrap(),
            Qualification::NotQualified
        );
    }

    #[test]
    fn test_higher_ranks_not_implemented() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 5000.0).unwrap();
        let engine = BonusEngine::new(&net, &config);
        let month = Month::new(2018, 9);

        for pin in PinTitle::ALL.into_iter().filter(|p| *p > PinTitle::Pt) {
            assert_eq!(
                engine.pin_qualification(top, pin, month).unwrap(),
                Qualification::NotImplemented
            );
        }
        assert_eq!(
            engine.qualified_pin(top, PinTitle::Pt),
            Qualification::NotImplemented
        );
        assert_eq!(engine.evaluate_pin(top, month).unwrap(), PinTitle::Sp);
    }
}
