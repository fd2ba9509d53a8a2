//! Month finalization.
//!
//! Finalizing is the only way monthly records are written. Refinalizing a
//! month discards that month and everything after it before the new snapshot
//! is appended.

use bigtree_network::{Member, MemberId, Month, MonthlyRecord, Network, NetworkError};
use chrono::Utc;
use tracing::info;

use crate::config::BonusConfig;
use crate::engine::BonusEngine;
use crate::types::{BonusError, Result};

/// Snapshot one ABO's current state as the record for `month`.
pub fn finalize_month(
    network: &mut Network,
    config: &BonusConfig,
    abo: MemberId,
    month: Month,
) -> Result<MonthlyRecord> {
    truncate_records(network, abo, month)?;
    let record = snapshot(&BonusEngine::new(network, config), abo, month)?;
    store_record(network, abo, record.clone())?;

    info!(
        member = %abo,
        month = %month,
        pin = %record.pin,
        total = record.total_bonus(),
        "Finalized month"
    );
    Ok(record)
}

/// Finalize every ABO in the network for `month`.
///
/// All record books are truncated before any snapshot is taken, so each
/// snapshot sees the same state. Returns the records written, in pre-order.
pub fn finalize_all(
    network: &mut Network,
    config: &BonusConfig,
    month: Month,
) -> Result<Vec<(MemberId, MonthlyRecord)>> {
    let abos: Vec<MemberId> = network
        .preorder_all()
        .into_iter()
        .filter(|id| network.member(*id).map_or(false, Member::is_abo))
        .collect();

    for abo in &abos {
        truncate_records(network, *abo, month)?;
    }

    let records = {
        let engine = BonusEngine::new(network, config);
        abos.iter()
            .map(|abo| -> Result<(MemberId, MonthlyRecord)> {
                Ok((*abo, snapshot(&engine, *abo, month)?))
            })
            .collect::<Result<Vec<_>>>()?
    };

    for (abo, record) in &records {
        store_record(network, *abo, record.clone())?;
    }

    info!(month = %month, abos = records.len(), "Finalized month for network");
    Ok(records)
}

fn truncate_records(network: &mut Network, abo: MemberId, month: Month) -> Result<usize> {
    let member = network
        .member_mut(abo)
        .ok_or(NetworkError::MemberNotFound(abo))?;
    let profile = member.abo_mut().ok_or(BonusError::NotAnAbo(abo))?;
    Ok(profile.records.truncate_from(month))
}

fn snapshot(engine: &BonusEngine<'_>, abo: MemberId, month: Month) -> Result<MonthlyRecord> {
    Ok(MonthlyRecord {
        month,
        group_volume: engine.group_pv(abo),
        personal_volume: engine.personal_pv(abo),
        personal_group_volume: engine.personal_group_pv(abo),
        pin: engine.evaluate_pin(abo, month)?,
        bonuses: engine.amounts(abo)?,
        finalized_at: Utc::now(),
    })
}

fn store_record(network: &mut Network, abo: MemberId, record: MonthlyRecord) -> Result<()> {
    let profile = network
        .member_mut(abo)
        .and_then(Member::abo_mut)
        .ok_or(BonusError::NotAnAbo(abo))?;
    profile.pin = record.pin;
    profile.records.replace_from(record);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigtree_network::{BonusKind, MemberClass, PinTitle};

    fn records(network: &Network, abo: MemberId) -> Vec<MonthlyRecord> {
        network
            .get(abo)
            .unwrap()
            .abo()
            .unwrap()
            .records
            .records()
            .to_vec()
    }

    #[test]
    fn test_snapshot_contents() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 700.0).unwrap();
        net.add_child(top, MemberClass::Abo, "Child", 500.0).unwrap();
        let month = Month::new(2018, 9);

        let record = finalize_month(&mut net, &config, top, month).unwrap();
        assert_eq!(record.month, month);
        assert_eq!(record.group_volume, 1200.0);
        assert_eq!(record.personal_volume, 700.0);
        assert_eq!(record.personal_group_volume, 1200.0);
        assert_eq!(record.pin, PinTitle::Sp);
        assert!((record.bonuses.get(BonusKind::First) - 177.0).abs() < 1e-9);

        let profile = net.get(top).unwrap().abo().unwrap();
        assert_eq!(profile.pin, PinTitle::Sp);
        assert_eq!(profile.records.len(), 1);
    }

    #[test]
    fn test_refinalize_truncates_later_months() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        let m = Month::new(2018, 9);

        for i in 0..3 {
            finalize_month(&mut net, &config, top, m + i).unwrap();
        }
        assert_eq!(records(&net, top).len(), 3);

        net.add_personal(top, 50.0).unwrap();
        finalize_month(&mut net, &config, top, m).unwrap();
        let kept = records(&net, top);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].month, m);
        assert_eq!(kept[0].personal_volume, 150.0);
    }

    #[test]
    fn test_gp_after_three_sp_months() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 1000.0).unwrap();
        let m = Month::new(2018, 9);

        for i in 0..3 {
            let record = finalize_month(&mut net, &config, top, m + i).unwrap();
            assert_eq!(record.pin, PinTitle::Sp);
        }
        let record = finalize_month(&mut net, &config, top, m + 3).unwrap();
        assert_eq!(record.pin, PinTitle::Gp);
    }

    #[test]
    fn test_finalize_all_covers_every_abo() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        let a = net.add_child(top, MemberClass::Abo, "A", 100.0).unwrap();
        net.add_child(a, MemberClass::OffMember, "Customer", 10.0).unwrap();
        let loose = net.add_root(MemberClass::Abo, "Loose", 20.0).unwrap();
        let m = Month::new(2019, 1);

        finalize_all(&mut net, &config, m + 1).unwrap();
        let written = finalize_all(&mut net, &config, m).unwrap();
        let ids: Vec<_> = written.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![top, a, loose]);

        for abo in [top, a, loose] {
            let kept = records(&net, abo);
            assert_eq!(kept.len(), 1);
            assert_eq!(kept[0].month, m);
        }
    }

    #[test]
    fn test_non_abo_rejected() {
        let config = BonusConfig::default();
        let mut net = Network::with_stamp_seed(1);
        let top = net.add_root(MemberClass::Abo, "Top", 100.0).unwrap();
        let shop = net.add_child(top, MemberClass::OnMember, "Shop", 10.0).unwrap();

        assert!(matches!(
            finalize_month(&mut net, &config, shop, Month::new(2018, 9)),
            Err(BonusError::NotAnAbo(_))
        ));
    }
}
