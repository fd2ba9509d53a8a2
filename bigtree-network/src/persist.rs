//! Flat member records for persistence.
//!
//! A network is stored as one [`MemberRecord`] per member, tree by tree in
//! pre-order. Replay only needs to look at the previous record's sponsor
//! chain to find each record's sponsor, which keeps loading O(n · depth).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::member::{Member, MemberClass, MemberId};
use crate::tree::Network;

/// Sponsor stamp written for top-level members.
pub const ROOT_SPONSOR: u64 = 0;

/// One persisted member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// [`MemberClass`] ordinal
    pub class: u8,
    pub stamp: u64,
    pub name: String,
    pub personal_volume: f64,
    /// Stamp of the sponsor, [`ROOT_SPONSOR`] for top-level members
    pub sponsor_stamp: u64,
}

impl MemberRecord {
    fn from_member(member: &Member, sponsor: Option<MemberId>) -> Self {
        Self {
            class: member.class().ordinal(),
            stamp: member.id().stamp(),
            name: member.name.clone(),
            personal_volume: member.volume().personal(),
            sponsor_stamp: sponsor.map_or(ROOT_SPONSOR, |s| s.stamp()),
        }
    }

    /// Whether the record starts a new top-level tree.
    pub fn is_root(&self) -> bool {
        self.sponsor_stamp == ROOT_SPONSOR
    }
}

impl Network {
    /// Flatten the network into records, tree by tree in pre-order.
    pub fn to_records(&self) -> Vec<MemberRecord> {
        self.preorder_all()
            .into_iter()
            .filter_map(|id| {
                self.member(id)
                    .map(|m| MemberRecord::from_member(m, self.sponsor(id)))
            })
            .collect()
    }

    /// Rebuild a network from records produced by [`Network::to_records`].
    ///
    /// All or nothing: any malformed record fails the whole load and the
    /// partially built network is dropped. Volume rollups are rebuilt by the
    /// same graft path live edits use, and the stamp counter resumes after
    /// the largest stamp seen.
    pub fn from_records(records: &[MemberRecord]) -> Result<Network> {
        let mut network = Network::with_stamp_seed(1);
        let mut previous: Option<MemberId> = None;

        for record in records {
            if record.stamp == ROOT_SPONSOR {
                return Err(NetworkError::InvalidStamp(record.stamp));
            }
            let id = MemberId(record.stamp);
            let class = MemberClass::from_ordinal(record.class)?;
            network.insert_member(Member::new(
                id,
                class,
                record.name.clone(),
                record.personal_volume,
            )?)?;

            if !record.is_root() {
                let from = previous.ok_or(NetworkError::OrphanRecord(id))?;
                let sponsor = network
                    .find_in_sponsor_chain(from, record.sponsor_stamp)
                    .ok_or(NetworkError::SponsorNotFound {
                        member: id,
                        sponsor: record.sponsor_stamp,
                    })?;
                network.attach(id, sponsor)?;
            }
            previous = Some(id);
        }

        debug!(members = network.len(), roots = network.roots().len(), "Rebuilt network from records");
        Ok(network)
    }
}

/// Hex SHA-256 over the JSON form of a record list.
pub fn records_digest(records: &[MemberRecord]) -> String {
    let mut hasher = Sha256::new();
    // Vec of plain structs always serializes
    if let Ok(bytes) = serde_json::to_vec(records) {
        hasher.update(&bytes);
    }
    hex::encode(hasher.finalize())
}
