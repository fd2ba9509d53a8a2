//! Network members: ABOs, online members and offline customers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::pin::PinTitle;
use crate::record::RecordBook;
use crate::volume::VolumeLedger;

/// Unique, monotonic member stamp. Also identifies the member's node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    pub fn stamp(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Member class as persisted. Ordinals are part of the stored record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberClass {
    Abo = 0,
    OnMember = 1,
    OffMember = 2,
}

impl MemberClass {
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Class from its persisted ordinal.
    pub fn from_ordinal(ordinal: u8) -> Result<Self> {
        match ordinal {
            0 => Ok(Self::Abo),
            1 => Ok(Self::OnMember),
            2 => Ok(Self::OffMember),
            other => Err(NetworkError::UnknownMemberClass(other)),
        }
    }

    /// Prefix for generated default names.
    pub fn default_name_prefix(&self) -> &'static str {
        match self {
            Self::Abo => "abo",
            Self::OnMember => "onMember",
            Self::OffMember => "offMember",
        }
    }
}

/// State only an ABO carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AboProfile {
    /// PIN from the most recent evaluation
    pub pin: PinTitle,
    /// Finalized monthly records
    pub records: RecordBook,
    /// Total bonus at the last base reset, for change display only
    pub bonus_base_total: f64,
}

/// Variant-specific member state.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Abo(AboProfile),
    OnMember,
    OffMember,
}

impl MemberKind {
    pub fn for_class(class: MemberClass) -> Self {
        match class {
            MemberClass::Abo => Self::Abo(AboProfile::default()),
            MemberClass::OnMember => Self::OnMember,
            MemberClass::OffMember => Self::OffMember,
        }
    }
}

/// A member of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    id: MemberId,
    pub name: String,
    pub(crate) volume: VolumeLedger,
    pub(crate) kind: MemberKind,
}

impl Member {
    pub(crate) fn new(
        id: MemberId,
        class: MemberClass,
        name: impl Into<String>,
        personal: f64,
    ) -> Result<Self> {
        Ok(Self {
            id,
            name: name.into(),
            volume: VolumeLedger::new(personal)?,
            kind: MemberKind::for_class(class),
        })
    }

    /// Stamp assigned at creation.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Variant tag without the ABO profile.
    pub fn class(&self) -> MemberClass {
        match self.kind {
            MemberKind::Abo(_) => MemberClass::Abo,
            MemberKind::OnMember => MemberClass::OnMember,
            MemberKind::OffMember => MemberClass::OffMember,
        }
    }

    /// Variant with its state.
    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// Volume counters.
    pub fn volume(&self) -> &VolumeLedger {
        &self.volume
    }

    /// Only ABOs sponsor, earn bonuses and hold a PIN.
    pub fn is_abo(&self) -> bool {
        matches!(self.kind, MemberKind::Abo(_))
    }

    /// ABO profile, `None` for other members.
    pub fn abo(&self) -> Option<&AboProfile> {
        match &self.kind {
            MemberKind::Abo(profile) => Some(profile),
            _ => None,
        }
    }

    /// Mutable ABO profile, `None` for other members.
    pub fn abo_mut(&mut self) -> Option<&mut AboProfile> {
        match &mut self.kind {
            MemberKind::Abo(profile) => Some(profile),
            _ => None,
        }
    }

    /// Short description, e.g. `[A-1], PV=20.0`.
    pub fn describe(&self) -> String {
        format!("[{}], PV={:.1}", self.name, self.volume.personal())
    }
}
