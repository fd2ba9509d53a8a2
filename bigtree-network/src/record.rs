//! Monthly snapshots of an ABO's volume, bonus and PIN state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::month::Month;
use crate::pin::PinTitle;

/// The nine bonus categories, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    /// First (sponsor) bonus, the stairstep performance bonus
    First,
    Leadership,
    Ruby,
    MonthlyDepth,
    Emerald,
    Diamond,
    DiamondPlus,
    OneTime,
    Faa,
}

impl BonusKind {
    pub const ALL: [BonusKind; 9] = [
        Self::First,
        Self::Leadership,
        Self::Ruby,
        Self::MonthlyDepth,
        Self::Emerald,
        Self::Diamond,
        Self::DiamondPlus,
        Self::OneTime,
        Self::Faa,
    ];

    /// Position in [`BonusKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display title used in bonus summaries.
    pub fn title(&self) -> &'static str {
        match self {
            Self::First => "First",
            Self::Leadership => "Leadership",
            Self::Ruby => "Ruby",
            Self::MonthlyDepth => "MD",
            Self::Emerald => "Emerald",
            Self::Diamond => "Diamond",
            Self::DiamondPlus => "Diamond+",
            Self::OneTime => "One-Time",
            Self::Faa => "FAA",
        }
    }
}

/// One amount per [`BonusKind`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BonusAmounts([f64; 9]);

impl BonusAmounts {
    pub fn get(&self, kind: BonusKind) -> f64 {
        self.0[kind.index()]
    }

    /// Replace one category's amount.
    pub fn set(&mut self, kind: BonusKind, amount: f64) {
        self.0[kind.index()] = amount;
    }

    /// Sum over every category.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// `(kind, amount)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (BonusKind, f64)> + '_ {
        BonusKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Snapshot taken when a month is finalized. Never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: Month,
    pub group_volume: f64,
    pub personal_volume: f64,
    pub personal_group_volume: f64,
    pub pin: PinTitle,
    pub bonuses: BonusAmounts,
    pub finalized_at: DateTime<Utc>,
}

impl MonthlyRecord {
    pub fn total_bonus(&self) -> f64 {
        self.bonuses.total()
    }
}

/// Result of counting a PIN over a window of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinCount {
    /// Months in the window holding the PIN
    pub count: u32,
    /// Consecutive months holding the PIN, ending at the last record in the window
    pub streak: u32,
}

/// Chronologically ordered monthly records of one ABO.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBook {
    records: Vec<MonthlyRecord>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in month order.
    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    /// Most recently finalized record.
    pub fn last(&self) -> Option<&MonthlyRecord> {
        self.records.last()
    }

    /// Record for `month`, if finalized.
    pub fn get(&self, month: Month) -> Option<&MonthlyRecord> {
        self.records.iter().find(|r| r.month == month)
    }

    /// Drop every record at or after `month`. Returns how many were removed.
    pub fn truncate_from(&mut self, month: Month) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.month < month);
        before - self.records.len()
    }

    /// Append a record, first dropping any record at or after its month.
    pub fn replace_from(&mut self, record: MonthlyRecord) -> usize {
        let removed = self.truncate_from(record.month);
        self.records.push(record);
        removed
    }

    /// Count records in `start..=end` whose PIN equals `pin`, and the
    /// consecutive run of such months ending at the last record in range.
    /// A calendar month with no record breaks the run.
    pub fn count_pin_within(&self, pin: PinTitle, start: Month, end: Month) -> PinCount {
        let mut result = PinCount::default();
        let mut previous: Option<Month> = None;

        for record in self
            .records
            .iter()
            .filter(|r| r.month.is_within(start, end))
        {
            if record.pin == pin {
                result.count += 1;
                let contiguous = previous.map_or(true, |p| p.succ() == record.month);
                result.streak = if contiguous { result.streak + 1 } else { 1 };
            } else {
                result.streak = 0;
            }
            previous = Some(record.month);
        }

        result
    }
}
