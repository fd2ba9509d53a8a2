//! Calendar months and the September-based fiscal year.
//!
//! A [`Month`] is always normalized so that its month lies in `1..=12`;
//! any overflow or underflow rolls into the year. Fiscal years start in
//! September, so September is fiscal month `M01` and August is `M12`.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// First calendar month of the fiscal year.
pub const FISCAL_YEAR_START_MONTH: i32 = 9;

/// Fiscal month label, `M01` being September.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FiscalMonth {
    M01,
    M02,
    M03,
    M04,
    M05,
    M06,
    M07,
    M08,
    M09,
    M10,
    M11,
    M12,
}

impl FiscalMonth {
    const ALL: [FiscalMonth; 12] = [
        Self::M01,
        Self::M02,
        Self::M03,
        Self::M04,
        Self::M05,
        Self::M06,
        Self::M07,
        Self::M08,
        Self::M09,
        Self::M10,
        Self::M11,
        Self::M12,
    ];

    /// Fiscal month for a calendar month in `1..=12`.
    pub fn from_calendar(month: i32) -> Self {
        let index = (month - FISCAL_YEAR_START_MONTH).rem_euclid(12) as usize;
        Self::ALL[index]
    }

    /// Calendar month (1-12) this fiscal month falls in.
    pub fn calendar_month(&self) -> i32 {
        (*self as i32 + FISCAL_YEAR_START_MONTH - 1).rem_euclid(12) + 1
    }

    /// Label such as `M01`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M01 => "M01",
            Self::M02 => "M02",
            Self::M03 => "M03",
            Self::M04 => "M04",
            Self::M05 => "M05",
            Self::M06 => "M06",
            Self::M07 => "M07",
            Self::M08 => "M08",
            Self::M09 => "M09",
            Self::M10 => "M10",
            Self::M11 => "M11",
            Self::M12 => "M12",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct MonthParts {
    year: i32,
    month: i32,
}

impl From<MonthParts> for Month {
    fn from(parts: MonthParts) -> Self {
        Month::new(parts.year, parts.month)
    }
}

impl From<Month> for MonthParts {
    fn from(month: Month) -> Self {
        Self {
            year: month.year,
            month: month.month,
        }
    }
}

/// A normalized `(year, month)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "MonthParts", into = "MonthParts")]
pub struct Month {
    year: i32,
    month: i32,
}

impl Month {
    /// Create a month, rolling any out-of-range month into the year.
    pub fn new(year: i32, month: i32) -> Self {
        let total = year * 12 + (month - 1);
        Self {
            year: total.div_euclid(12),
            month: total.rem_euclid(12) + 1,
        }
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month() as i32)
    }

    /// The current month in local time.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1 through 12.
    pub fn month(&self) -> i32 {
        self.month
    }

    /// Total month count, `year * 12 + month`. Ordering follows this value.
    pub fn ordinal(&self) -> i32 {
        self.year * 12 + self.month
    }

    /// The following month.
    pub fn succ(&self) -> Self {
        *self + 1
    }

    /// The preceding month.
    pub fn pred(&self) -> Self {
        *self - 1
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: Month) -> i32 {
        other.ordinal() - self.ordinal()
    }

    /// Fiscal year number, e.g. `19` for September 2018 through August 2019.
    pub fn fiscal_year(&self) -> i32 {
        if self.month >= FISCAL_YEAR_START_MONTH {
            self.year - 2000 + 1
        } else {
            self.year - 2000
        }
    }

    /// Position within the fiscal year, September being `M01`.
    pub fn fiscal_month(&self) -> FiscalMonth {
        FiscalMonth::from_calendar(self.month)
    }

    /// Label such as `PF19`.
    pub fn fiscal_year_label(&self) -> String {
        format!("PF{}", self.fiscal_year())
    }

    /// Label such as `PF19M01`.
    pub fn fiscal_label(&self) -> String {
        format!("{}{}", self.fiscal_year_label(), self.fiscal_month().as_str())
    }

    /// September opening the fiscal year this month belongs to.
    pub fn fiscal_year_start(&self) -> Month {
        if self.month < FISCAL_YEAR_START_MONTH {
            Month::new(self.year - 1, FISCAL_YEAR_START_MONTH)
        } else {
            Month::new(self.year, FISCAL_YEAR_START_MONTH)
        }
    }

    /// August closing the fiscal year this month belongs to.
    pub fn fiscal_year_end(&self) -> Month {
        self.fiscal_year_start() + 11
    }

    /// Inclusive range from `self` through `end`.
    pub fn through(self, end: Month) -> MonthRange {
        MonthRange::new(self, end)
    }

    /// Whether `self` lies within `start..=end`.
    pub fn is_within(&self, start: Month, end: Month) -> bool {
        start <= *self && *self <= end
    }
}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl Add<i32> for Month {
    type Output = Month;

    fn add(self, months: i32) -> Month {
        Month::new(self.year, self.month + months)
    }
}

impl Sub<i32> for Month {
    type Output = Month;

    fn sub(self, months: i32) -> Month {
        Month::new(self.year, self.month - months)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02} ({})", self.year, self.month, self.fiscal_label())
    }
}

/// Inclusive range of months. A value, so it can be iterated any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: Month,
    pub end: Month,
    step: i32,
}

impl MonthRange {
    pub fn new(start: Month, end: Month) -> Self {
        Self {
            start,
            end,
            step: 1,
        }
    }

    /// Iterate every `step` months. Steps below one are treated as one.
    pub fn step_by_months(mut self, step: i32) -> Self {
        self.step = step.max(1);
        self
    }

    /// Whether `month` falls inside the range.
    pub fn contains(&self, month: Month) -> bool {
        month.is_within(self.start, self.end)
    }

    /// True when the start is after the end.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Months in the range, oldest first.
    pub fn iter(&self) -> MonthIter {
        MonthIter {
            next: self.start,
            end: self.end,
            step: self.step,
        }
    }
}

impl IntoIterator for MonthRange {
    type Item = Month;
    type IntoIter = MonthIter;

    fn into_iter(self) -> MonthIter {
        self.iter()
    }
}

impl IntoIterator for &MonthRange {
    type Item = Month;
    type IntoIter = MonthIter;

    fn into_iter(self) -> MonthIter {
        self.iter()
    }
}

/// Iterator over a [`MonthRange`].
#[derive(Debug, Clone)]
pub struct MonthIter {
    next: Month,
    end: Month,
    step: i32,
}

impl Iterator for MonthIter {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        if self.next > self.end {
            return None;
        }
        let current = self.next;
        self.next = current + self.step;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Month::new(2018, 13), Month::new(2019, 1));
        assert_eq!(Month::new(2018, 0), Month::new(2017, 12));
        assert_eq!(Month::new(2018, -1), Month::new(2017, 11));
        assert_eq!(Month::new(2018, 25), Month::new(2020, 1));

        let m = Month::new(2018, -12);
        assert_eq!((m.year(), m.month()), (2016, 12));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Month::new(2018, 9) + 12, Month::new(2019, 9));
        assert_eq!(Month::new(2018, 1) - 1, Month::new(2017, 12));
        assert_eq!(Month::new(2018, 12).succ(), Month::new(2019, 1));
        assert_eq!(Month::new(2018, 9).months_until(Month::new(2019, 2)), 5);
    }

    #[test]
    fn test_fiscal_labels() {
        let sep = Month::new(2018, 9);
        assert_eq!(sep.fiscal_label(), "PF19M01");
        assert_eq!(sep.fiscal_year_start(), sep);
        assert_eq!(sep.fiscal_year_end(), Month::new(2019, 8));

        let feb = Month::new(2018, 2);
        assert_eq!(feb.fiscal_label(), "PF18M06");
        assert_eq!(feb.fiscal_year_start(), Month::new(2017, 9));

        // 2018-14 normalizes to 2019-02
        let rolled = Month::new(2018, 14);
        assert_eq!(rolled.fiscal_year(), 19);
        assert_eq!(rolled.fiscal_month(), FiscalMonth::M06);
        assert_eq!(FiscalMonth::M06.calendar_month(), 2);
        assert_eq!(FiscalMonth::M01.calendar_month(), 9);
    }

    #[test]
    fn test_range_is_restartable() {
        let range = Month::new(2018, 11).through(Month::new(2019, 2));
        let first: Vec<Month> = range.iter().collect();
        let second: Vec<Month> = range.into_iter().collect();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert_eq!(first[2], Month::new(2019, 1));

        let stepped: Vec<Month> = range.step_by_months(2).into_iter().collect();
        assert_eq!(stepped, vec![Month::new(2018, 11), Month::new(2019, 1)]);

        assert!(Month::new(2019, 3).through(Month::new(2019, 2)).is_empty());
    }

    #[test]
    fn test_serde_normalizes() {
        let month: Month = serde_json::from_str(r#"{"year":2018,"month":13}"#).unwrap();
        assert_eq!(month, Month::new(2019, 1));
        assert_eq!(
            serde_json::to_string(&Month::new(2019, 1)).unwrap(),
            r#"{"year":2019,"month":1}"#
        );
    }
}
