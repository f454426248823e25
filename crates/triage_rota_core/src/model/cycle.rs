//! Duty cycle and assignment history model.
//!
//! # Responsibility
//! - Represent one weekly duty assignment (`DutyCycle`).
//! - Represent the ordered, append-only assignment log (`DutyHistory`).
//!
//! # Invariants
//! - A cycle spans exactly `CYCLE_LENGTH_DAYS` days starting at `start`.
//! - History keys strictly increase; appends before or on the last date are
//!   rejected.
//! - Person names stored in history are never blank.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Length of one duty cycle in days.
pub const CYCLE_LENGTH_DAYS: u64 = 7;

/// One duty assignment: a person on call for the week starting at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyCycle {
    /// First day of the cycle.
    pub start: NaiveDate,
    /// Assigned person, matching a roster entry name at assignment time.
    pub person: String,
}

impl DutyCycle {
    pub fn new(start: NaiveDate, person: impl Into<String>) -> Self {
        Self {
            start,
            person: person.into(),
        }
    }

    /// Exclusive end date (`start + 7 days`), saturating at `NaiveDate::MAX`.
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(CYCLE_LENGTH_DAYS))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Last day that still belongs to this cycle, saturating at `NaiveDate::MAX`.
    pub fn last_day(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(CYCLE_LENGTH_DAYS - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns whether `day` falls inside this cycle.
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day < self.end()
    }
}

/// History validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// A stored or appended person name is empty after trimming.
    BlankPerson(NaiveDate),
    /// Appended cycle does not start after the last recorded cycle.
    OutOfOrder {
        last: NaiveDate,
        attempted: NaiveDate,
    },
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankPerson(date) => write!(f, "history entry {date} has a blank person name"),
            Self::OutOfOrder { last, attempted } => write!(
                f,
                "cycle {attempted} must start after the last recorded cycle {last}"
            ),
        }
    }
}

impl Error for HistoryError {}

/// Append-only assignment log keyed by cycle start date.
///
/// Serialized as a flat JSON object: `{"2026-10-18": "alice", ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<NaiveDate, String>",
    into = "BTreeMap<NaiveDate, String>"
)]
pub struct DutyHistory {
    entries: BTreeMap<NaiveDate, String>,
}

impl DutyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the chronologically last cycle, which defines current state.
    pub fn last(&self) -> Option<DutyCycle> {
        self.entries
            .iter()
            .next_back()
            .map(|(start, person)| DutyCycle::new(*start, person.clone()))
    }

    /// Returns the person assigned to the cycle starting at `start`.
    pub fn person_at(&self, start: NaiveDate) -> Option<&str> {
        self.entries.get(&start).map(String::as_str)
    }

    /// Iterates cycles in chronological order.
    pub fn cycles(&self) -> impl DoubleEndedIterator<Item = DutyCycle> + '_ {
        self.entries
            .iter()
            .map(|(start, person)| DutyCycle::new(*start, person.clone()))
    }

    /// Returns the cycle covering `day`, if any.
    pub fn cycle_covering(&self, day: NaiveDate) -> Option<DutyCycle> {
        self.entries
            .range(..=day)
            .next_back()
            .map(|(start, person)| DutyCycle::new(*start, person.clone()))
            .filter(|cycle| cycle.contains(day))
    }

    /// Appends one cycle to the end of the log.
    ///
    /// # Errors
    /// - `BlankPerson` when the person name is blank.
    /// - `OutOfOrder` when `cycle.start` is not after the last recorded start.
    pub fn append(&mut self, cycle: DutyCycle) -> Result<(), HistoryError> {
        if cycle.person.trim().is_empty() {
            return Err(HistoryError::BlankPerson(cycle.start));
        }
        if let Some((last, _)) = self.entries.iter().next_back() {
            if cycle.start <= *last {
                return Err(HistoryError::OutOfOrder {
                    last: *last,
                    attempted: cycle.start,
                });
            }
        }
        self.entries.insert(cycle.start, cycle.person);
        Ok(())
    }
}

impl TryFrom<BTreeMap<NaiveDate, String>> for DutyHistory {
    type Error = HistoryError;

    fn try_from(entries: BTreeMap<NaiveDate, String>) -> Result<Self, Self::Error> {
        if let Some((date, _)) = entries.iter().find(|(_, person)| person.trim().is_empty()) {
            return Err(HistoryError::BlankPerson(*date));
        }
        Ok(Self { entries })
    }
}

impl From<DutyHistory> for BTreeMap<NaiveDate, String> {
    fn from(value: DutyHistory) -> Self {
        value.entries
    }
}

#[cfg(test)]
mod tests {
    use super::{DutyCycle, DutyHistory, HistoryError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn cycle_end_is_exclusive_and_seven_days_out() {
        let cycle = DutyCycle::new(date(2026, 10, 18), "alice");
        assert_eq!(cycle.end(), date(2026, 10, 25));
        assert_eq!(cycle.last_day(), date(2026, 10, 24));
        assert!(cycle.contains(date(2026, 10, 24)));
        assert!(!cycle.contains(date(2026, 10, 25)));
    }

    #[test]
    fn cycle_end_saturates_at_max_date() {
        let cycle = DutyCycle::new(NaiveDate::MAX, "alice");
        assert_eq!(cycle.end(), NaiveDate::MAX);
        assert_eq!(cycle.last_day(), NaiveDate::MAX);
        assert!(!cycle.contains(NaiveDate::MAX));
    }

    #[test]
    fn append_rejects_dates_not_after_last() {
        let mut history = DutyHistory::new();
        history
            .append(DutyCycle::new(date(2026, 10, 18), "alice"))
            .unwrap();

        let err = history
            .append(DutyCycle::new(date(2026, 10, 18), "bob"))
            .unwrap_err();
        assert_eq!(
            err,
            HistoryError::OutOfOrder {
                last: date(2026, 10, 18),
                attempted: date(2026, 10, 18),
            }
        );
        assert_eq!(history.len(), 1);
        assert_eq!(history.person_at(date(2026, 10, 18)), Some("alice"));
    }

    #[test]
    fn last_and_cycle_covering_follow_date_order() {
        let mut history = DutyHistory::new();
        history
            .append(DutyCycle::new(date(2026, 10, 4), "alice"))
            .unwrap();
        history
            .append(DutyCycle::new(date(2026, 10, 11), "bob"))
            .unwrap();

        assert_eq!(history.last().unwrap().person, "bob");
        assert_eq!(
            history.cycle_covering(date(2026, 10, 9)).unwrap().person,
            "alice"
        );
        assert!(history.cycle_covering(date(2026, 10, 18)).is_none());
        assert!(history.cycle_covering(date(2026, 10, 3)).is_none());
    }
}
