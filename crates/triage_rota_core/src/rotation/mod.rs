//! Round-robin rotation engine.
//!
//! # Responsibility
//! - Compute the next duty cycle from history, roster order and today's date.
//! - Keep index arithmetic pure so it is testable without any I/O.
//!
//! # Invariants
//! - Every planned cycle starts exactly 7 days after the previous one.
//! - Over N consecutive cycles every roster entry is planned exactly once, in
//!   roster order.
//! - An empty roster is a hard error; an unknown last person is not.
//! - Date arithmetic is checked; running past the calendar range is an error.

use crate::model::cycle::{DutyCycle, DutyHistory, CYCLE_LENGTH_DAYS};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RotationResult<T> = Result<T, RotationError>;

/// Rotation failures that cannot be degraded into a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    EmptyRoster,
    /// Next cycle start falls outside the representable date range.
    DateOverflow(NaiveDate),
}

impl Display for RotationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRoster => write!(f, "cannot rotate duty over an empty roster"),
            Self::DateOverflow(date) => {
                write!(f, "cannot schedule a cycle after {date}: date out of range")
            }
        }
    }
}

impl Error for RotationError {}

/// Degraded-mode decisions taken while planning a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationFallback {
    /// No history yet; started at the most recent cycle weekday.
    EmptyHistory,
    /// Last assignee is no longer on the roster; restarted from the first entry.
    UnknownPerson(String),
}

impl Display for RotationFallback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyHistory => write!(f, "history is empty; starting a new rotation"),
            Self::UnknownPerson(name) => write!(
                f,
                "last assignee `{name}` is not on the roster; restarting from the first entry"
            ),
        }
    }
}

/// Next cycle plus the fallback applied to reach it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPlan {
    pub cycle: DutyCycle,
    pub fallback: Option<RotationFallback>,
}

/// Returns the roster index after `last_index`, wrapping to 0.
///
/// `None` as `last_index` means "no usable previous index" and yields 0.
/// Returns `None` only when `roster_len` is 0.
pub fn next_roster_index(roster_len: usize, last_index: Option<usize>) -> Option<usize> {
    if roster_len == 0 {
        return None;
    }
    Some(match last_index {
        Some(index) if index < roster_len => (index + 1) % roster_len,
        _ => 0,
    })
}

/// Most recent `weekday` on or before `today`.
///
/// Returns `None` only when that day precedes `NaiveDate::MIN`.
pub fn most_recent_weekday(today: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let today_offset = today.weekday().num_days_from_monday();
    let target_offset = weekday.num_days_from_monday();
    let back = (today_offset + 7 - target_offset) % 7;
    today.checked_sub_days(Days::new(u64::from(back)))
}

/// Plans the cycle following `history`.
///
/// # Errors
/// - `EmptyRoster` when `roster` has no names.
/// - `DateOverflow` when the next start date is not representable.
pub fn plan_next_cycle(
    history: &DutyHistory,
    roster: &[&str],
    weekday: Weekday,
    today: NaiveDate,
) -> RotationResult<RotationPlan> {
    if roster.is_empty() {
        return Err(RotationError::EmptyRoster);
    }

    let Some(last) = history.last() else {
        let start =
            most_recent_weekday(today, weekday).ok_or(RotationError::DateOverflow(today))?;
        return Ok(RotationPlan {
            cycle: DutyCycle::new(start, roster[0]),
            fallback: Some(RotationFallback::EmptyHistory),
        });
    };

    plan_after(&last, roster)
}

/// Previews the next `count` cycles without touching `history`.
pub fn project_cycles(
    history: &DutyHistory,
    roster: &[&str],
    weekday: Weekday,
    today: NaiveDate,
    count: usize,
) -> RotationResult<Vec<RotationPlan>> {
    let mut plans: Vec<RotationPlan> = Vec::new();
    for _ in 0..count {
        let plan = match plans.last() {
            Some(previous) => plan_after(&previous.cycle, roster)?,
            None => plan_next_cycle(history, roster, weekday, today)?,
        };
        plans.push(plan);
    }
    Ok(plans)
}

fn plan_after(last: &DutyCycle, roster: &[&str]) -> RotationResult<RotationPlan> {
    let last_index = roster.iter().position(|name| *name == last.person);
    let fallback = match last_index {
        Some(_) => None,
        None => Some(RotationFallback::UnknownPerson(last.person.clone())),
    };
    // roster is non-empty here, so an index always exists.
    let index = next_roster_index(roster.len(), last_index).unwrap_or(0);

    let start = last
        .start
        .checked_add_days(Days::new(CYCLE_LENGTH_DAYS))
        .ok_or(RotationError::DateOverflow(last.start))?;

    Ok(RotationPlan {
        cycle: DutyCycle::new(start, roster[index]),
        fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        most_recent_weekday, next_roster_index, plan_next_cycle, project_cycles,
        RotationError, RotationFallback,
    };
    use crate::model::cycle::{DutyCycle, DutyHistory};
    use chrono::{Datelike, Days, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn next_index_wraps_and_handles_unknown() {
        assert_eq!(next_roster_index(3, Some(0)), Some(1));
        assert_eq!(next_roster_index(3, Some(2)), Some(0));
        assert_eq!(next_roster_index(3, None), Some(0));
        assert_eq!(next_roster_index(3, Some(7)), Some(0));
        assert_eq!(next_roster_index(1, Some(0)), Some(0));
        assert_eq!(next_roster_index(0, Some(0)), None);
        assert_eq!(next_roster_index(0, None), None);
    }

    #[test]
    fn most_recent_weekday_is_on_or_before_today() {
        // 2026-10-21 is a Wednesday.
        let wednesday = date(2026, 10, 21);
        assert_eq!(wednesday.weekday(), Weekday::Wed);
        assert_eq!(most_recent_weekday(wednesday, Weekday::Sun), Some(date(2026, 10, 18)));
        assert_eq!(most_recent_weekday(wednesday, Weekday::Mon), Some(date(2026, 10, 19)));
        assert_eq!(most_recent_weekday(wednesday, Weekday::Wed), Some(wednesday));
        assert_eq!(most_recent_weekday(wednesday, Weekday::Thu), Some(date(2026, 10, 15)));
    }

    #[test]
    fn first_cycle_starts_on_preceding_sunday_with_first_person() {
        let plan = plan_next_cycle(
            &DutyHistory::new(),
            &["a", "b", "c"],
            Weekday::Sun,
            date(2026, 10, 21),
        )
        .unwrap();
        assert_eq!(plan.cycle, DutyCycle::new(date(2026, 10, 18), "a"));
        assert_eq!(plan.fallback, Some(RotationFallback::EmptyHistory));
    }

    #[test]
    fn next_cycle_advances_one_week_and_one_person() {
        let mut history = DutyHistory::new();
        history.append(DutyCycle::new(date(2026, 10, 18), "a")).unwrap();

        let plan = plan_next_cycle(&history, &["a", "b", "c"], Weekday::Sun, date(2026, 10, 21))
            .unwrap();
        assert_eq!(plan.cycle, DutyCycle::new(date(2026, 10, 25), "b"));
        assert_eq!(plan.fallback, None);
    }

    #[test]
    fn next_cycle_ignores_today_once_history_exists() {
        let mut history = DutyHistory::new();
        history.append(DutyCycle::new(date(2026, 1, 4), "c")).unwrap();

        let plan = plan_next_cycle(&history, &["a", "b", "c"], Weekday::Sun, date(2026, 10, 21))
            .unwrap();
        assert_eq!(plan.cycle, DutyCycle::new(date(2026, 1, 11), "a"));
    }

    #[test]
    fn removed_person_falls_back_to_first_entry() {
        let mut history = DutyHistory::new();
        history.append(DutyCycle::new(date(2026, 10, 18), "gone")).unwrap();

        let plan =
            plan_next_cycle(&history, &["a", "b"], Weekday::Sun, date(2026, 10, 21)).unwrap();
        assert_eq!(plan.cycle, DutyCycle::new(date(2026, 10, 25), "a"));
        assert_eq!(
            plan.fallback,
            Some(RotationFallback::UnknownPerson("gone".to_string()))
        );
    }

    #[test]
    fn empty_roster_is_an_error() {
        let err = plan_next_cycle(&DutyHistory::new(), &[], Weekday::Sun, date(2026, 10, 21))
            .unwrap_err();
        assert_eq!(err, RotationError::EmptyRoster);
    }

    #[test]
    fn every_window_of_n_cycles_visits_each_person_once_in_order() {
        let roster = ["a", "b", "c", "d"];
        for start_len in 0..roster.len() {
            let mut history = DutyHistory::new();
            for plan in
                project_cycles(&DutyHistory::new(), &roster, Weekday::Mon, date(2026, 3, 4), start_len)
                    .unwrap()
            {
                history.append(plan.cycle).unwrap();
            }

            let plans =
                project_cycles(&history, &roster, Weekday::Mon, date(2026, 3, 4), roster.len() * 3)
                    .unwrap();
            let people: Vec<&str> = plans.iter().map(|p| p.cycle.person.as_str()).collect();
            for window in people.windows(roster.len()) {
                let mut sorted = window.to_vec();
                sorted.sort_unstable();
                assert_eq!(sorted, roster.to_vec());
            }
            for pair in plans.windows(2) {
                assert_eq!((pair[1].cycle.start - pair[0].cycle.start).num_days(), 7);
                let prev = roster.iter().position(|n| *n == pair[0].cycle.person).unwrap();
                assert_eq!(pair[1].cycle.person, roster[(prev + 1) % roster.len()]);
            }
        }
    }

    #[test]
    fn projection_reports_fallback_only_on_first_plan() {
        let plans = project_cycles(
            &DutyHistory::new(),
            &["a", "b"],
            Weekday::Sun,
            date(2026, 10, 21),
            3,
        )
        .unwrap();
        let fallbacks: Vec<bool> = plans.iter().map(|p| p.fallback.is_some()).collect();
        assert_eq!(fallbacks, vec![true, false, false]);
        assert_eq!(plans[2].cycle, DutyCycle::new(date(2026, 11, 1), "a"));
    }

    #[test]
    fn most_recent_weekday_before_min_date_is_none() {
        let target = NaiveDate::MIN.weekday().succ();
        assert_eq!(most_recent_weekday(NaiveDate::MIN, target), None);
        assert_eq!(
            most_recent_weekday(NaiveDate::MIN, NaiveDate::MIN.weekday()),
            Some(NaiveDate::MIN)
        );
    }

    #[test]
    fn cycle_after_max_date_is_an_error() {
        let mut history = DutyHistory::new();
        history.append(DutyCycle::new(NaiveDate::MAX, "a")).unwrap();

        let err = plan_next_cycle(&history, &["a", "b"], Weekday::Sun, date(2026, 10, 21))
            .unwrap_err();
        assert_eq!(err, RotationError::DateOverflow(NaiveDate::MAX));
    }

    #[test]
    fn unbounded_projection_stops_at_date_overflow() {
        let last = NaiveDate::MAX - Days::new(10);
        let mut history = DutyHistory::new();
        history.append(DutyCycle::new(last, "a")).unwrap();

        let err = project_cycles(&history, &["a", "b"], Weekday::Sun, date(2026, 10, 21), usize::MAX)
            .unwrap_err();
        assert_eq!(err, RotationError::DateOverflow(last + Days::new(7)));
    }
}
