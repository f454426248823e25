//! Rota use-case service.
//!
//! # Responsibility
//! - Orchestrate rotation planning, state persistence and calendar output for
//!   the `update`, `reset`, `status` and `preview` use-cases.
//!
//! # Invariants
//! - `update` appends exactly one cycle to history per call.
//! - All state is loaded (and validated) before anything is written, so a
//!   malformed snapshot never leaves history half-updated.
//! - The calendar is always re-rendered from the full history.
//! - History is written last; a failed derived write leaves it unchanged so
//!   the run can be retried.

use crate::calendar::{render_calendar, CalendarSettings};
use crate::config::{RotaConfig, RotaPaths, Roster};
use crate::model::cycle::{DutyCycle, DutyHistory};
use crate::repo::history_repo::{HistoryRepository, JsonHistoryRepository};
use crate::repo::snapshot_repo::{JsonSnapshotRepository, SnapshotRepository};
use crate::repo::{write_text_file, RepoError};
use crate::rotation::{
    plan_next_cycle, project_cycles, RotationError, RotationFallback, RotationPlan,
};
use chrono::{NaiveDate, Weekday};
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for rota use-cases.
#[derive(Debug)]
pub enum RotaServiceError {
    Repo(RepoError),
    Rotation(RotationError),
}

impl Display for RotaServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Rotation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RotaServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Rotation(err) => Some(err),
        }
    }
}

impl From<RepoError> for RotaServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<RotationError> for RotaServiceError {
    fn from(value: RotationError) -> Self {
        Self::Rotation(value)
    }
}

pub type RotaServiceResult<T> = Result<T, RotaServiceError>;

/// Result of one `update` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Newly appended cycle.
    pub cycle: DutyCycle,
    /// Degraded-mode decision taken while planning, if any.
    pub fallback: Option<RotationFallback>,
    /// History length after the append.
    pub total_cycles: usize,
    /// Whether contact metadata was seeded into the snapshot for this person.
    pub seeded_metadata: bool,
}

/// Read-only view of the rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaStatus {
    /// Cycle covering `today`, if one was recorded.
    pub current: Option<DutyCycle>,
    /// Chronologically last recorded cycle.
    pub latest: Option<DutyCycle>,
    pub total_cycles: usize,
    /// What the next `update` would append.
    pub next: RotationPlan,
}

/// Use-case service over history and snapshot repositories.
pub struct RotaService<H: HistoryRepository, S: SnapshotRepository> {
    history: H,
    snapshot: S,
    roster: Roster,
    weekday: Weekday,
    calendar: CalendarSettings,
    paths: RotaPaths,
}

impl RotaService<JsonHistoryRepository, JsonSnapshotRepository> {
    /// Builds a service over the JSON files named by `config`.
    pub fn from_config(config: &RotaConfig) -> Self {
        let paths = config.paths();
        Self::new(
            JsonHistoryRepository::new(paths.history.clone()),
            JsonSnapshotRepository::new(paths.snapshot.clone()),
            config,
            paths,
        )
    }
}

impl<H: HistoryRepository, S: SnapshotRepository> RotaService<H, S> {
    /// Creates a service using the provided repository implementations.
    pub fn new(history: H, snapshot: S, config: &RotaConfig, paths: RotaPaths) -> Self {
        Self {
            history,
            snapshot,
            roster: config.roster.clone(),
            weekday: config.rotation.cycle_weekday,
            calendar: CalendarSettings::from_config(config),
            paths,
        }
    }

    pub fn paths(&self) -> &RotaPaths {
        &self.paths
    }

    /// Computes and records the next cycle, then regenerates the calendar.
    ///
    /// # Errors
    /// - Malformed history or snapshot state (`Repo`).
    /// - Empty roster or a start date out of range (`Rotation`).
    pub fn update(&self, today: NaiveDate) -> RotaServiceResult<UpdateOutcome> {
        let mut history = self.history.load()?;
        let mut snapshot = self.snapshot.load()?;

        let plan = plan_next_cycle(&history, &self.roster.names(), self.weekday, today)?;
        if let Some(fallback) = &plan.fallback {
            warn!(
                "event=rota_update module=service status=fallback reason={}",
                fallback_code(fallback)
            );
        }

        history.append(plan.cycle.clone()).map_err(RepoError::from)?;
        let seeded_metadata =
            snapshot.record(&plan.cycle, self.roster.metadata_for(&plan.cycle.person));

        self.ensure_output_dir()?;
        self.snapshot.save(&snapshot)?;
        self.write_calendar(&history, &snapshot.roster)?;
        self.history.save(&history)?;

        info!(
            "event=rota_update module=service status=ok start={} person={} cycles={}",
            plan.cycle.start,
            plan.cycle.person,
            history.len()
        );

        Ok(UpdateOutcome {
            cycle: plan.cycle,
            fallback: plan.fallback,
            total_cycles: history.len(),
            seeded_metadata,
        })
    }

    /// Clears history and snapshot and writes an empty calendar.
    pub fn reset(&self) -> RotaServiceResult<()> {
        self.ensure_output_dir()?;
        self.snapshot.clear()?;
        self.write_calendar(&DutyHistory::new(), &BTreeMap::new())?;
        self.history.clear()?;
        info!("event=rota_reset module=service status=ok");
        Ok(())
    }

    /// Re-renders the calendar from stored state without changing it.
    pub fn regenerate_calendar(&self) -> RotaServiceResult<String> {
        let history = self.history.load()?;
        let snapshot = self.snapshot.load()?;
        self.ensure_output_dir()?;
        self.write_calendar(&history, &snapshot.roster)
    }

    /// Reports the current, latest and next cycles without writing.
    pub fn status(&self, today: NaiveDate) -> RotaServiceResult<RotaStatus> {
        let history = self.history.load()?;
        let next = plan_next_cycle(&history, &self.roster.names(), self.weekday, today)?;
        Ok(RotaStatus {
            current: history.cycle_covering(today),
            latest: history.last(),
            total_cycles: history.len(),
            next,
        })
    }

    /// Previews the next `count` cycles without writing.
    pub fn preview(&self, today: NaiveDate, count: usize) -> RotaServiceResult<Vec<RotationPlan>> {
        let history = self.history.load()?;
        Ok(project_cycles(
            &history,
            &self.roster.names(),
            self.weekday,
            today,
            count,
        )?)
    }

    fn ensure_output_dir(&self) -> RotaServiceResult<()> {
        std::fs::create_dir_all(&self.paths.output_dir).map_err(|source| RepoError::Io {
            path: self.paths.output_dir.clone(),
            source,
        })?;
        Ok(())
    }

    fn write_calendar(
        &self,
        history: &DutyHistory,
        metadata: &BTreeMap<String, Value>,
    ) -> RotaServiceResult<String> {
        let ics = render_calendar(history, metadata, &self.calendar);
        write_text_file(&self.paths.calendar, &ics)?;
        info!(
            "event=calendar_write module=service status=ok events={} bytes={}",
            history.len(),
            ics.len()
        );
        Ok(ics)
    }
}

fn fallback_code(fallback: &RotationFallback) -> &'static str {
    match fallback {
        RotationFallback::EmptyHistory => "empty_history",
        RotationFallback::UnknownPerson(_) => "unknown_person",
    }
}
