//! Core domain logic for the triage duty rota.
//! This crate is the single source of truth for rotation invariants.

pub mod calendar;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rotation;
pub mod service;

pub use calendar::{render_calendar, CalendarSettings, TriageLink};
pub use config::{
    ComponentFilter, ConfigError, RotaConfig, RotaPaths, Roster, RosterEntry, RosterError,
};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::cycle::{DutyCycle, DutyHistory, HistoryError, CYCLE_LENGTH_DAYS};
pub use model::snapshot::Snapshot;
pub use repo::history_repo::{HistoryRepository, JsonHistoryRepository};
pub use repo::snapshot_repo::{JsonSnapshotRepository, SnapshotRepository};
pub use repo::{RepoError, RepoResult};
pub use rotation::{
    most_recent_weekday, next_roster_index, plan_next_cycle, project_cycles, RotationError,
    RotationFallback, RotationPlan,
};
pub use service::publish::{
    publish_output, CommandPublisher, PublishError, PublishReport, Publisher,
};
pub use service::rota_service::{
    RotaService, RotaServiceError, RotaServiceResult, RotaStatus, UpdateOutcome,
};
