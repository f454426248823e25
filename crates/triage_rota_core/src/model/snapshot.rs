//! Published calendar snapshot model.
//!
//! # Responsibility
//! - Hold roster metadata for everyone who has ever served.
//! - Hold the cycle-start → person schedule used to render artifacts.
//!
//! # Invariants
//! - Both top-level mappings are required when deserializing; a file missing
//!   either is malformed state.
//! - Metadata is seeded once per person and never overwritten by later cycles.

use crate::model::cycle::DutyCycle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Derived, rebuildable state combining roster metadata with history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    /// Person name → contact metadata copied from the roster.
    pub roster: BTreeMap<String, Value>,
    /// Cycle start date → assigned person.
    pub schedule: BTreeMap<NaiveDate, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one cycle and seeds metadata for first-time assignees.
    ///
    /// Returns `true` when metadata was seeded for `cycle.person`.
    pub fn record(&mut self, cycle: &DutyCycle, metadata: Option<&Value>) -> bool {
        self.schedule.insert(cycle.start, cycle.person.clone());
        if self.roster.contains_key(&cycle.person) {
            return false;
        }
        self.roster.insert(
            cycle.person.clone(),
            metadata.cloned().unwrap_or(Value::Null),
        );
        true
    }

    /// Contact metadata for `person`, if present.
    pub fn metadata_for(&self, person: &str) -> Option<&Value> {
        self.roster.get(person)
    }
}
