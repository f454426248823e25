//! Ordered roster of people eligible for triage duty.
//!
//! # Invariants
//! - Order follows key order in the config file and is the rotation order.
//! - Names are trimmed, non-empty and unique.
//! - Metadata is opaque to the rotation engine.

use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One roster entry: a name plus free-form contact metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub metadata: Value,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, metadata: Value) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }
}

/// Roster validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    NonStringName,
    BlankName,
    DuplicateName(String),
    InvalidMetadata { name: String, message: String },
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonStringName => write!(f, "roster names must be strings"),
            Self::BlankName => write!(f, "roster names must not be blank"),
            Self::DuplicateName(name) => write!(f, "roster name `{name}` is listed twice"),
            Self::InvalidMetadata { name, message } => {
                write!(f, "roster metadata for `{name}` is invalid: {message}")
            }
        }
    }
}

impl Error for RosterError {}

/// Ordered list of roster entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_yaml::Mapping")]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Builds a roster from ordered entries.
    ///
    /// # Errors
    /// - Returns `BlankName` or `DuplicateName` when names are not usable keys.
    pub fn new(entries: Vec<RosterEntry>) -> Result<Self, RosterError> {
        let mut normalized: Vec<RosterEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(RosterError::BlankName);
            }
            if normalized.iter().any(|existing| existing.name == name) {
                return Err(RosterError::DuplicateName(name.to_string()));
            }
            normalized.push(RosterEntry::new(name, entry.metadata));
        }
        Ok(Self {
            entries: normalized,
        })
    }

    /// Convenience constructor for names without metadata.
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| RosterEntry::new(name, Value::Null))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in rotation order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn metadata_for(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|entry| &entry.metadata)
    }
}

impl TryFrom<serde_yaml::Mapping> for Roster {
    type Error = RosterError;

    fn try_from(mapping: serde_yaml::Mapping) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = key.as_str().ok_or(RosterError::NonStringName)?.to_string();
            let metadata =
                serde_json::to_value(&value).map_err(|err| RosterError::InvalidMetadata {
                    name: name.clone(),
                    message: err.to_string(),
                })?;
            entries.push(RosterEntry::new(name, metadata));
        }
        Self::new(entries)
    }
}
