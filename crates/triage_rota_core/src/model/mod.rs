//! Domain model for duty cycles and the published snapshot.
//!
//! # Responsibility
//! - Define the canonical history record consumed by the rotation engine.
//! - Define the derived snapshot shape rendered into published artifacts.
//!
//! # Invariants
//! - History dates are unique keys and iterate in chronological order.
//! - History is append-only; past entries are never rewritten.
//! - The snapshot is rebuildable and never authoritative.

pub mod cycle;
pub mod snapshot;
