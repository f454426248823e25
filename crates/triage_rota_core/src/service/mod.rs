//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, rotation and calendar calls into use-case APIs.
//! - Keep the CLI decoupled from storage and rendering details.

pub mod publish;
pub mod rota_service;
