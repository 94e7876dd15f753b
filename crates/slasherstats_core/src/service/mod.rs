//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into movie tracking use-cases.
//! - Keep front ends decoupled from storage details.

pub mod bulk_import;
pub mod movie_manager;
