//! Domain model for watched-movie tracking.
//!
//! # Responsibility
//! - Define the canonical movie record shared by store, manager and front ends.
//! - Provide raw form input binding for front ends that collect text fields.
//!
//! # Invariants
//! - A persisted record always carries a store-assigned `MovieId`.
//! - Records are either fully valid or never persisted.

pub mod form;
pub mod movie;
