//! Record store abstractions and implementations.
//!
//! # Responsibility
//! - Define the data access contract the record manager depends on.
//! - Isolate SQLite query details from manager orchestration.
//!
//! # Invariants
//! - Title lookups are case-insensitive exact matches; when several records
//!   share a title the lowest id wins.
//! - Listing order is ascending id, which is insertion order.
//! - Repositories persist what they are given; validation belongs to the
//!   manager.

pub mod memory_repo;
pub mod movie_repo;
