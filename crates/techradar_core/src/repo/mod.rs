//! Persistence gateway abstractions and implementations.
//!
//! # Responsibility
//! - Define load/save contracts for the radar and banner documents.
//! - Isolate SQLite details from validation and service orchestration.
//!
//! # Invariants
//! - Documents are always written whole; there are no partial writes.
//! - Writes carry the revision they were derived from.

pub mod banner_repo;
mod document_rows;
pub mod radar_repo;
