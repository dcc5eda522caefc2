//! Domain model for radar documents, site banners and address-book profiles.
//!
//! # Responsibility
//! - Define canonical data structures used by core validation and merge logic.
//! - Keep the persisted wire shape and the in-memory indexed shape separate.
//!
//! # Invariants
//! - Every radar entry is identified by a stable string id.
//! - Radar entries have no delete path; they are only replaced or appended.

pub mod banner;
pub mod profile;
pub mod radar;
