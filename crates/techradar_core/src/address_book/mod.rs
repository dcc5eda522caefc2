//! Address-book lookup over organisation members.
//!
//! # Responsibility
//! - Normalize untrusted free-text identifier lists.
//! - Classify tokens as usernames or emails.
//! - Define the directory lookup contract used to resolve profiles.

pub mod classify;
pub mod directory;
pub mod query;
