//! Site banner management.
//!
//! Control flow: raw request body -> `request` -> `service::banner_service`.
//! Request parsing is pure; persistence belongs to `repo` and `service`.

pub mod error;
pub mod request;
