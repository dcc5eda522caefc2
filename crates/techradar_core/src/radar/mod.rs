//! Tech radar update and validation engine.
//!
//! Control flow: raw payload -> `structure` -> `reference` -> `merge`.
//! Every stage is pure; persistence belongs to `repo` and `service`.

pub mod error;
pub mod merge;
pub mod reference;
pub mod structure;
