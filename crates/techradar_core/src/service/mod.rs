//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, merge and persistence into request-level APIs.
//! - Map layered failures onto one caller-facing error taxonomy.

pub mod address_book_service;
pub mod banner_service;
pub mod error;
pub mod radar_service;
