//! Core domain logic for the technology-tracking dashboard backend.
//! This crate is the single source of truth for tech radar invariants,
//! site banner rules and address-book query normalization.

pub mod address_book;
pub mod banner;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod radar;
pub mod repo;
pub mod service;

pub use address_book::classify::classify;
pub use address_book::directory::{AddressBookData, DirectoryError, DirectoryLookup, MapDirectory};
pub use address_book::query::{parse_query, parse_query_list};
pub use banner::error::BannerError;
pub use config::{load_radar_config, ConfigError, RadarConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::banner::{Banner, BannerDocument};
pub use model::profile::{IdentifierKind, UserProfile};
pub use model::radar::{
    DatasetError, Entry, Quadrant, RadarDataset, RadarDocument, Ring, TimelineEvent,
};
pub use radar::error::ValidationError;
pub use radar::merge::{merge_submission, validate_and_merge, MergeStats};
pub use radar::reference::{check_references, ReferenceSet};
pub use radar::structure::{validate_submission, Submission, UpdateMode};
pub use repo::banner_repo::{BannerStore, MemoryBannerStore, SqliteBannerStore, StoredBanners};
pub use repo::radar_repo::{
    MemoryRadarStore, RadarStore, RepoError, RepoResult, Revision, SqliteRadarStore, StoredRadar,
};
pub use service::address_book_service::AddressBookService;
pub use service::banner_service::{BannerChange, BannerService};
pub use service::error::ServiceError;
pub use service::radar_service::{RadarService, UpdateSummary};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
