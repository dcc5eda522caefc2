//! Radar update use-case service.
//!
//! # Responsibility
//! - Run the load -> validate -> merge -> save cycle for one submission.
//! - Serialize read-modify-write cycles against one store.
//!
//! # Invariants
//! - At most one update runs at a time per service instance.
//! - Nothing is saved unless structure and reference validation both pass.
//! - Saves carry the loaded revision, so writers outside this service are
//!   detected as conflicts instead of being overwritten.

use crate::config::RadarConfig;
use crate::logging::sanitize_message;
use crate::model::radar::RadarDataset;
use crate::radar::merge::merge_submission;
use crate::radar::structure::{validate_submission, UpdateMode};
use crate::repo::radar_repo::{RadarStore, RepoError, Revision};
use crate::service::error::ServiceError;
use log::{info, warn};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use uuid::Uuid;

const MAX_ACTOR_CHARS: usize = 64;

/// Outcome of one accepted update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Correlates log events of one update.
    pub update_id: Uuid,
    pub mode: UpdateMode,
    /// Entries in the submission.
    pub submitted: usize,
    pub replaced: usize,
    pub appended: usize,
    /// Entries in the resulting dataset.
    pub total: usize,
    /// Revision written by this update.
    pub revision: Revision,
}

/// Use-case service wrapper over one radar store.
pub struct RadarService<S: RadarStore> {
    store: Mutex<S>,
    config: RadarConfig,
}

impl<S: RadarStore> RadarService<S> {
    pub fn new(store: S, config: RadarConfig) -> Self {
        Self {
            store: Mutex::new(store),
            config,
        }
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    /// Returns the persisted radar.
    pub fn get_radar(&self) -> Result<RadarDataset, ServiceError> {
        let store = self.lock_store()?;
        let stored = store.load().map_err(|err| {
            warn!("event=radar_load module=service status=error error={err}");
            ServiceError::from(err)
        })?;
        info!(
            "event=radar_load module=service status=ok entries={} revision={}",
            stored.dataset.len(),
            stored.revision
        );
        Ok(stored.dataset)
    }

    /// Validates `submission` and merges it into the persisted radar.
    ///
    /// `actor` names the role making the request and is only logged.
    ///
    /// # Errors
    /// - `ServiceError::Validation` when the submission is rejected; the
    ///   store is not written.
    /// - `ServiceError::Storage` when load or save fails, including revision
    ///   conflicts with writers outside this service.
    pub fn update_radar(
        &self,
        submission: &Value,
        actor: &str,
    ) -> Result<UpdateSummary, ServiceError> {
        let update_id = Uuid::new_v4();
        let started_at = Instant::now();
        let actor = actor_label(actor);
        info!("event=radar_update module=service status=start update_id={update_id} actor={actor}");

        let result = self.apply(update_id, submission);
        match &result {
            Ok(summary) => info!(
                "event=radar_update module=service status=ok update_id={update_id} actor={actor} mode={} submitted={} replaced={} appended={} total={} revision={} duration_ms={}",
                summary.mode.as_str(),
                summary.submitted,
                summary.replaced,
                summary.appended,
                summary.total,
                summary.revision,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=radar_update module=service status=error update_id={update_id} actor={actor} error_code={} duration_ms={} error={err}",
                err.code(),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn apply(&self, update_id: Uuid, submission: &Value) -> Result<UpdateSummary, ServiceError> {
        let submission = validate_submission(submission, &self.config)?;
        let submitted = submission.entries().len();

        let store = self.lock_store()?;
        let stored = store.load()?;
        let (next, stats) = merge_submission(&stored.dataset, submission, &self.config)?;
        let revision = store.save(&next, stored.revision)?;

        Ok(UpdateSummary {
            update_id,
            mode: stats.mode,
            submitted,
            replaced: stats.replaced,
            appended: stats.appended,
            total: next.len(),
            revision,
        })
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, S>, ServiceError> {
        self.store.lock().map_err(|_| {
            ServiceError::Storage(RepoError::InvalidData(
                "radar store lock poisoned".to_string(),
            ))
        })
    }

    /// Consumes the service and returns its store.
    pub fn into_store(self) -> S {
        match self.store.into_inner() {
            Ok(store) => store,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Single-line, length-capped actor for `key=value` log events.
fn actor_label(actor: &str) -> String {
    let actor = actor.trim();
    if actor.is_empty() {
        return "unknown".to_string();
    }
    sanitize_message(actor, MAX_ACTOR_CHARS)
}
