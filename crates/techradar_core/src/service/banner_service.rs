//! Site banner use-case service.
//!
//! # Responsibility
//! - Add, toggle and delete banners in the persisted banner document.
//! - Serve all banners or only the active ones.
//!
//! # Invariants
//! - Request bodies are parsed before the store is touched.
//! - Reads of a never-written document yield no banners.
//! - Toggle and delete never create the document.
//! - Log events carry indexes and counts only, never banner text.

use crate::banner::error::BannerError;
use crate::banner::request::{
    checked_position, parse_banner_index, parse_new_banner, parse_visibility,
};
use crate::model::banner::{Banner, BannerDocument};
use crate::repo::banner_repo::{BannerStore, StoredBanners};
use crate::repo::radar_repo::{RepoError, Revision};
use crate::service::error::ServiceError;
use log::{info, warn};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

/// Outcome of one accepted banner change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerChange {
    /// Position of the added or changed banner; for deletes, the removed one.
    pub index: usize,
    /// Banners in the document after the change.
    pub total: usize,
    pub revision: Revision,
}

/// Use-case service wrapper over one banner store.
pub struct BannerService<S: BannerStore> {
    store: Mutex<S>,
}

impl<S: BannerStore> BannerService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Every banner, shown or hidden, in document order.
    pub fn all_banners(&self) -> Result<Vec<Banner>, ServiceError> {
        Ok(self.load_document()?.messages)
    }

    /// Banners with `show == true`, in document order.
    pub fn active_banners(&self) -> Result<Vec<Banner>, ServiceError> {
        let document = self.load_document()?;
        Ok(document.active().cloned().collect())
    }

    /// Appends the banner in a `{"banner": {...}}` body, creating the
    /// document on first use.
    pub fn add_banner(&self, body: &Value) -> Result<BannerChange, ServiceError> {
        let result = parse_new_banner(body)
            .map_err(ServiceError::from)
            .and_then(|banner| {
                let store = self.lock_store()?;
                let (mut document, revision) = match store.load()? {
                    Some(StoredBanners { document, revision }) => (document, Some(revision)),
                    None => (BannerDocument::default(), None),
                };
                document.messages.push(banner);
                let revision = store.save(&document, revision)?;
                Ok(BannerChange {
                    index: document.messages.len() - 1,
                    total: document.messages.len(),
                    revision,
                })
            });
        log_change("add", &result);
        result
    }

    /// Sets `show` on the banner at `index` from an `{"index", "show"}` body.
    pub fn set_visibility(&self, body: &Value) -> Result<BannerChange, ServiceError> {
        let result = parse_banner_index(body)
            .and_then(|index| Ok((index, parse_visibility(body)?)))
            .map_err(ServiceError::from)
            .and_then(|(index, show)| {
                self.modify_existing(index, |document, position| {
                    document.messages[position].show = show;
                })
            });
        log_change("toggle", &result);
        result
    }

    /// Removes the banner at `index` from an `{"index"}` body.
    pub fn delete_banner(&self, body: &Value) -> Result<BannerChange, ServiceError> {
        let result = parse_banner_index(body)
            .map_err(ServiceError::from)
            .and_then(|index| {
                self.modify_existing(index, |document, position| {
                    document.messages.remove(position);
                })
            });
        log_change("delete", &result);
        result
    }

    fn modify_existing(
        &self,
        index: i64,
        change: impl FnOnce(&mut BannerDocument, usize),
    ) -> Result<BannerChange, ServiceError> {
        let store = self.lock_store()?;
        let StoredBanners {
            mut document,
            revision,
        } = store.load()?.ok_or(BannerError::MessagesNotFound)?;
        let position = checked_position(index, document.messages.len())?;

        change(&mut document, position);
        let revision = store.save(&document, Some(revision))?;
        Ok(BannerChange {
            index: position,
            total: document.messages.len(),
            revision,
        })
    }

    fn load_document(&self) -> Result<BannerDocument, ServiceError> {
        let store = self.lock_store()?;
        let document = store
            .load()
            .map_err(|err| {
                warn!("event=banner_load module=service status=error error={err}");
                ServiceError::from(err)
            })?
            .map(|stored| stored.document)
            .unwrap_or_default();
        info!(
            "event=banner_load module=service status=ok banners={}",
            document.messages.len()
        );
        Ok(document)
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, S>, ServiceError> {
        self.store.lock().map_err(|_| {
            ServiceError::Storage(RepoError::InvalidData(
                "banner store lock poisoned".to_string(),
            ))
        })
    }
}

fn log_change(action: &str, result: &Result<BannerChange, ServiceError>) {
    match result {
        Ok(change) => info!(
            "event=banner_update module=service status=ok action={action} index={} total={} revision={}",
            change.index, change.total, change.revision
        ),
        Err(err) => warn!(
            "event=banner_update module=service status=error action={action} error_code={} error={err}",
            err.code()
        ),
    }
}
