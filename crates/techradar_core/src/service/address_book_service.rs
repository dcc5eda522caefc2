//! Address-book lookup use-case service.
//!
//! # Responsibility
//! - Turn a raw free-text query into member profiles.
//!
//! # Invariants
//! - An empty query after normalization never reaches the directory.
//! - Output order follows the first-seen token order.
//! - Directory failures propagate; they are never turned into empty results.

use crate::address_book::classify::{classify, normalize_identifier};
use crate::address_book::directory::DirectoryLookup;
use crate::address_book::query::{parse_query, parse_query_list};
use crate::model::profile::{IdentifierKind, UserProfile};
use crate::service::error::ServiceError;
use log::{info, warn};

/// Address-book facade over one directory implementation.
pub struct AddressBookService<D: DirectoryLookup> {
    directory: D,
}

impl<D: DirectoryLookup> AddressBookService<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Resolves a comma-separated query.
    ///
    /// Tokens with no directory match still yield a profile holding the
    /// known side (username or email).
    pub fn lookup(&self, raw_query: &str) -> Result<Vec<UserProfile>, ServiceError> {
        let tokens = parse_query(raw_query).inspect_err(|_| {
            warn!("event=address_lookup module=service status=error error_code=missing_input");
        })?;
        self.resolve_tokens(&tokens)
    }

    /// Resolves a query supplied as repeated values.
    pub fn lookup_list<S: AsRef<str>>(
        &self,
        raw_query: &[S],
    ) -> Result<Vec<UserProfile>, ServiceError> {
        let tokens = parse_query_list(raw_query).inspect_err(|_| {
            warn!("event=address_lookup module=service status=error error_code=missing_input");
        })?;
        self.resolve_tokens(&tokens)
    }

    fn resolve_tokens(&self, tokens: &[String]) -> Result<Vec<UserProfile>, ServiceError> {
        let mut profiles = Vec::with_capacity(tokens.len());
        let mut matched = 0usize;
        for token in tokens {
            let identifier = normalize_identifier(token);
            let kind = classify(&identifier);
            let resolved = self.directory.resolve(&identifier, kind).map_err(|err| {
                warn!(
                    "event=address_lookup module=service status=error error_code=upstream_error kind={} error={err}",
                    kind.as_str()
                );
                ServiceError::from(err)
            })?;

            let profile = match resolved {
                Some(profile) => {
                    matched += 1;
                    profile
                }
                None => match kind {
                    IdentifierKind::Username => UserProfile::from_pair(Some(identifier), None),
                    IdentifierKind::Email => UserProfile::from_pair(None, Some(identifier)),
                },
            };
            profiles.push(profile);
        }

        info!(
            "event=address_lookup module=service status=ok tokens={} matched={matched}",
            tokens.len()
        );
        Ok(profiles)
    }
}
