//! Cross-reference checks between entries, quadrants and rings.
//!
//! # Invariants
//! - Every checked `entry.quadrant` is a member of the quadrant-id set.
//! - Every checked timeline `ringId` is a member of the ring-id set.
//! - The first violation aborts; there is no partial acceptance.

use crate::model::radar::Entry;
use crate::radar::error::ValidationError;
use std::collections::HashSet;

/// Quadrant and ring ids an entry set may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet<'a> {
    quadrant_ids: HashSet<&'a str>,
    ring_ids: HashSet<&'a str>,
}

impl<'a> ReferenceSet<'a> {
    pub fn new(
        quadrant_ids: impl IntoIterator<Item = &'a str>,
        ring_ids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            quadrant_ids: quadrant_ids.into_iter().collect(),
            ring_ids: ring_ids.into_iter().collect(),
        }
    }

    /// Adds ring ids accepted without a declared ring.
    pub fn with_extra_rings(mut self, ring_ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.ring_ids.extend(ring_ids);
        self
    }

    pub fn has_quadrant(&self, id: &str) -> bool {
        self.quadrant_ids.contains(id)
    }

    pub fn has_ring(&self, id: &str) -> bool {
        self.ring_ids.contains(id)
    }
}

/// Confirms every reference in `entries` resolves against `references`.
///
/// # Errors
/// - `InvalidEntryStructure("unknown quadrant '<q>'")` for the first entry
///   whose quadrant is not declared.
/// - `InvalidEntryStructure("unknown ring '<r>'")` for the first timeline
///   event whose ring is not declared.
pub fn check_references<'e>(
    entries: impl IntoIterator<Item = &'e Entry>,
    references: &ReferenceSet<'_>,
) -> Result<(), ValidationError> {
    for entry in entries {
        if !references.has_quadrant(&entry.quadrant) {
            return Err(ValidationError::entry(format!(
                "unknown quadrant '{}'",
                entry.quadrant
            )));
        }
        if let Some(event) = entry
            .timeline
            .iter()
            .find(|event| !references.has_ring(&event.ring_id))
        {
            return Err(ValidationError::entry(format!(
                "unknown ring '{}'",
                event.ring_id
            )));
        }
    }
    Ok(())
}
