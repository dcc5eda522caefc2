//! Merge of validated submissions into persisted radar state.
//!
//! # Responsibility
//! - Combine a structurally valid submission with the persisted dataset.
//! - Run reference checks against the applicable quadrant/ring sets first.
//!
//! # Invariants
//! - Entries merge by id: known ids are replaced in place, new ids appended.
//! - Entries absent from the submission are untouched; nothing is deleted.
//! - Re-applying the same submission yields the same dataset.
//! - All validation finishes before the candidate dataset is mutated; the
//!   persisted input is never mutated.

use crate::config::RadarConfig;
use crate::model::radar::{Entry, RadarDataset, UpsertOutcome};
use crate::radar::error::ValidationError;
use crate::radar::reference::{check_references, ReferenceSet};
use crate::radar::structure::{validate_submission, Submission, UpdateMode};
use serde_json::Value;
use std::collections::HashSet;

/// Counts produced by one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub mode: UpdateMode,
    pub replaced: usize,
    pub appended: usize,
}

/// Validates a raw submission against the persisted dataset and merges it.
///
/// Returns the next dataset; the caller persists it.
///
/// # Errors
/// - Any `ValidationError` from structure or reference validation. The
///   persisted dataset is never modified.
pub fn validate_and_merge(
    persisted: &RadarDataset,
    raw: &Value,
    config: &RadarConfig,
) -> Result<RadarDataset, ValidationError> {
    let submission = validate_submission(raw, config)?;
    merge_submission(persisted, submission, config).map(|(dataset, _)| dataset)
}

/// Reference-checks and merges an already structure-validated submission.
pub fn merge_submission(
    persisted: &RadarDataset,
    submission: Submission,
    config: &RadarConfig,
) -> Result<(RadarDataset, MergeStats), ValidationError> {
    let pseudo_rings = config.pseudo_ring_ids.iter().map(String::as_str);

    match submission {
        Submission::PartialEntriesOnly { entries } => {
            let references =
                ReferenceSet::new(persisted.quadrant_ids(), persisted.ring_ids())
                    .with_extra_rings(pseudo_rings);
            check_references(&entries, &references)?;

            let mut next = persisted.clone();
            let stats = upsert_all(&mut next, entries, UpdateMode::Partial);
            Ok((next, stats))
        }
        Submission::FullReplace {
            title,
            quadrants,
            rings,
            entries,
        } => {
            {
                let references = ReferenceSet::new(
                    quadrants.iter().map(|q| q.id.as_str()),
                    rings.iter().map(|r| r.id.as_str()),
                )
                .with_extra_rings(pseudo_rings);
                check_references(&entries, &references)?;

                let submitted: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
                let retained = persisted
                    .entries()
                    .iter()
                    .filter(|existing| !submitted.contains(existing.id.as_str()));
                check_references(retained, &references)?;
            }

            let mut next = persisted.clone();
            next.replace_structure(title, quadrants, rings);
            let stats = upsert_all(&mut next, entries, UpdateMode::Full);
            Ok((next, stats))
        }
    }
}

fn upsert_all(dataset: &mut RadarDataset, entries: Vec<Entry>, mode: UpdateMode) -> MergeStats {
    let mut stats = MergeStats {
        mode,
        replaced: 0,
        appended: 0,
    };
    for entry in entries {
        match dataset.upsert_entry(entry) {
            UpsertOutcome::Replaced(_) => stats.replaced += 1,
            UpsertOutcome::Appended(_) => stats.appended += 1,
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::{merge_submission, validate_and_merge};
    use crate::config::RadarConfig;
    use crate::model::radar::{Entry, Quadrant, RadarDataset, Ring, TimelineEvent};
    use crate::radar::error::ValidationError;
    use crate::radar::structure::{validate_submission, UpdateMode};
    use serde_json::json;

    fn persisted() -> RadarDataset {
        RadarDataset::from_parts(
            "Radar".to_string(),
            vec![Quadrant::new("1", "Languages"), Quadrant::new("2", "Frameworks")],
            vec![
                Ring::new("adopt", "ADOPT", "#008a00"),
                Ring::new("hold", "HOLD", "#c40000"),
            ],
            vec![
                Entry::new("rust", "1", vec![TimelineEvent::new("adopt", "2024-01")]),
                Entry::new("react", "2", vec![TimelineEvent::new("hold", "2024-02")]),
            ],
        )
        .expect("valid dataset")
    }

    #[test]
    fn partial_update_replaces_in_place_and_appends() {
        let payload = json!({"entries": [
            {"id": "rust", "title": "Rust", "quadrant": "1",
             "timeline": [{"ringId": "hold", "date": "2024-05", "description": "x", "moved": -1}]},
            {"id": "go", "quadrant": "1",
             "timeline": [{"ringId": "adopt", "date": "2024-05", "description": "y", "moved": 0}]}
        ]});
        let submission = validate_submission(&payload, &RadarConfig::default()).unwrap();
        let (next, stats) =
            merge_submission(&persisted(), submission, &RadarConfig::default()).unwrap();

        assert_eq!(stats.mode, UpdateMode::Partial);
        assert_eq!((stats.replaced, stats.appended), (1, 1));
        let ids: Vec<&str> = next.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["rust", "react", "go"]);
        assert_eq!(next.entry("rust").and_then(Entry::current_ring), Some("hold"));
        assert_eq!(next.entry("react"), persisted().entry("react"));
        assert_eq!(next.title(), "Radar");
    }

    #[test]
    fn full_replace_swaps_structure_and_checks_retained_entries() {
        let payload = json!({
            "title": "Radar 2",
            "quadrants": [{"id": "1", "name": "Languages"}, {"id": "2", "name": "Frameworks"}],
            "rings": [{"id": "adopt", "name": "ADOPT", "color": "green"},
                      {"id": "hold", "name": "HOLD", "color": "red"}],
            "entries": [{"id": "rust", "quadrant": "2",
                         "timeline": [{"ringId": "adopt", "date": "2024-05"}]}]
        });
        let next = validate_and_merge(&persisted(), &payload, &RadarConfig::default()).unwrap();
        assert_eq!(next.title(), "Radar 2");
        assert_eq!(next.rings()[0].color, "green");
        assert_eq!(next.entry("rust").map(|e| e.quadrant.as_str()), Some("2"));
        assert_eq!(next.len(), 2);

        let dropping_quadrant = json!({
            "quadrants": [{"id": "1", "name": "Languages"}],
            "rings": [{"id": "adopt", "name": "ADOPT", "color": "green"},
                      {"id": "hold", "name": "HOLD", "color": "red"}],
            "entries": [{"id": "rust", "quadrant": "1",
                         "timeline": [{"ringId": "adopt"}]}]
        });
        let err =
            validate_and_merge(&persisted(), &dropping_quadrant, &RadarConfig::default())
                .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEntryStructure("unknown quadrant '2'".to_string())
        );
    }

    #[test]
    fn full_replace_without_title_keeps_persisted_title() {
        let payload = json!({
            "quadrants": [{"id": "1", "name": "Languages"}, {"id": "2", "name": "Frameworks"}],
            "rings": [{"id": "adopt", "name": "ADOPT", "color": "green"},
                      {"id": "hold", "name": "HOLD", "color": "red"}],
            "entries": [{"id": "rust", "quadrant": "1", "timeline": [{"ringId": "adopt"}]}]
        });
        let next = validate_and_merge(&persisted(), &payload, &RadarConfig::default()).unwrap();
        assert_eq!(next.title(), "Radar");
    }

    #[test]
    fn partial_update_is_checked_against_persisted_references() {
        let payload = json!({"entries": [{"id": "e1", "quadrant": "1",
            "timeline": [{"ringId": "review", "date": "2024-01"}]}]});
        let err = validate_and_merge(&persisted(), &payload, &RadarConfig::strict()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid entry structure: unknown ring 'review'");

        let next = validate_and_merge(&persisted(), &payload, &RadarConfig::default()).unwrap();
        assert!(next.contains_entry("e1"));
    }

    #[test]
    fn duplicate_ids_in_one_submission_collapse_to_last() {
        let payload = json!({"entries": [
            {"id": "go", "title": "first", "quadrant": "1", "timeline": [{"ringId": "adopt"}]},
            {"id": "go", "title": "second", "quadrant": "1", "timeline": [{"ringId": "adopt"}]}
        ]});
        let next = validate_and_merge(&persisted(), &payload, &RadarConfig::default()).unwrap();
        assert_eq!(next.len(), 3);
        assert_eq!(next.entry("go").map(|e| e.title.as_str()), Some("second"));
    }
}
