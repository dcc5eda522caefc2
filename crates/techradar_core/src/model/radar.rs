//! Tech radar domain model.
//!
//! # Responsibility
//! - Define the canonical radar document shape (quadrants, rings, entries).
//! - Keep entries addressable by id while preserving display order.
//!
//! # Invariants
//! - Entry ids, quadrant ids and ring ids are unique within a dataset.
//! - `RadarDataset` index always mirrors the position of every entry id.
//! - Unknown document fields survive a load/save cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Named category bucket an entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadrant {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quadrant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Maturity band (ADOPT/TRIAL/ASSESS/HOLD) an entry occupies over time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    pub id: String,
    pub name: String,
    /// Display colour, `#rrggbb`/`#rgb` or a CSS colour name.
    pub color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ring {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            extra: Map::new(),
        }
    }
}

/// Dated ring assignment of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Direction of ring movement. `-1|0|1` by convention; larger magnitudes
    /// occur for moves out of the review workflow.
    #[serde(default)]
    pub moved: i64,
    /// Must reference a declared ring (or a configured pseudo ring).
    pub ring_id: String,
    /// `YYYY-MM` or `YYYY-MM-DD`, optionally followed by a time component.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimelineEvent {
    pub fn new(ring_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            moved: 0,
            ring_id: ring_id.into(),
            date: date.into(),
            description: String::new(),
            extra: Map::new(),
        }
    }
}

/// One technology/practice tracked on the radar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique key across the dataset.
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Must reference a declared quadrant id.
    pub quadrant: String,
    /// Ring history, insertion order is chronological intent.
    pub timeline: Vec<TimelineEvent>,
    /// Link objects are stored opaquely.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn new(
        id: impl Into<String>,
        quadrant: impl Into<String>,
        timeline: Vec<TimelineEvent>,
    ) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            key: String::new(),
            url: String::new(),
            quadrant: quadrant.into(),
            timeline,
            links: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Ring of the most recent timeline event, if any.
    pub fn current_ring(&self) -> Option<&str> {
        self.timeline.last().map(|event| event.ring_id.as_str())
    }
}

/// Persisted (wire) shape of the radar. Entries are stored as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quadrants: Vec<Quadrant>,
    #[serde(default)]
    pub rings: Vec<Ring>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structural inconsistency found while assembling a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    DuplicateEntryId(String),
    DuplicateQuadrantId(String),
    DuplicateRingId(String),
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEntryId(id) => write!(f, "duplicate entry id `{id}`"),
            Self::DuplicateQuadrantId(id) => write!(f, "duplicate quadrant id `{id}`"),
            Self::DuplicateRingId(id) => write!(f, "duplicate ring id `{id}`"),
        }
    }
}

impl Error for DatasetError {}

/// Result of inserting one entry into a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Existing entry replaced at this position.
    Replaced(usize),
    /// New entry appended at this position.
    Appended(usize),
}

/// In-memory radar state: ordered entries plus an id -> position index.
///
/// Built once per request from the persisted document; mutated only by the
/// merge engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarDataset {
    title: String,
    quadrants: Vec<Quadrant>,
    rings: Vec<Ring>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    extra: Map<String, Value>,
}

impl RadarDataset {
    /// Creates a dataset with no entries.
    ///
    /// # Errors
    /// - Returns an error when quadrant or ring ids repeat.
    pub fn new(
        title: impl Into<String>,
        quadrants: Vec<Quadrant>,
        rings: Vec<Ring>,
    ) -> Result<Self, DatasetError> {
        Self::from_parts(title.into(), quadrants, rings, Vec::new())
    }

    /// Assembles a dataset and builds the entry index.
    ///
    /// # Errors
    /// - Returns an error when entry, quadrant or ring ids repeat.
    pub fn from_parts(
        title: String,
        quadrants: Vec<Quadrant>,
        rings: Vec<Ring>,
        entries: Vec<Entry>,
    ) -> Result<Self, DatasetError> {
        ensure_unique(quadrants.iter().map(|q| q.id.as_str()))
            .map_err(DatasetError::DuplicateQuadrantId)?;
        ensure_unique(rings.iter().map(|r| r.id.as_str())).map_err(DatasetError::DuplicateRingId)?;

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(DatasetError::DuplicateEntryId(entry.id.clone()));
            }
        }

        Ok(Self {
            title,
            quadrants,
            rings,
            entries,
            index,
            extra: Map::new(),
        })
    }

    /// Builds a dataset from its persisted document form.
    pub fn from_document(document: RadarDocument) -> Result<Self, DatasetError> {
        let RadarDocument {
            title,
            quadrants,
            rings,
            entries,
            extra,
        } = document;
        let mut dataset = Self::from_parts(title, quadrants, rings, entries)?;
        dataset.extra = extra;
        Ok(dataset)
    }

    /// Returns the persisted document form.
    pub fn to_document(&self) -> RadarDocument {
        RadarDocument {
            title: self.title.clone(),
            quadrants: self.quadrants.clone(),
            rings: self.rings.clone(),
            entries: self.entries.clone(),
            extra: self.extra.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn quadrants(&self) -> &[Quadrant] {
        &self.quadrants
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Entries in persisted display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up one entry by id.
    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    pub fn contains_entry(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn quadrant_ids(&self) -> HashSet<&str> {
        self.quadrants.iter().map(|q| q.id.as_str()).collect()
    }

    pub fn ring_ids(&self) -> HashSet<&str> {
        self.rings.iter().map(|r| r.id.as_str()).collect()
    }

    /// Replaces an entry in place when its id is known, appends otherwise.
    pub(crate) fn upsert_entry(&mut self, entry: Entry) -> UpsertOutcome {
        if let Some(&position) = self.index.get(entry.id.as_str()) {
            self.entries[position] = entry;
            return UpsertOutcome::Replaced(position);
        }

        let position = self.entries.len();
        self.index.insert(entry.id.clone(), position);
        self.entries.push(entry);
        UpsertOutcome::Appended(position)
    }

    /// Swaps title, quadrants and rings wholesale. Entries are untouched.
    pub(crate) fn replace_structure(
        &mut self,
        title: Option<String>,
        quadrants: Vec<Quadrant>,
        rings: Vec<Ring>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        self.quadrants = quadrants;
        self.rings = rings;
    }
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(id.to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        DatasetError, Entry, Quadrant, RadarDataset, RadarDocument, Ring, TimelineEvent,
        UpsertOutcome,
    };
    use serde_json::json;

    fn dataset() -> RadarDataset {
        RadarDataset::from_parts(
            "Radar".to_string(),
            vec![Quadrant::new("1", "Languages")],
            vec![Ring::new("adopt", "ADOPT", "#008a00")],
            vec![
                Entry::new("a", "1", vec![TimelineEvent::new("adopt", "2024-01")]),
                Entry::new("b", "1", vec![TimelineEvent::new("adopt", "2024-02")]),
            ],
        )
        .expect("valid dataset")
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new_ids() {
        let mut dataset = dataset();

        let mut replacement = Entry::new("a", "1", vec![TimelineEvent::new("adopt", "2024-03")]);
        replacement.title = "A".to_string();
        assert_eq!(dataset.upsert_entry(replacement), UpsertOutcome::Replaced(0));
        assert_eq!(
            dataset.upsert_entry(Entry::new("c", "1", vec![TimelineEvent::new("adopt", "2024")])),
            UpsertOutcome::Appended(2)
        );

        let ids: Vec<&str> = dataset.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(dataset.entry("a").map(|e| e.title.as_str()), Some("A"));
        assert_eq!(dataset.entry("c").map(|e| e.id.as_str()), Some("c"));
    }

    #[test]
    fn from_parts_rejects_duplicate_ids() {
        let entry = Entry::new("dup", "1", vec![TimelineEvent::new("adopt", "2024-01")]);
        let err = RadarDataset::from_parts(
            "Radar".to_string(),
            Vec::new(),
            Vec::new(),
            vec![entry.clone(), entry],
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::DuplicateEntryId("dup".to_string()));

        let err = RadarDataset::new(
            "Radar",
            Vec::new(),
            vec![Ring::new("hold", "HOLD", "red"), Ring::new("hold", "HOLD", "red")],
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::DuplicateRingId("hold".to_string()));
    }

    #[test]
    fn current_ring_is_last_timeline_event() {
        let entry = Entry::new(
            "x",
            "1",
            vec![
                TimelineEvent::new("review", "2025-07-01"),
                TimelineEvent::new("adopt", "2025-09-11"),
            ],
        );
        assert_eq!(entry.current_ring(), Some("adopt"));
    }

    #[test]
    fn sparse_entries_serialize_without_added_fields() {
        let raw = json!({
            "title": "Radar",
            "quadrants": [{"id": "1", "name": "Languages"}],
            "rings": [{"id": "adopt", "name": "ADOPT", "color": "#008a00"}],
            "entries": [{"id": "rust", "quadrant": "1",
                         "timeline": [{"moved": 0, "ringId": "adopt"}]}]
        });
        let document: RadarDocument = serde_json::from_value(raw.clone()).unwrap();
        let dataset = RadarDataset::from_document(document).unwrap();

        assert_eq!(serde_json::to_value(dataset.to_document()).unwrap(), raw);
    }
}
