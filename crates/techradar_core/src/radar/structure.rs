//! Submission shape validation.
//!
//! # Responsibility
//! - Decide whether a raw decoded payload is eligible for processing.
//! - Decode eligible payloads into a tagged `Submission`.
//!
//! # Invariants
//! - Rules short-circuit; the first failing rule wins.
//! - Top-level failures all collapse to `ValidationError::InvalidPayload`.
//! - Per-entry failures carry a detail naming the entry and field.
//! - Validation has no side effects.

use crate::config::RadarConfig;
use crate::model::radar::{Entry, Quadrant, Ring};
use crate::radar::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

static RING_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})|[a-zA-Z]+)$").expect("valid color regex")
});
static TIMELINE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d{4}-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01]))?([ T]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("valid date regex")
});

const ENTRY_OPTIONAL_STRING_FIELDS: &[&str] = &["title", "description", "key", "url"];
const ENTRY_NULLABLE_FIELDS: &[&str] = &["title", "description", "key", "url", "links"];
const EVENT_OPTIONAL_FIELDS: &[&str] = &["moved", "date", "description"];

/// Update mode selected by the shape of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Full,
    Partial,
}

impl UpdateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
        }
    }
}

/// Structurally valid radar submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Title (optional), quadrants and rings replace the persisted ones;
    /// entries are merged by id.
    FullReplace {
        title: Option<String>,
        quadrants: Vec<Quadrant>,
        rings: Vec<Ring>,
        entries: Vec<Entry>,
    },
    /// Entries merged by id against persisted quadrants/rings.
    PartialEntriesOnly { entries: Vec<Entry> },
}

impl Submission {
    pub fn mode(&self) -> UpdateMode {
        match self {
            Self::FullReplace { .. } => UpdateMode::Full,
            Self::PartialEntriesOnly { .. } => UpdateMode::Partial,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        match self {
            Self::FullReplace { entries, .. } => entries,
            Self::PartialEntriesOnly { entries } => entries,
        }
    }
}

/// Validates the overall payload shape and decodes it.
///
/// # Errors
/// - `InvalidPayload` when the payload is not an object, `entries` is absent,
///   not an array, empty or over the configured limit, or when `title`,
///   `quadrants` or `rings` are malformed.
/// - `InvalidEntryStructure` when one entry or timeline event is malformed.
pub fn validate_submission(
    raw: &Value,
    config: &RadarConfig,
) -> Result<Submission, ValidationError> {
    let object = raw.as_object().ok_or(ValidationError::InvalidPayload)?;

    let raw_entries = match object.get("entries") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(ValidationError::InvalidPayload),
    };
    if raw_entries.len() > config.max_entries_per_submission {
        return Err(ValidationError::InvalidPayload);
    }

    let quadrants = object.get("quadrants").map(parse_quadrants).transpose()?;
    let rings = object.get("rings").map(parse_rings).transpose()?;
    let title = object.get("title").map(parse_title).transpose()?;

    let structure = match (quadrants, rings) {
        (Some(quadrants), Some(rings)) => Some((quadrants, rings)),
        (None, None) => None,
        _ => return Err(ValidationError::InvalidPayload),
    };

    let entries = raw_entries
        .iter()
        .enumerate()
        .map(|(index, value)| parse_entry(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match structure {
        Some((quadrants, rings)) => Submission::FullReplace {
            title,
            quadrants,
            rings,
            entries,
        },
        None => Submission::PartialEntriesOnly { entries },
    })
}

fn parse_title(value: &Value) -> Result<String, ValidationError> {
    match value.as_str() {
        Some(title) if !title.trim().is_empty() => Ok(title.to_string()),
        _ => Err(ValidationError::InvalidPayload),
    }
}

fn parse_quadrants(value: &Value) -> Result<Vec<Quadrant>, ValidationError> {
    let items = non_empty_array(value)?;
    let mut seen = HashSet::new();
    let mut quadrants = Vec::with_capacity(items.len());
    for item in items {
        let object = item.as_object().ok_or(ValidationError::InvalidPayload)?;
        let id = non_blank_str(object, "id").ok_or(ValidationError::InvalidPayload)?;
        non_blank_str(object, "name").ok_or(ValidationError::InvalidPayload)?;
        if !seen.insert(id) {
            return Err(ValidationError::InvalidPayload);
        }
        quadrants.push(
            serde_json::from_value(item.clone()).map_err(|_| ValidationError::InvalidPayload)?,
        );
    }
    Ok(quadrants)
}

fn parse_rings(value: &Value) -> Result<Vec<Ring>, ValidationError> {
    let items = non_empty_array(value)?;
    let mut seen = HashSet::new();
    let mut rings = Vec::with_capacity(items.len());
    for item in items {
        let object = item.as_object().ok_or(ValidationError::InvalidPayload)?;
        let id = non_blank_str(object, "id").ok_or(ValidationError::InvalidPayload)?;
        non_blank_str(object, "name").ok_or(ValidationError::InvalidPayload)?;
        let color = non_blank_str(object, "color").ok_or(ValidationError::InvalidPayload)?;
        if !is_recognizable_color(color) {
            return Err(ValidationError::InvalidPayload);
        }
        if !seen.insert(id) {
            return Err(ValidationError::InvalidPayload);
        }
        rings.push(
            serde_json::from_value(item.clone()).map_err(|_| ValidationError::InvalidPayload)?,
        );
    }
    Ok(rings)
}

fn parse_entry(index: usize, value: &Value) -> Result<Entry, ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| ValidationError::entry(format!("entry at index {index} must be an object")))?;

    let id = non_blank_str(object, "id").ok_or_else(|| {
        ValidationError::entry(format!("entry at index {index} is missing a string 'id'"))
    })?;
    if non_blank_str(object, "quadrant").is_none() {
        return Err(ValidationError::entry(format!(
            "entry '{id}' is missing a string 'quadrant'"
        )));
    }

    let events = match object.get("timeline") {
        Some(Value::Array(events)) if !events.is_empty() => events,
        _ => {
            return Err(ValidationError::entry(format!(
                "entry '{id}' must have a non-empty 'timeline'"
            )))
        }
    };

    for field in ENTRY_OPTIONAL_STRING_FIELDS {
        if !is_absent_or(object, field, Value::is_string) {
            return Err(ValidationError::entry(format!(
                "entry '{id}' field '{field}' must be a string"
            )));
        }
    }
    if !is_absent_or(object, "links", Value::is_array) {
        return Err(ValidationError::entry(format!(
            "entry '{id}' field 'links' must be an array"
        )));
    }

    let mut timeline = Vec::with_capacity(events.len());
    for (position, event) in events.iter().enumerate() {
        timeline.push(normalize_event(id, position, event)?);
    }

    let mut normalized = drop_nulls(object, ENTRY_NULLABLE_FIELDS);
    normalized.insert("timeline".to_string(), Value::Array(timeline));

    serde_json::from_value(Value::Object(normalized)).map_err(|err| {
        ValidationError::entry(format!("entry '{id}' could not be decoded: {err}"))
    })
}

fn normalize_event(id: &str, position: usize, event: &Value) -> Result<Value, ValidationError> {
    let object = event.as_object().ok_or_else(|| {
        ValidationError::entry(format!(
            "entry '{id}' timeline event {position} must be an object"
        ))
    })?;

    if non_blank_str(object, "ringId").is_none() {
        return Err(ValidationError::entry(format!(
            "entry '{id}' timeline event {position} is missing a string 'ringId'"
        )));
    }
    if !is_absent_or(object, "moved", |value| value.as_i64().is_some()) {
        return Err(ValidationError::entry(format!(
            "entry '{id}' timeline event {position} field 'moved' must be an integer"
        )));
    }
    if !is_absent_or(object, "date", |value| {
        value.as_str().is_some_and(is_timeline_date)
    }) {
        return Err(ValidationError::entry(format!(
            "entry '{id}' timeline event {position} field 'date' must look like YYYY-MM or YYYY-MM-DD"
        )));
    }
    if !is_absent_or(object, "description", Value::is_string) {
        return Err(ValidationError::entry(format!(
            "entry '{id}' timeline event {position} field 'description' must be a string"
        )));
    }

    Ok(Value::Object(drop_nulls(object, EVENT_OPTIONAL_FIELDS)))
}

/// Returns whether `color` is a `#rgb`/`#rrggbb` hex value or a colour name.
pub fn is_recognizable_color(color: &str) -> bool {
    RING_COLOR_RE.is_match(color.trim())
}

/// Returns whether `date` is `YYYY-MM` or `YYYY-MM-DD` with an optional time.
pub fn is_timeline_date(date: &str) -> bool {
    TIMELINE_DATE_RE.is_match(date)
}

fn non_empty_array(value: &Value) -> Result<&Vec<Value>, ValidationError> {
    match value {
        Value::Array(items) if !items.is_empty() => Ok(items),
        _ => Err(ValidationError::InvalidPayload),
    }
}

fn non_blank_str<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

// Null counts as absent for optional fields.
fn is_absent_or(object: &Map<String, Value>, field: &str, check: impl Fn(&Value) -> bool) -> bool {
    match object.get(field) {
        None | Some(Value::Null) => true,
        Some(value) => check(value),
    }
}

fn drop_nulls(object: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    let mut copy = object.clone();
    for field in fields {
        if copy.get(*field).is_some_and(Value::is_null) {
            copy.remove(*field);
        }
    }
    copy
}
