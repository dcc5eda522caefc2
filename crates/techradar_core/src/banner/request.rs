//! Banner request parsing.
//!
//! # Invariants
//! - A new banner needs a non-blank `message` and at least one page.
//! - Optional fields are typed when present; `null` counts as absent.
//! - Parsing has no side effects.

use crate::banner::error::BannerError;
use crate::model::banner::{Banner, DEFAULT_BANNER_TYPE};
use serde_json::{Map, Value};

/// Parses `{"banner": {...}}` into a banner ready to append.
///
/// Defaults: `title` empty, `type` `info`, `show` true. `description`
/// mirrors `message`. Fields outside the banner shape are dropped.
pub fn parse_new_banner(body: &Value) -> Result<Banner, BannerError> {
    let banner = body
        .get("banner")
        .and_then(Value::as_object)
        .ok_or(BannerError::InvalidBanner)?;

    let message = match banner.get("message").and_then(Value::as_str) {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => return Err(BannerError::InvalidBanner),
    };
    let pages = parse_pages(banner.get("pages"))?;

    let mut parsed = Banner::new(message, pages);
    if let Some(title) = optional_str(banner, "title")? {
        parsed.title = title.to_string();
    }
    if let Some(kind) = optional_str(banner, "type")? {
        parsed.kind = if kind.trim().is_empty() {
            DEFAULT_BANNER_TYPE.to_string()
        } else {
            kind.to_string()
        };
    }
    match banner.get("show") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(show)) => parsed.show = *show,
        Some(_) => return Err(BannerError::InvalidBanner),
    }
    Ok(parsed)
}

/// Reads `index` from a toggle/delete body.
///
/// Negative values parse; they fail the range check against the document.
pub fn parse_banner_index(body: &Value) -> Result<i64, BannerError> {
    body.get("index")
        .and_then(Value::as_i64)
        .ok_or(BannerError::InvalidIndex)
}

/// Reads the `show` flag from a toggle body.
pub fn parse_visibility(body: &Value) -> Result<bool, BannerError> {
    body.get("show")
        .and_then(Value::as_bool)
        .ok_or(BannerError::InvalidVisibility)
}

/// Position of `index` within a list of `len` banners.
pub fn checked_position(index: i64, len: usize) -> Result<usize, BannerError> {
    usize::try_from(index)
        .ok()
        .filter(|position| *position < len)
        .ok_or(BannerError::IndexOutOfRange)
}

fn parse_pages(raw: Option<&Value>) -> Result<Vec<String>, BannerError> {
    let pages = raw
        .and_then(Value::as_array)
        .filter(|pages| !pages.is_empty())
        .ok_or(BannerError::InvalidBanner)?;

    pages
        .iter()
        .map(|page| match page.as_str() {
            Some(page) if !page.trim().is_empty() => Ok(page.to_string()),
            _ => Err(BannerError::InvalidBanner),
        })
        .collect()
}

fn optional_str<'a>(
    banner: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a str>, BannerError> {
    match banner.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(BannerError::InvalidBanner),
    }
}
