//! Site banner model.
//!
//! # Invariants
//! - Banners are addressed by their position in `messages`.
//! - Only banners with `show == true` are active; a missing flag is hidden.
//! - Unknown banner fields survive a load/save cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Banner type used when a submission leaves it blank.
pub const DEFAULT_BANNER_TYPE: &str = "info";

/// Notice shown at the top of the listed pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Copy of `message` for readers of older documents.
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_banner_type")]
    pub kind: String,
    /// Page names the banner appears on.
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub show: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Banner {
    /// Creates a visible `info` banner.
    pub fn new(message: impl Into<String>, pages: Vec<String>) -> Self {
        let message = message.into();
        Self {
            title: String::new(),
            description: message.clone(),
            message,
            kind: DEFAULT_BANNER_TYPE.to_string(),
            pages,
            show: true,
            extra: Map::new(),
        }
    }

    pub fn shown_on(&self, page: &str) -> bool {
        self.show && self.pages.iter().any(|candidate| candidate == page)
    }
}

fn default_banner_type() -> String {
    DEFAULT_BANNER_TYPE.to_string()
}

/// Persisted banner document (`{"messages": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerDocument {
    #[serde(default)]
    pub messages: Vec<Banner>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BannerDocument {
    /// Banners currently shown, in document order.
    pub fn active(&self) -> impl Iterator<Item = &Banner> {
        self.messages.iter().filter(|banner| banner.show)
    }
}
