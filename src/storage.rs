/// Storage serialization utilities for chrome.storage.local

use crate::clip_data::ClipItem;
use crate::domain::{self, SiteState};
use crate::operations::reorder;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Key of the root record in chrome.storage.local
pub const STORAGE_KEY: &str = "page_clipper_data";

/// chrome.storage.local quota without the unlimitedStorage permission
pub const LOCAL_QUOTA_BYTES: u64 = 10 * 1024 * 1024;

const NEAR_LIMIT_PERCENT: u8 = 90;

#[derive(Error, Debug, PartialEq)]
pub enum StorageError {
    #[error("Failed to parse storage: {0}")]
    Decode(String),

    #[error("Failed to serialize storage: {0}")]
    Encode(String),

    /// The chrome.storage call itself failed
    #[error("Storage bridge failed: {0}")]
    Bridge(String),
}

impl From<StorageError> for JsValue {
    fn from(error: StorageError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Root storage structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageData {
    #[serde(default)]
    pub items: Vec<ClipItem>,
    #[serde(default)]
    pub settings: Settings,
}

impl StorageData {
    pub fn new() -> Self {
        StorageData::default()
    }

    /// Decode the record read from chrome.storage.local. A missing record is empty.
    pub fn from_js(value: JsValue) -> Result<Self, StorageError> {
        if value.is_null() || value.is_undefined() {
            return Ok(StorageData::new());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| StorageError::Decode(e.to_string()))
    }

    pub fn to_js(&self) -> Result<JsValue, StorageError> {
        self.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StorageError::Encode(e.to_string()))
    }

    pub fn add_item(&mut self, item: ClipItem) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() < original_len
    }

    /// Move the item at `from` so it ends up at index `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        reorder(&mut self.items, from, to)
    }

    /// Flip capture for the site of `url`, which must be the tab's current URL
    pub fn toggle_site(&mut self, url: &str) -> Option<SiteState> {
        let current = std::mem::take(&mut self.settings.disabled_domains);
        let (disabled, state) = domain::toggle(url, current);
        self.settings.disabled_domains = disabled;
        state
    }

    /// Drop every item, keeping settings. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }
}

/// How full the local store is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageUsage {
    pub percent_used: u8,
    pub near_limit: bool,
}

pub fn storage_usage(bytes_in_use: u64, quota: u64) -> StorageUsage {
    let percent_used = if quota == 0 {
        100
    } else {
        (bytes_in_use.saturating_mul(100) / quota).min(100) as u8
    };

    StorageUsage {
        percent_used,
        near_limit: percent_used >= NEAR_LIMIT_PERCENT,
    }
}
