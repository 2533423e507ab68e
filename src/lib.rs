/// Page Clipper - Chrome Extension for collecting page snippets into a PDF
/// Built with Rust + WASM + Yew

pub mod clip_data;
pub mod domain;
pub mod export;
pub mod image_pick;
pub mod messages;
pub mod operations;
pub mod settings;
pub mod storage;
pub mod ui;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::clip_data::{ClipItem, ClipKind};
use crate::domain::{DisabledDomains, SiteState};
use crate::messages::Message;
use crate::operations::SiteStateTracker;
use crate::storage::StorageData;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Check a URL against the stored disabled domains (a JS array of hostnames)
#[wasm_bindgen(js_name = isSiteDisabled)]
pub fn is_site_disabled(url: &str, disabled_js: JsValue) -> bool {
    let disabled = decode_domains(disabled_js);
    domain::is_disabled(url, &disabled)
}

#[derive(Serialize)]
struct ToggleOutcome {
    record: StorageData,
    enabled: Option<bool>,
}

/// Toggle the site of `url` in the stored record. Returns `{ record, enabled }`,
/// where `enabled` is null when the URL could not be toggled.
#[wasm_bindgen(js_name = toggleSite)]
pub fn toggle_site(record_js: JsValue, url: &str) -> Result<JsValue, JsValue> {
    let mut record = StorageData::from_js(record_js)?;
    let enabled = record.toggle_site(url).map(SiteState::is_enabled);

    ToggleOutcome { record, enabled }
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize toggle result: {:?}", e)))
}

/// Append a captured item to the stored record and return the record to save
#[wasm_bindgen(js_name = appendClip)]
pub fn append_clip(record_js: JsValue, item_js: JsValue) -> Result<JsValue, JsValue> {
    let mut record = StorageData::from_js(record_js)?;
    let item: ClipItem = serde_wasm_bindgen::from_value(item_js)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse item: {:?}", e)))?;

    record.add_item(item);
    Ok(record.to_js()?)
}

/// Pick the image to capture for a click on `start`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = findBestImage)]
pub fn find_best_image(start: Option<web_sys::Element>) -> Option<web_sys::Element> {
    image_pick::find_best_image(start.as_ref())
}

/// Convert the selection in a `capture_screenshot` message into the
/// device-pixel rectangle to crop. Returns undefined when the selection is empty.
#[wasm_bindgen(js_name = cropRect)]
pub fn crop_rect(message_js: JsValue, image_width: u32, image_height: u32) -> Result<JsValue, JsValue> {
    let message: Message = serde_wasm_bindgen::from_value(message_js)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse message: {:?}", e)))?;

    let Message::CaptureScreenshot { region, device_pixel_ratio } = message else {
        return Err(JsValue::from_str("Expected a capture_screenshot message"));
    };

    let rect = region.to_device_pixels(device_pixel_ratio, image_width, image_height);

    serde_wasm_bindgen::to_value(&rect)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize rect: {:?}", e)))
}

/// Build a collection item from a link, image or text capture message
#[wasm_bindgen(js_name = clipFromMessage)]
pub fn clip_from_message(message_js: JsValue, source_url: String, page_title: String) -> Result<JsValue, JsValue> {
    let message: Message = serde_wasm_bindgen::from_value(message_js)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse message: {:?}", e)))?;

    let content = message
        .capture_content()
        .ok_or_else(|| JsValue::from_str("Message does not carry capture content"))?;

    let item = ClipItem::new(content, source_url, page_title, js_sys::Date::now());
    serde_wasm_bindgen::to_value(&item)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize item: {:?}", e)))
}

/// Build a collection item from an already cropped screenshot
#[wasm_bindgen(js_name = screenshotClip)]
pub fn screenshot_clip(
    data_url: String,
    width: u32,
    height: u32,
    source_url: String,
    page_title: String,
) -> Result<JsValue, JsValue> {
    let content = ClipKind::Screenshot { data_url, width, height };
    let item = ClipItem::new(content, source_url, page_title, js_sys::Date::now());
    serde_wasm_bindgen::to_value(&item)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize item: {:?}", e)))
}

/// Capture state of open tabs, owned by the background worker
#[wasm_bindgen]
pub struct TabStates {
    tracker: SiteStateTracker,
}

#[wasm_bindgen]
impl TabStates {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TabStates {
        TabStates { tracker: SiteStateTracker::new() }
    }

    /// Re-evaluate a tab after activation or navigation. Returns true if capture is enabled.
    pub fn update(&mut self, tab_id: i32, url: &str, disabled_js: JsValue) -> bool {
        self.tracker
            .update(tab_id, url, &decode_domains(disabled_js))
            .is_enabled()
    }

    #[wasm_bindgen(js_name = isEnabled)]
    pub fn is_enabled(&self, tab_id: i32) -> bool {
        self.tracker.get(tab_id).is_enabled()
    }

    pub fn forget(&mut self, tab_id: i32) {
        self.tracker.forget(tab_id);
    }

    #[wasm_bindgen(js_name = disabledTabs)]
    pub fn disabled_tabs(&self) -> Vec<i32> {
        self.tracker.disabled_tabs()
    }
}

impl Default for TabStates {
    fn default() -> Self {
        Self::new()
    }
}

// Start the Yew app for the side panel
#[wasm_bindgen(js_name = startSidePanel)]
pub fn start_side_panel() {
    yew::Renderer::<ui::panel::SidePanel>::new().render();
}

fn decode_domains(disabled_js: JsValue) -> DisabledDomains {
    if disabled_js.is_null() || disabled_js.is_undefined() {
        return DisabledDomains::new();
    }
    serde_wasm_bindgen::from_value(disabled_js).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable disabled domains: {:?}", e);
        DisabledDomains::new()
    })
}
