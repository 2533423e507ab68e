//! Browser tests for the functions the background worker and page script call.
//! Run with: `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use js_sys::{Reflect, JSON};
use page_clipper::domain::DisabledDomains;
use page_clipper::storage::StorageData;
use page_clipper::{append_clip, clip_from_message, crop_rect, is_site_disabled, toggle_site, TabStates};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(json: &str) -> JsValue {
    JSON::parse(json).expect("should parse test JSON")
}

fn field(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).expect("should read field")
}

fn number(value: &JsValue, name: &str) -> f64 {
    field(value, name).as_f64().expect("field should be a number")
}

#[wasm_bindgen_test]
fn test_toggle_site_result_shape() {
    let outcome = toggle_site(JsValue::NULL, "https://gist.github.com/rust").unwrap();
    assert_eq!(field(&outcome, "enabled").as_bool(), Some(false));

    let record = field(&outcome, "record");
    let domains = field(&field(&record, "settings"), "disabled_domains");
    assert!(js_sys::Array::is_array(&domains));
    assert_eq!(JSON::stringify(&domains).unwrap(), r#"["gist.github.com"]"#);

    let outcome = toggle_site(record, "https://gist.github.com/other").unwrap();
    assert_eq!(field(&outcome, "enabled").as_bool(), Some(true));
    let storage = StorageData::from_js(field(&outcome, "record")).unwrap();
    assert_eq!(storage.settings.disabled_domains, DisabledDomains::new());
}

#[wasm_bindgen_test]
fn test_toggle_site_noop_reports_null() {
    let record = js(r#"{"items": [], "settings": {"disabled_domains": ["a.com"]}}"#);

    for url in ["chrome://newtab", "http://localhost:8080", "not a url"] {
        let outcome = toggle_site(record.clone(), url).unwrap();
        let enabled = field(&outcome, "enabled");
        assert!(enabled.is_null(), "{} should not be toggleable", url);

        let storage = StorageData::from_js(field(&outcome, "record")).unwrap();
        assert!(storage.settings.disabled_domains.contains("a.com"));
    }
}

#[wasm_bindgen_test]
fn test_toggle_site_rejects_unreadable_record() {
    assert!(toggle_site(js(r#"{"items": 5}"#), "https://a.com").is_err());
}

#[wasm_bindgen_test]
fn test_unreadable_domains_fall_back_to_empty() {
    let url = "https://gist.github.com/x";
    assert!(is_site_disabled(url, js(r#"["github.com"]"#)));

    assert!(!is_site_disabled(url, JsValue::from_str("github.com")));
    assert!(!is_site_disabled(url, JsValue::from_f64(42.0)));
    assert!(!is_site_disabled(url, js(r#"{"github.com": true}"#)));
    assert!(!is_site_disabled(url, JsValue::UNDEFINED));

    // Internal pages stay disabled whatever the stored value is
    assert!(is_site_disabled("chrome://extensions", JsValue::from_str("garbage")));
}

#[wasm_bindgen_test]
fn test_tab_states_follow_updates() {
    let mut tabs = TabStates::new();
    assert!(tabs.update(1, "https://github.com/rust-lang", JsValue::from_str("garbage")));
    assert!(!tabs.update(2, "https://github.com/rust-lang", js(r#"["github.com"]"#)));
    assert!(!tabs.update(3, "chrome://settings", JsValue::NULL));

    assert!(tabs.is_enabled(1));
    assert_eq!(tabs.disabled_tabs(), vec![2, 3]);

    tabs.forget(2);
    assert_eq!(tabs.disabled_tabs(), vec![3]);
}

#[wasm_bindgen_test]
fn test_append_clip_to_missing_record() {
    let item = clip_from_message(
        js(r#"{"type": "capture_text", "text": "quoted"}"#),
        "https://example.com/post".to_string(),
        "Post".to_string(),
    )
    .unwrap();

    let record = append_clip(JsValue::NULL, item).unwrap();
    let storage = StorageData::from_js(record).unwrap();

    assert_eq!(storage.items.len(), 1);
    assert_eq!(storage.items[0].label(), "quoted");
    assert_eq!(storage.items[0].source_url, "https://example.com/post");
}

#[wasm_bindgen_test]
fn test_clip_from_message_rejects_requests() {
    let result = clip_from_message(js(r#"{"type": "items_updated"}"#), String::new(), String::new());
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_crop_rect_from_screenshot_message() {
    let message = js(
        r#"{"type": "capture_screenshot",
            "region": {"x": 10, "y": 20, "width": 100, "height": 50},
            "device_pixel_ratio": 2}"#,
    );

    let rect = crop_rect(message, 1920, 1080).unwrap();
    assert_eq!(number(&rect, "x"), 20.0);
    assert_eq!(number(&rect, "y"), 40.0);
    assert_eq!(number(&rect, "width"), 200.0);
    assert_eq!(number(&rect, "height"), 100.0);

    let empty = js(
        r#"{"type": "capture_screenshot",
            "region": {"x": 0, "y": 0, "width": 0, "height": 0},
            "device_pixel_ratio": 1}"#,
    );
    assert!(crop_rect(empty, 100, 100).unwrap().is_undefined());

    assert!(crop_rect(js(r#"{"type": "capture_text", "text": "x"}"#), 100, 100).is_err());
}
