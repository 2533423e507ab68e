/// Messages exchanged between page scripts, the background worker and the side panel
use serde::{Deserialize, Serialize};

use crate::clip_data::ClipKind;
use crate::operations::CropRegion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    CaptureLink {
        url: String,
        text: String,
    },
    CaptureImage {
        src: String,
        alt: Option<String>,
    },
    CaptureText {
        text: String,
    },
    CaptureScreenshot {
        region: CropRegion,
        device_pixel_ratio: f64,
    },
    ToggleSite {
        url: String,
    },
    SiteStateChanged {
        url: String,
        enabled: bool,
    },
    ItemsUpdated,
    /// Ask the page script for the best image under the last right-click
    PickImage,
    /// Ask the page script to let the user drag out a screenshot region
    SelectRegion,
}

impl Message {
    /// Item content for the capture messages that carry it directly.
    ///
    /// Screenshots need the cropped bitmap first, so they return `None`.
    pub fn capture_content(&self) -> Option<ClipKind> {
        match self {
            Message::CaptureLink { url, text } => Some(ClipKind::Link {
                url: url.clone(),
                text: text.clone(),
            }),
            Message::CaptureImage { src, alt } => Some(ClipKind::Image {
                src: src.clone(),
                alt: alt.clone(),
            }),
            Message::CaptureText { text } => Some(ClipKind::Text { text: text.clone() }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let message = Message::ToggleSite { url: "https://github.com".to_string() };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({"type": "toggle_site", "url": "https://github.com"}));

        let json = serde_json::to_value(&Message::ItemsUpdated).unwrap();
        assert_eq!(json, serde_json::json!({"type": "items_updated"}));

        let picked: Message = serde_json::from_str(r#"{"type": "pick_image"}"#).unwrap();
        assert_eq!(picked, Message::PickImage);
    }

    #[test]
    fn test_parse_screenshot_request() {
        let raw = r#"{
            "type": "capture_screenshot",
            "region": {"x": 1, "y": 2, "width": 30, "height": 40},
            "device_pixel_ratio": 2
        }"#;
        let message: Message = serde_json::from_str(raw).unwrap();

        assert_eq!(
            message,
            Message::CaptureScreenshot {
                region: CropRegion { x: 1.0, y: 2.0, width: 30.0, height: 40.0 },
                device_pixel_ratio: 2.0,
            }
        );
        assert_eq!(message.capture_content(), None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<Message>(r#"{"type": "format_disk"}"#).is_err());
    }

    #[test]
    fn test_capture_content() {
        let message = Message::CaptureText { text: "quote".to_string() };
        assert_eq!(message.capture_content(), Some(ClipKind::Text { text: "quote".to_string() }));
    }
}
