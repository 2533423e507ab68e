/// Data structures for captured items
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What was captured
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClipKind {
    Link { url: String, text: String },
    Image { src: String, alt: Option<String> },
    Text { text: String },
    Screenshot { data_url: String, width: u32, height: u32 },
}

/// One entry of the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipItem {
    pub id: String,
    pub content: ClipKind,
    pub source_url: String,
    pub page_title: String,
    pub created_at: f64,
}

const LABEL_MAX_CHARS: usize = 80;

impl ClipItem {
    pub fn new(content: ClipKind, source_url: String, page_title: String, created_at: f64) -> ClipItem {
        ClipItem {
            id: Uuid::new_v4().to_string(),
            content,
            source_url,
            page_title,
            created_at,
        }
    }

    /// Short one-line summary for lists and exports
    pub fn label(&self) -> String {
        let raw = match &self.content {
            ClipKind::Link { url, text } => {
                if text.trim().is_empty() { url.clone() } else { text.trim().to_string() }
            }
            ClipKind::Image { src, alt } => match alt.as_deref().map(str::trim) {
                Some(alt) if !alt.is_empty() => alt.to_string(),
                _ => file_name(src).to_string(),
            },
            ClipKind::Text { text } => text.split_whitespace().collect::<Vec<_>>().join(" "),
            ClipKind::Screenshot { width, height, .. } => format!("Screenshot {}×{}", width, height),
        };

        truncate(&raw, LABEL_MAX_CHARS)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.content {
            ClipKind::Link { .. } => "link",
            ClipKind::Image { .. } => "image",
            ClipKind::Text { .. } => "text",
            ClipKind::Screenshot { .. } => "screenshot",
        }
    }
}

/// Last path segment of a URL, without query string
fn file_name(src: &str) -> &str {
    if src.starts_with("data:") {
        return "inline image";
    }
    let path = src.split(['?', '#']).next().unwrap_or(src);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(src)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: ClipKind) -> ClipItem {
        ClipItem::new(
            kind,
            "https://example.com/page".to_string(),
            "Example".to_string(),
            1698508200000.0,
        )
    }

    #[test]
    fn test_item_creation() {
        let a = item(ClipKind::Text { text: "hello".to_string() });
        let b = item(ClipKind::Text { text: "hello".to_string() });

        assert_eq!(a.source_url, "https://example.com/page");
        assert_eq!(a.kind_name(), "text");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_labels() {
        let link = item(ClipKind::Link { url: "https://rust-lang.org".to_string(), text: "  Rust ".to_string() });
        assert_eq!(link.label(), "Rust");

        let bare = item(ClipKind::Link { url: "https://rust-lang.org".to_string(), text: String::new() });
        assert_eq!(bare.label(), "https://rust-lang.org");

        let image = item(ClipKind::Image { src: "https://cdn.site/img/cat.jpg?w=400".to_string(), alt: None });
        assert_eq!(image.label(), "cat.jpg");

        let described = item(ClipKind::Image { src: "data:image/png;base64,AAAA".to_string(), alt: Some("A cat".to_string()) });
        assert_eq!(described.label(), "A cat");

        let text = item(ClipKind::Text { text: "one\n two\tthree".to_string() });
        assert_eq!(text.label(), "one two three");

        let shot = item(ClipKind::Screenshot { data_url: "data:image/png;base64,".to_string(), width: 640, height: 480 });
        assert_eq!(shot.label(), "Screenshot 640×480");
    }

    #[test]
    fn test_long_label_is_truncated() {
        let text = item(ClipKind::Text { text: "x".repeat(200) });
        let label = text.label();
        assert_eq!(label.chars().count(), LABEL_MAX_CHARS);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn test_serialization() {
        let clip = item(ClipKind::Link { url: "https://github.com".to_string(), text: "GitHub".to_string() });

        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(json["content"]["type"], "link");
        assert_eq!(json["content"]["url"], "https://github.com");

        let deserialized: ClipItem = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, clip);
    }
}
