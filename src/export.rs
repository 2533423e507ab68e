/// PDF export layout
///
/// The PDF itself is produced by the JS layout library in panel.js; this
/// builds the ordered list of blocks it renders.
use serde::{Deserialize, Serialize};

use crate::clip_data::{ClipItem, ClipKind};
use crate::settings::{PageSize, PdfSettings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportBlock {
    Heading { text: String },
    Paragraph { text: String },
    Link { text: String, url: String },
    Image { src: String, caption: Option<String> },
    Source { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub title: String,
    pub page_size: PageSize,
    /// Page width and height in points
    pub page_width: f64,
    pub page_height: f64,
    pub blocks: Vec<ExportBlock>,
}

pub fn export_plan(items: &[ClipItem], settings: &PdfSettings) -> ExportDocument {
    let mut blocks = vec![ExportBlock::Heading { text: settings.title.clone() }];

    for item in items {
        match &item.content {
            ClipKind::Link { url, .. } => blocks.push(ExportBlock::Link {
                text: item.label(),
                url: url.clone(),
            }),
            ClipKind::Text { text } => blocks.push(ExportBlock::Paragraph { text: text.trim().to_string() }),
            ClipKind::Image { src, alt } => blocks.push(ExportBlock::Image {
                src: src.clone(),
                caption: alt.clone().filter(|alt| !alt.trim().is_empty()),
            }),
            ClipKind::Screenshot { data_url, .. } => blocks.push(ExportBlock::Image {
                src: data_url.clone(),
                caption: None,
            }),
        }

        if settings.include_source_urls && !item.source_url.is_empty() {
            blocks.push(ExportBlock::Source { url: item.source_url.clone() });
        }
    }

    let (page_width, page_height) = settings.page_size.points();

    ExportDocument {
        title: settings.title.clone(),
        page_size: settings.page_size,
        page_width,
        page_height,
        blocks,
    }
}

pub fn export_filename(timestamp_ms: f64) -> String {
    format!("page-clipper-{}.pdf", timestamp_ms.max(0.0) as i64)
}
