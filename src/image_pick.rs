//! Choosing the image to capture around a click
//!
//! Pages often stack a placeholder, a zoom icon or a transparent hit target
//! on top of the real picture. Candidates are gathered from the clicked
//! element, its descendants and a few ancestor levels, then scored.

/// How many ancestor levels above the clicked element are searched
pub const ANCESTOR_LEVELS: usize = 3;

const SCORE_NOT_PLACEHOLDER: u32 = 100;
const SCORE_NOT_VECTOR: u32 = 50;
const SCORE_INTRINSIC_SIZE: u32 = 30;
const SCORE_LAYOUT_SIZE: u32 = 20;
const SCORE_DESCRIBED: u32 = 10;
const SCORE_VISIBLE_TO_A11Y: u32 = 5;

/// What the scorer needs to know about one `<img>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFacts {
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
    /// The browser finished loading (or failed loading) the image
    pub complete: bool,
    pub layout_width: f64,
    pub layout_height: f64,
    pub aria_hidden: bool,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl ImageFacts {
    pub fn has_src(&self) -> bool {
        !self.src.trim().is_empty()
    }

    pub fn is_vector_data_uri(&self) -> bool {
        self.src
            .trim_start()
            .get(..18)
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case("data:image/svg+xml"))
    }

    pub fn has_intrinsic_size(&self) -> bool {
        self.natural_width > 0 && self.natural_height > 0
    }

    pub fn has_layout_size(&self) -> bool {
        self.layout_width > 0.0 && self.layout_height > 0.0
    }

    pub fn has_description(&self) -> bool {
        let filled = |text: &Option<String>| text.as_deref().map_or(false, |t| !t.trim().is_empty());
        filled(&self.alt) || filled(&self.title)
    }
}

/// Read-only view over a document tree.
///
/// Equality must be node identity.
pub trait DomNode: Clone + PartialEq {
    fn parent(&self) -> Option<Self>;

    /// Facts about this node if it is an image, `None` otherwise
    fn image_facts(&self) -> Option<ImageFacts>;

    /// All image elements below this node in document order (excluding itself)
    fn image_descendants(&self) -> Vec<Self>;
}

/// A low-value stand-in image.
///
/// An image that is still loading is never a placeholder, even with zero size.
pub fn is_placeholder(image: &ImageFacts) -> bool {
    image.aria_hidden
        || image.is_vector_data_uri()
        || (image.complete && image.natural_width == 0 && image.natural_height == 0)
}

/// Additive score for a candidate, higher is better
pub fn score(image: &ImageFacts) -> u32 {
    let mut total = 0;

    if !is_placeholder(image) {
        total += SCORE_NOT_PLACEHOLDER;
    }
    if !image.is_vector_data_uri() {
        total += SCORE_NOT_VECTOR;
    }
    if image.has_intrinsic_size() {
        total += SCORE_INTRINSIC_SIZE;
    } else if image.has_layout_size() {
        total += SCORE_LAYOUT_SIZE;
    }
    if image.has_description() {
        total += SCORE_DESCRIBED;
    }
    if !image.aria_hidden {
        total += SCORE_VISIBLE_TO_A11Y;
    }

    total
}

/// Collect candidate images around `start`, de-duplicated, in discovery order
pub fn gather_candidates<N: DomNode>(start: &N) -> Vec<N> {
    let mut candidates: Vec<N> = Vec::new();

    if start.image_facts().is_some() {
        push_unique(&mut candidates, start.clone());
    }

    for image in start.image_descendants() {
        push_unique(&mut candidates, image);
    }

    let mut ancestor = start.parent();
    for _ in 0..ANCESTOR_LEVELS {
        let Some(node) = ancestor else { break };
        for image in node.image_descendants() {
            push_unique(&mut candidates, image);
        }
        ancestor = node.parent();
    }

    candidates
}

fn push_unique<N: PartialEq>(candidates: &mut Vec<N>, node: N) {
    if !candidates.contains(&node) {
        candidates.push(node);
    }
}

/// Pick the best image to capture for a click on `start`.
///
/// Ties keep the first candidate found.
pub fn find_best_image<N: DomNode>(start: Option<&N>) -> Option<N> {
    let start = start?;

    let mut best: Option<(N, u32)> = None;

    for node in gather_candidates(start) {
        let Some(facts) = node.image_facts() else { continue };
        if !facts.has_src() {
            continue;
        }

        let points = score(&facts);
        let better = best.as_ref().map_or(true, |(_, top)| points > *top);
        if better {
            best = Some((node, points));
        }
    }

    best.map(|(node, _)| node)
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{DomNode, ImageFacts};
    use wasm_bindgen::JsCast;
    use web_sys::{Element, HtmlImageElement};

    impl DomNode for Element {
        fn parent(&self) -> Option<Self> {
            self.parent_element()
        }

        fn image_facts(&self) -> Option<ImageFacts> {
            let img = self.dyn_ref::<HtmlImageElement>()?;
            let has_src_attr = self
                .get_attribute("src")
                .map_or(false, |src| !src.trim().is_empty());
            let rect = self.get_bounding_client_rect();

            Some(ImageFacts {
                src: if has_src_attr { img.src() } else { String::new() },
                natural_width: img.natural_width(),
                natural_height: img.natural_height(),
                complete: img.complete(),
                layout_width: rect.width(),
                layout_height: rect.height(),
                aria_hidden: self.get_attribute("aria-hidden").as_deref() == Some("true"),
                alt: Some(img.alt()).filter(|alt| !alt.is_empty()),
                title: self.get_attribute("title"),
            })
        }

        fn image_descendants(&self) -> Vec<Self> {
            let collection = self.get_elements_by_tag_name("img");
            (0..collection.length())
                .filter_map(|i| collection.item(i))
                .collect()
        }
    }
}
