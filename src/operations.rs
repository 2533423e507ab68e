/// Collection operations: reordering, drag tracking, per-tab state, cropping

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::clip_data::ClipItem;
use crate::domain::{site_state, DisabledDomains, SiteState};

/// Move the element at `from` so it ends up at index `to`.
///
/// Targets past the end land on the last slot. Returns false when nothing moved.
pub fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }

    let to = to.min(items.len() - 1);
    if from == to {
        return false;
    }

    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Tracks the item being dragged in the side panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    source: Option<String>,
}

impl DragSession {
    pub fn new() -> Self {
        DragSession::default()
    }

    pub fn begin(&mut self, item_id: &str) {
        self.source = Some(item_id.to_string());
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn cancel(&mut self) {
        self.source = None;
    }

    /// Drop the dragged item onto `target_id`, taking its place.
    ///
    /// The session ends either way.
    pub fn drop_on(&mut self, items: &mut Vec<ClipItem>, target_id: &str) -> bool {
        let Some(source) = self.source.take() else {
            return false;
        };

        let from = items.iter().position(|item| item.id == source);
        let to = items.iter().position(|item| item.id == target_id);

        match (from, to) {
            (Some(from), Some(to)) => reorder(items, from, to),
            _ => false,
        }
    }
}

/// Capture state of each open tab, kept current from broadcasts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStateTracker {
    tabs: HashMap<i32, SiteState>,
}

impl SiteStateTracker {
    pub fn new() -> Self {
        SiteStateTracker::default()
    }

    /// Tabs never seen are enabled
    pub fn get(&self, tab_id: i32) -> SiteState {
        self.tabs.get(&tab_id).copied().unwrap_or(SiteState::Enabled)
    }

    /// Evaluate the tab's URL against the current disabled set
    pub fn update(&mut self, tab_id: i32, url: &str, disabled: &DisabledDomains) -> SiteState {
        let state = site_state(url, disabled);
        self.tabs.insert(tab_id, state);
        state
    }

    pub fn forget(&mut self, tab_id: i32) {
        self.tabs.remove(&tab_id);
    }

    pub fn disabled_tabs(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .tabs
            .iter()
            .filter(|(_, state)| !state.is_enabled())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Region the user dragged out, in CSS pixels relative to the viewport.
///
/// Width and height are negative when the drag went up or left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Region inside the captured bitmap, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Map the region onto a screenshot of `image_width` × `image_height`
    /// device pixels taken at `device_pixel_ratio`.
    ///
    /// Edges are rounded outward and clamped to the bitmap. Returns `None`
    /// when nothing of the region is left.
    pub fn to_device_pixels(
        &self,
        device_pixel_ratio: f64,
        image_width: u32,
        image_height: u32,
    ) -> Option<PixelRect> {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return None;
        }
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let (left, right) = ordered(self.x, self.x + self.width);
        let (top, bottom) = ordered(self.y, self.y + self.height);

        let left = (left * device_pixel_ratio).floor().clamp(0.0, image_width as f64);
        let top = (top * device_pixel_ratio).floor().clamp(0.0, image_height as f64);
        let right = (right * device_pixel_ratio).ceil().clamp(0.0, image_width as f64);
        let bottom = (bottom * device_pixel_ratio).ceil().clamp(0.0, image_height as f64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip_data::ClipKind;

    fn create_test_item(text: &str) -> ClipItem {
        ClipItem::new(
            ClipKind::Text { text: text.to_string() },
            "https://example.com".to_string(),
            "Example".to_string(),
            0.0,
        )
    }

    fn labels(items: &[ClipItem]) -> Vec<String> {
        items.iter().map(|item| item.label()).collect()
    }

    #[test]
    fn test_reorder() {
        let mut items = vec!['a', 'b', 'c', 'd'];

        assert!(reorder(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        assert!(reorder(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);

        assert!(reorder(&mut items, 1, 99));
        assert_eq!(items, vec!['d', 'c', 'a', 'b']);
    }

    #[test]
    fn test_reorder_noop() {
        let mut items = vec![1, 2, 3];
        assert!(!reorder(&mut items, 1, 1));
        assert!(!reorder(&mut items, 3, 0));
        assert_eq!(items, vec![1, 2, 3]);

        let mut empty: Vec<i32> = Vec::new();
        assert!(!reorder(&mut empty, 0, 0));
    }

    #[test]
    fn test_drag_session_drop() {
        let mut items = vec![create_test_item("a"), create_test_item("b"), create_test_item("c")];
        let dragged = items[2].id.clone();
        let target = items[0].id.clone();

        let mut drag = DragSession::new();
        drag.begin(&dragged);
        assert_eq!(drag.source(), Some(dragged.as_str()));

        assert!(drag.drop_on(&mut items, &target));
        assert_eq!(labels(&items), vec!["c", "a", "b"]);
        assert_eq!(drag.source(), None);
    }

    #[test]
    fn test_drag_session_without_source() {
        let mut items = vec![create_test_item("a"), create_test_item("b")];
        let target = items[1].id.clone();

        let mut drag = DragSession::new();
        assert!(!drag.drop_on(&mut items, &target));

        drag.begin("missing");
        assert!(!drag.drop_on(&mut items, &target));
        assert_eq!(labels(&items), vec!["a", "b"]);

        drag.begin(&target);
        drag.cancel();
        assert_eq!(drag.source(), None);
    }

    #[test]
    fn test_abandoned_drag_does_not_reorder() {
        let mut items = vec![create_test_item("a"), create_test_item("b")];
        let dragged = items[0].id.clone();
        let target = items[1].id.clone();

        let mut drag = DragSession::new();
        drag.begin(&dragged);
        // Dragend without a drop
        drag.cancel();

        assert!(!drag.drop_on(&mut items, &target));
        assert_eq!(labels(&items), vec!["a", "b"]);
    }

    #[test]
    fn test_site_state_tracker() {
        let disabled: DisabledDomains = ["github.com"].into_iter().collect();
        let mut tracker = SiteStateTracker::new();

        assert_eq!(tracker.get(7), SiteState::Enabled);
        assert_eq!(tracker.update(1, "https://gist.github.com", &disabled), SiteState::Disabled);
        assert_eq!(tracker.update(2, "https://rust-lang.org", &disabled), SiteState::Enabled);
        assert_eq!(tracker.update(3, "about:blank", &disabled), SiteState::Disabled);

        assert_eq!(tracker.disabled_tabs(), vec![1, 3]);

        tracker.forget(1);
        assert_eq!(tracker.get(1), SiteState::Enabled);
        assert_eq!(tracker.disabled_tabs(), vec![3]);
    }

    #[test]
    fn test_crop_scales_by_pixel_ratio() {
        let region = CropRegion { x: 10.0, y: 20.0, width: 100.0, height: 50.0 };
        assert_eq!(
            region.to_device_pixels(2.0, 1920, 1080),
            Some(PixelRect { x: 20, y: 40, width: 200, height: 100 })
        );
    }

    #[test]
    fn test_crop_normalizes_reverse_drag() {
        let region = CropRegion { x: 110.0, y: 70.0, width: -100.0, height: -50.0 };
        assert_eq!(
            region.to_device_pixels(1.0, 800, 600),
            Some(PixelRect { x: 10, y: 20, width: 100, height: 50 })
        );
    }

    #[test]
    fn test_crop_rounds_outward_and_clamps() {
        let region = CropRegion { x: 0.3, y: -5.0, width: 10.2, height: 20.0 };
        assert_eq!(
            region.to_device_pixels(1.5, 12, 100),
            Some(PixelRect { x: 0, y: 0, width: 12, height: 23 })
        );
    }

    #[test]
    fn test_crop_rejects_empty_regions() {
        let zero = CropRegion { x: 5.0, y: 5.0, width: 0.0, height: 10.0 };
        assert_eq!(zero.to_device_pixels(1.0, 100, 100), None);

        let outside = CropRegion { x: 500.0, y: 500.0, width: 10.0, height: 10.0 };
        assert_eq!(outside.to_device_pixels(1.0, 100, 100), None);

        let region = CropRegion { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
        assert_eq!(region.to_device_pixels(0.0, 100, 100), None);
        assert_eq!(region.to_device_pixels(f64::NAN, 100, 100), None);
    }
}
