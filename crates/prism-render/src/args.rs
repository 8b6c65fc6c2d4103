//! Per-frame rendering context: view reference point, frame statistics, and
//! the active-pipeline slot.

use glam::Vec3;
use prism_gpu::Pipeline;

/// Statistic category an item is counted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCategory {
    Opaque,
    Translucent,
    Other,
}

/// Additive per-category counters for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryDetails {
    /// Items examined by the culling stage.
    pub considered: usize,
    /// Items rejected by the visibility test.
    pub out_of_view: usize,
    /// Items that survived culling.
    pub rendered: usize,
}

/// Frame statistics, split by item category.
///
/// Lifecycle: the frame driver calls [`reset`](Self::reset) at frame start,
/// each stage adds to its category, diagnostics read the totals afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderDetails {
    pub opaque: CategoryDetails,
    pub translucent: CategoryDetails,
    pub other: CategoryDetails,
}

impl RenderDetails {
    /// Mutable access to one category's counters.
    pub fn edit(&mut self, category: ItemCategory) -> &mut CategoryDetails {
        match category {
            ItemCategory::Opaque => &mut self.opaque,
            ItemCategory::Translucent => &mut self.translucent,
            ItemCategory::Other => &mut self.other,
        }
    }

    /// Read access to one category's counters.
    pub fn get(&self, category: ItemCategory) -> &CategoryDetails {
        match category {
            ItemCategory::Opaque => &self.opaque,
            ItemCategory::Translucent => &self.translucent,
            ItemCategory::Other => &self.other,
        }
    }

    /// Zero all counters at frame start.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Total items examined across categories.
    pub fn total_considered(&self) -> usize {
        self.opaque.considered + self.translucent.considered + self.other.considered
    }

    /// Total items that survived culling across categories.
    pub fn total_rendered(&self) -> usize {
        self.opaque.rendered + self.translucent.rendered + self.other.rendered
    }
}

/// The rendering-args context threaded through every draw call.
///
/// The `pipeline` slot is single-writer-at-a-time: the shape draw path
/// installs a pipeline before invoking an item's draw routine and clears it
/// before returning, so installation is strictly scoped to one draw call.
pub struct RenderArgs {
    /// View reference point for depth sorting and item draw routines.
    pub view_position: Vec3,
    /// Frame statistics sink.
    pub details: RenderDetails,
    /// The pipeline currently installed by the shape draw path, if any.
    pub pipeline: Option<Pipeline>,
}

impl RenderArgs {
    pub fn new(view_position: Vec3) -> Self {
        Self {
            view_position,
            details: RenderDetails::default(),
            pipeline: None,
        }
    }
}
