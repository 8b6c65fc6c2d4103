//! Retained-mode draw pipeline: cull scene items against a view volume,
//! group them by shape pipeline, order each group by viewpoint distance, and
//! submit draws through a scoped command batch.
//!
//! Per-frame control flow:
//!
//! ```text
//! Scene → cull_items → PipelineSortShapes → DepthSortShapes → render_shapes → Batch
//! ```
//!
//! Every stage is a pure transform over sequences of [`ItemBound`]s; the only
//! cross-stage state is the additive counters in [`RenderDetails`]. Per-item
//! failures (unknown id, invalid shape key, pipeline miss) are absorbed as
//! skip-and-log so one bad item never aborts a frame.

pub mod args;
pub mod cull;
pub mod draw;
pub mod item;
pub mod light;
pub mod scene;
pub mod shape;
pub mod sort;

pub use args::{CategoryDetails, ItemCategory, RenderArgs, RenderDetails};
pub use cull::{CullTest, cull_items};
pub use draw::{render_items, render_shape, render_shapes};
pub use item::{Item, ItemBound, ItemId, ItemKey};
pub use light::DrawLight;
pub use scene::{ItemFilter, MasterBucket, Scene};
pub use shape::{ShapeKey, ShapePipelineError, ShapePipelineMap, ShapePipelines};
pub use sort::{DepthSortShapes, PipelineSortShapes, ShapeGroups, depth_sort_items};
