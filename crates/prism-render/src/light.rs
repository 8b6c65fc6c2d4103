//! Light draw task.
//!
//! The canonical per-category task shape: fetch the category's ids from the
//! master bucket, wrap them as item references, cull against the frame's
//! visibility test, then submit the survivors inside one batch scope. Every
//! concrete draw task in the pipeline follows this fetch → cull →
//! batch-scope → submit pattern.

use crate::args::{ItemCategory, RenderArgs};
use crate::cull::{CullTest, cull_items};
use crate::draw::render_items;
use crate::scene::{ItemFilter, Scene};
use prism_gpu::GpuContext;
use prism_math::Aabb;

/// Draws every visible light item in one batch.
pub struct DrawLight {
    cull_test: CullTest,
}

impl DrawLight {
    /// Create the task with the frame's visibility test.
    pub fn new(cull_test: impl Fn(&Aabb) -> bool + Send + Sync + 'static) -> Self {
        Self {
            cull_test: Box::new(cull_test),
        }
    }

    /// Run the task for one frame.
    ///
    /// Light culling statistics land in the Other category.
    pub fn run(&self, scene: &Scene, args: &mut RenderArgs, gpu: &mut GpuContext) {
        let in_items = scene.item_bounds(&ItemFilter::light());

        let details = args.details.edit(ItemCategory::Other);
        let culled_items = cull_items(&*self.cull_test, details, &in_items);

        gpu.do_in_batch(Some("draw-lights"), |batch| {
            render_items(scene, args, batch, &culled_items);
        });
    }
}
