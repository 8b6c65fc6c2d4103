//! Draw submission: turn ordered item references into recorded batch
//! commands.
//!
//! All three entry points run inside a batch scope opened by the caller
//! (see [`GpuContext::do_in_batch`](prism_gpu::GpuContext::do_in_batch));
//! one batch is shared across every item of a call. Per-item failures are
//! absorbed here: a skipped item is simply absent from the frame.

use crate::args::RenderArgs;
use crate::item::{Item, ItemBound};
use crate::scene::Scene;
use crate::shape::ShapePipelines;
use prism_gpu::Batch;

/// Invoke each item's draw routine in sequence order.
///
/// Items with ids unknown to the scene are skipped with a warning.
pub fn render_items(scene: &Scene, args: &mut RenderArgs, batch: &mut Batch, in_items: &[ItemBound]) {
    for item_bound in in_items {
        let Some(item) = scene.get_item(item_bound.id) else {
            log::warn!("{} not in scene during submission; skipped", item_bound.id);
            continue;
        };
        item.render(args, batch);
    }
}

/// Draw one shape-category item.
///
/// Resolution of the item's shape key decides the path:
/// - valid key without OWN_PIPELINE: pick a pipeline from the table; on a
///   miss the item is silently skipped (the table owns that diagnostic). On
///   a hit the pipeline is bound in the batch and installed in
///   `args.pipeline` for the duration of the draw, then cleared.
/// - key with OWN_PIPELINE: the item's draw routine manages its own state;
///   no table lookup happens.
/// - invalid key: not drawn; one diagnostic names the offending key.
///
/// Callers guarantee `item` is shape-category; passing anything else is a
/// contract violation, checked only in debug builds.
pub fn render_shape(
    args: &mut RenderArgs,
    batch: &mut Batch,
    pipelines: &dyn ShapePipelines,
    item: &Item,
) {
    debug_assert!(
        item.key().is_shape(),
        "render_shape called on a non-shape item: {:?}",
        item.key()
    );

    let key = item.shape_key();
    if key.is_valid() && !key.has_own_pipeline() {
        let Some(pipeline) = pipelines.pick_pipeline(key) else {
            return;
        };
        batch.set_pipeline(&pipeline);
        args.pipeline = Some(pipeline);
        item.render(args, batch);
        args.pipeline = None;
    } else if key.has_own_pipeline() {
        item.render(args, batch);
    } else {
        log::warn!("item could not be rendered: invalid shape key {key:?}");
    }
}

/// Draw a prefix of `in_items` through [`render_shape`], strictly in input
/// order.
///
/// `max_drawn` caps how many items are drawn; `None` means no cap. The cap
/// enables budget-limited drawing (level-of-detail, time-boxed frames)
/// without truncating or copying the sequence.
pub fn render_shapes(
    scene: &Scene,
    args: &mut RenderArgs,
    batch: &mut Batch,
    pipelines: &dyn ShapePipelines,
    in_items: &[ItemBound],
    max_drawn: Option<usize>,
) {
    let num_to_draw = max_drawn.map_or(in_items.len(), |cap| cap.min(in_items.len()));

    for item_bound in &in_items[..num_to_draw] {
        let Some(item) = scene.get_item(item_bound.id) else {
            log::warn!("{} not in scene during submission; skipped", item_bound.id);
            continue;
        };
        render_shape(args, batch, pipelines, item);
    }
}
