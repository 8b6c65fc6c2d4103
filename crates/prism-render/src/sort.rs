//! Pipeline-state grouping and depth ordering.
//!
//! Two reorderings happen between culling and submission: items are first
//! partitioned into groups sharing a [`ShapeKey`] (so the submission stage
//! changes pipeline state as rarely as possible), then each group is ordered
//! by distance from the viewpoint (front-to-back for early-z on opaque
//! geometry, back-to-front for correct transparency).

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::item::ItemBound;
use crate::scene::Scene;
use crate::shape::ShapeKey;

/// Items grouped by shape key. Within each group, order is the input order
/// until a depth sort pass reorders it.
pub type ShapeGroups = FxHashMap<ShapeKey, Vec<ItemBound>>;

/// Partitions items into shape-key groups, preserving per-group input order.
pub struct PipelineSortShapes;

impl PipelineSortShapes {
    /// Rebuild `out_shapes` from `in_items` in a single pass.
    ///
    /// Previous contents of `out_shapes` are discarded, so re-running on the
    /// same input is idempotent and no stale group outlives the pass. Each
    /// group reserves the full input length when first created (group sizes
    /// are unknown up front) and is shrunk to its actual size afterwards.
    /// Items whose id is unknown to the scene are skipped with a warning.
    pub fn run(&self, scene: &Scene, in_items: &[ItemBound], out_shapes: &mut ShapeGroups) {
        out_shapes.clear();

        for item in in_items {
            let Some(scene_item) = scene.get_item(item.id) else {
                log::warn!("{} not in scene during pipeline sort; skipped", item.id);
                continue;
            };
            let key = scene_item.shape_key();
            out_shapes
                .entry(key)
                .or_insert_with(|| Vec::with_capacity(in_items.len()))
                .push(*item);
        }

        for group in out_shapes.values_mut() {
            group.shrink_to_fit();
        }
    }
}

/// Sort items by squared distance of their bound center from `view_position`.
///
/// The sort is stable: items at equal depth keep their pre-sort relative
/// order, which keeps frame-to-frame output flicker-free when nothing moves.
/// Distances are compared with `f32::total_cmp`, so NaN bounds cannot poison
/// the ordering.
pub fn depth_sort_items(
    view_position: Vec3,
    front_to_back: bool,
    in_items: &[ItemBound],
) -> Vec<ItemBound> {
    let mut keyed: Vec<(f32, ItemBound)> = Vec::with_capacity(in_items.len());
    keyed.extend(
        in_items
            .iter()
            .map(|item| (item.bound.center_distance_squared(view_position), *item)),
    );

    if front_to_back {
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    } else {
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    }

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Reorders every group of a [`ShapeGroups`] by viewpoint distance.
///
/// Group membership is untouched: for every key present in the input, the
/// output holds the same items, depth-sorted. Output groups are newly
/// allocated with capacity reserved ahead of the sort.
pub struct DepthSortShapes {
    /// Front-to-back when true (opaque / early-z), back-to-front otherwise
    /// (translucent blending).
    pub front_to_back: bool,
}

impl DepthSortShapes {
    pub fn new(front_to_back: bool) -> Self {
        Self { front_to_back }
    }

    /// Rebuild `out_shapes` with each input group depth-sorted.
    pub fn run(&self, view_position: Vec3, in_shapes: &ShapeGroups, out_shapes: &mut ShapeGroups) {
        out_shapes.clear();
        out_shapes.reserve(in_shapes.len());

        for (key, in_items) in in_shapes {
            out_shapes.insert(
                *key,
                depth_sort_items(view_position, self.front_to_back, in_items),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Item, ItemId};
    use prism_math::Aabb;

    fn bound_at(x: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec3::new(x, 0.0, 0.0), Vec3::splat(0.5))
    }

    fn shape_scene(keys: &[ShapeKey]) -> (Scene, Vec<ItemBound>) {
        let mut scene = Scene::new();
        let mut bounds = Vec::new();
        for (i, &key) in keys.iter().enumerate() {
            let b = bound_at(i as f32);
            let id = scene.add_item(Item::shape(key, b, |_, _| {}));
            bounds.push(ItemBound::new(id, b));
        }
        (scene, bounds)
    }

    #[test]
    fn test_pipeline_sort_partitions_by_key() {
        let k1 = ShapeKey::MATERIAL;
        let k2 = ShapeKey::MATERIAL | ShapeKey::SKINNED;
        let (scene, items) = shape_scene(&[k1, k2, k1, k2, k1]);

        let mut groups = ShapeGroups::default();
        PipelineSortShapes.run(&scene, &items, &mut groups);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&k1].len(), 3);
        assert_eq!(groups[&k2].len(), 2);

        // Union of groups is exactly the input, each item once.
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, items.len());
    }

    #[test]
    fn test_pipeline_sort_preserves_order_within_group() {
        let k1 = ShapeKey::MATERIAL;
        let k2 = ShapeKey::WIREFRAME;
        let (scene, items) = shape_scene(&[k1, k2, k1, k1]);

        let mut groups = ShapeGroups::default();
        PipelineSortShapes.run(&scene, &items, &mut groups);

        let group_ids: Vec<ItemId> = groups[&k1].iter().map(|i| i.id).collect();
        assert_eq!(group_ids, vec![items[0].id, items[2].id, items[3].id]);
    }

    #[test]
    fn test_pipeline_sort_is_idempotent_and_discards_stale_groups() {
        let k1 = ShapeKey::MATERIAL;
        let (scene, items) = shape_scene(&[k1, k1]);

        let mut groups = ShapeGroups::default();
        // Pre-populate with a stale group that must not survive.
        groups.insert(ShapeKey::WIREFRAME, vec![items[0]]);

        PipelineSortShapes.run(&scene, &items, &mut groups);
        let first: Vec<ItemId> = groups[&k1].iter().map(|i| i.id).collect();
        assert_eq!(groups.len(), 1);

        PipelineSortShapes.run(&scene, &items, &mut groups);
        let second: Vec<ItemId> = groups[&k1].iter().map(|i| i.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pipeline_sort_skips_unknown_ids() {
        let k1 = ShapeKey::MATERIAL;
        let (scene, mut items) = shape_scene(&[k1]);

        // An id from a different scene, unknown to this one.
        let (_, foreign) = shape_scene(&[k1, k1]);
        items.push(foreign[1]);

        let mut groups = ShapeGroups::default();
        PipelineSortShapes.run(&scene, &items, &mut groups);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_depth_sort_front_to_back() {
        let items = [
            ItemBound::new(ItemId::new(0), bound_at(5.0)),
            ItemBound::new(ItemId::new(1), bound_at(1.0)),
            ItemBound::new(ItemId::new(2), bound_at(3.0)),
        ];

        let sorted = depth_sort_items(Vec3::ZERO, true, &items);
        let xs: Vec<f32> = sorted.iter().map(|i| i.bound.center().x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_depth_sort_back_to_front() {
        let items = [
            ItemBound::new(ItemId::new(0), bound_at(5.0)),
            ItemBound::new(ItemId::new(1), bound_at(1.0)),
            ItemBound::new(ItemId::new(2), bound_at(3.0)),
        ];

        let sorted = depth_sort_items(Vec3::ZERO, false, &items);
        let xs: Vec<f32> = sorted.iter().map(|i| i.bound.center().x).collect();
        assert_eq!(xs, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_depth_sort_is_stable_for_equal_distances() {
        // Mirror-image bounds: equal distance from the origin.
        let items = [
            ItemBound::new(ItemId::new(0), bound_at(2.0)),
            ItemBound::new(ItemId::new(1), bound_at(-2.0)),
            ItemBound::new(ItemId::new(2), bound_at(2.0)),
        ];

        let sorted = depth_sort_items(Vec3::ZERO, true, &items);
        let ids: Vec<u64> = sorted.iter().map(|i| i.id.raw()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_depth_sort_shapes_keeps_key_set_and_membership() {
        let k1 = ShapeKey::MATERIAL;
        let k2 = ShapeKey::MATERIAL | ShapeKey::TRANSLUCENT;
        let (scene, items) = shape_scene(&[k1, k2, k1, k2]);

        let mut groups = ShapeGroups::default();
        PipelineSortShapes.run(&scene, &items, &mut groups);

        let mut sorted = ShapeGroups::default();
        DepthSortShapes::new(true).run(Vec3::ZERO, &groups, &mut sorted);

        assert_eq!(sorted.len(), groups.len());
        for (key, in_group) in &groups {
            let out_group = &sorted[key];
            assert_eq!(out_group.len(), in_group.len());
            // Same membership: every input item appears in the output group.
            for item in in_group {
                assert!(out_group.iter().any(|o| o.id == item.id));
            }
        }
    }

    #[test]
    fn test_depth_sort_shapes_orders_each_group_independently() {
        let k1 = ShapeKey::MATERIAL;
        let mut scene = Scene::new();
        let mut items = Vec::new();
        for x in [9.0, 2.0, 7.0] {
            let b = bound_at(x);
            let id = scene.add_item(Item::shape(k1, b, |_, _| {}));
            items.push(ItemBound::new(id, b));
        }

        let mut groups = ShapeGroups::default();
        PipelineSortShapes.run(&scene, &items, &mut groups);

        let mut sorted = ShapeGroups::default();
        DepthSortShapes::new(true).run(Vec3::ZERO, &groups, &mut sorted);
        let xs: Vec<f32> = sorted[&k1].iter().map(|i| i.bound.center().x).collect();
        assert_eq!(xs, vec![2.0, 7.0, 9.0]);

        DepthSortShapes::new(false).run(Vec3::ZERO, &groups, &mut sorted);
        let xs: Vec<f32> = sorted[&k1].iter().map(|i| i.bound.center().x).collect();
        assert_eq!(xs, vec![9.0, 7.0, 2.0]);
    }

    #[test]
    fn test_empty_inputs_produce_empty_outputs() {
        let scene = Scene::new();
        let mut groups = ShapeGroups::default();
        PipelineSortShapes.run(&scene, &[], &mut groups);
        assert!(groups.is_empty());

        let mut sorted = ShapeGroups::default();
        DepthSortShapes::new(true).run(Vec3::ZERO, &groups, &mut sorted);
        assert!(sorted.is_empty());

        assert!(depth_sort_items(Vec3::ZERO, true, &[]).is_empty());
    }
}
