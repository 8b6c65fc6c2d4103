//! Read-side scene store: items by id plus the master classification bucket.
//!
//! The pipeline stages treat the scene as read-only; Rust enforces that
//! contract directly, since every stage borrows `&Scene` for the duration of
//! the pass. Insertion happens between frames.

use rustc_hash::FxHashMap;

use crate::item::{Item, ItemBound, ItemId, ItemKey};

// ---------------------------------------------------------------------------
// ItemFilter
// ---------------------------------------------------------------------------

/// A classification filter over [`ItemKey`] bits.
///
/// An item matches when it carries every `must_have` bit and none of the
/// `must_not` bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemFilter {
    must_have: ItemKey,
    must_not: ItemKey,
}

impl ItemFilter {
    /// Filter matching any key with every `must_have` bit and no `must_not` bit.
    pub fn new(must_have: ItemKey, must_not: ItemKey) -> Self {
        Self {
            must_have,
            must_not,
        }
    }

    /// All light items.
    pub fn light() -> Self {
        Self::new(ItemKey::LIGHT, ItemKey::empty())
    }

    /// Shape items without translucency.
    pub fn opaque_shape() -> Self {
        Self::new(ItemKey::SHAPE, ItemKey::TRANSLUCENT)
    }

    /// Shape items with translucency.
    pub fn transparent_shape() -> Self {
        Self::new(ItemKey::SHAPE | ItemKey::TRANSLUCENT, ItemKey::empty())
    }

    /// Whether a key matches this filter.
    pub fn test(&self, key: ItemKey) -> bool {
        key.contains(self.must_have) && (key & self.must_not).is_empty()
    }
}

// ---------------------------------------------------------------------------
// MasterBucket
// ---------------------------------------------------------------------------

/// Classification index: for each registered filter, the ids of matching
/// items in insertion order.
#[derive(Debug, Default)]
pub struct MasterBucket {
    buckets: FxHashMap<ItemFilter, Vec<ItemId>>,
}

impl MasterBucket {
    fn with_filters(filters: impl IntoIterator<Item = ItemFilter>) -> Self {
        Self {
            buckets: filters.into_iter().map(|f| (f, Vec::new())).collect(),
        }
    }

    fn insert(&mut self, id: ItemId, key: ItemKey) {
        for (filter, ids) in &mut self.buckets {
            if filter.test(key) {
                ids.push(id);
            }
        }
    }

    /// Ids matching the given filter, in insertion order. Returns an empty
    /// slice for filters that were never registered.
    pub fn at(&self, filter: &ItemFilter) -> &[ItemId] {
        self.buckets.get(filter).map_or(&[], Vec::as_slice)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Exclusive owner of items; hands out read-only views by id.
pub struct Scene {
    items: FxHashMap<ItemId, Item>,
    master_bucket: MasterBucket,
    next_id: u64,
}

impl Scene {
    /// Create a scene with the standard classification filters registered:
    /// lights, opaque shapes, transparent shapes.
    pub fn new() -> Self {
        Self {
            items: FxHashMap::default(),
            master_bucket: MasterBucket::with_filters([
                ItemFilter::light(),
                ItemFilter::opaque_shape(),
                ItemFilter::transparent_shape(),
            ]),
            next_id: 0,
        }
    }

    /// Insert an item, assign it a fresh id, and classify it into the master
    /// bucket. Ids are never reused within this scene's lifetime.
    pub fn add_item(&mut self, item: Item) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        self.master_bucket.insert(id, item.key());
        self.items.insert(id, item);
        id
    }

    /// Read an item by id.
    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// The classification index.
    pub fn master_bucket(&self) -> &MasterBucket {
        &self.master_bucket
    }

    /// Wrap every item matching `filter` as an [`ItemBound`], in bucket
    /// (insertion) order.
    pub fn item_bounds(&self, filter: &ItemFilter) -> Vec<ItemBound> {
        let ids = self.master_bucket.at(filter);
        let mut bounds = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(item) = self.items.get(&id) else {
                log::warn!("{id} is in the master bucket but missing from the store");
                continue;
            };
            bounds.push(ItemBound::new(id, item.bound()));
        }
        bounds
    }

    /// Number of items in the store.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKey;
    use glam::Vec3;
    use prism_math::Aabb;

    fn bound(x: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec3::new(x, 0.0, 0.0), Vec3::splat(0.5))
    }

    #[test]
    fn test_filter_matching() {
        let opaque = ItemFilter::opaque_shape();
        assert!(opaque.test(ItemKey::SHAPE));
        assert!(!opaque.test(ItemKey::SHAPE | ItemKey::TRANSLUCENT));
        assert!(!opaque.test(ItemKey::LIGHT));

        let transparent = ItemFilter::transparent_shape();
        assert!(transparent.test(ItemKey::SHAPE | ItemKey::TRANSLUCENT));
        assert!(!transparent.test(ItemKey::SHAPE));

        assert!(ItemFilter::light().test(ItemKey::LIGHT));
    }

    #[test]
    fn test_items_are_classified_on_insert() {
        let mut scene = Scene::new();
        let light = scene.add_item(Item::light(bound(0.0), |_, _| {}));
        let opaque = scene.add_item(Item::shape(ShapeKey::MATERIAL, bound(1.0), |_, _| {}));
        let translucent = scene.add_item(Item::shape(
            ShapeKey::MATERIAL | ShapeKey::TRANSLUCENT,
            bound(2.0),
            |_, _| {},
        ));

        assert_eq!(scene.master_bucket().at(&ItemFilter::light()), &[light]);
        assert_eq!(
            scene.master_bucket().at(&ItemFilter::opaque_shape()),
            &[opaque]
        );
        assert_eq!(
            scene.master_bucket().at(&ItemFilter::transparent_shape()),
            &[translucent]
        );
    }

    #[test]
    fn test_bucket_preserves_insertion_order() {
        let mut scene = Scene::new();
        let a = scene.add_item(Item::shape(ShapeKey::MATERIAL, bound(0.0), |_, _| {}));
        let b = scene.add_item(Item::shape(ShapeKey::MATERIAL, bound(1.0), |_, _| {}));
        let c = scene.add_item(Item::shape(ShapeKey::MATERIAL, bound(2.0), |_, _| {}));

        assert_eq!(
            scene.master_bucket().at(&ItemFilter::opaque_shape()),
            &[a, b, c]
        );
    }

    #[test]
    fn test_unregistered_filter_yields_empty_slice() {
        let scene = Scene::new();
        let custom = ItemFilter::new(ItemKey::TRANSLUCENT, ItemKey::empty());
        assert!(scene.master_bucket().at(&custom).is_empty());
    }

    #[test]
    fn test_item_bounds_carries_the_items_bounds() {
        let mut scene = Scene::new();
        let a = scene.add_item(Item::light(bound(0.0), |_, _| {}));
        let b = scene.add_item(Item::light(bound(5.0), |_, _| {}));

        let bounds = scene.item_bounds(&ItemFilter::light());
        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[0].id, a);
        assert_eq!(bounds[0].bound, bound(0.0));
        assert_eq!(bounds[1].id, b);
        assert_eq!(bounds[1].bound, bound(5.0));
    }

    #[test]
    fn test_get_item_unknown_id_is_none() {
        let mut scene = Scene::new();
        let id = scene.add_item(Item::light(bound(0.0), |_, _| {}));
        assert!(scene.get_item(id).is_some());

        let mut other = Scene::new();
        other.add_item(Item::light(bound(0.0), |_, _| {}));
        other.add_item(Item::light(bound(1.0), |_, _| {}));
        let foreign = *other.master_bucket().at(&ItemFilter::light()).last().unwrap();
        assert!(scene.get_item(foreign).is_none());
    }
}
