//! Renderable items and the value-type references the stages pass around.
//!
//! An [`Item`] is owned exclusively by the [`Scene`](crate::scene::Scene);
//! the stages only ever read it by id. What travels between stages is the
//! [`ItemBound`] value: an id plus its precomputed bound, freely copyable.

use std::fmt;

use bitflags::bitflags;
use prism_gpu::Batch;
use prism_math::Aabb;

use crate::args::RenderArgs;
use crate::shape::ShapeKey;

/// Opaque item identifier, unique within one scene's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value, for diagnostics.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

bitflags! {
    /// Classification of an item: which draw paths handle it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemKey: u8 {
        /// Drawn through the shape path (pipeline lookup by shape key).
        const SHAPE = 1 << 0;
        /// Drawn through the light path.
        const LIGHT = 1 << 1;
        /// Requires back-to-front ordering for correct blending.
        const TRANSLUCENT = 1 << 2;
    }
}

impl ItemKey {
    pub fn is_shape(self) -> bool {
        self.contains(Self::SHAPE)
    }

    pub fn is_light(self) -> bool {
        self.contains(Self::LIGHT)
    }

    pub fn is_translucent(self) -> bool {
        self.contains(Self::TRANSLUCENT)
    }
}

/// An item id paired with its precomputed bound.
///
/// This is the currency of the pipeline stages: culling, sorting, and
/// submission all consume and produce sequences of these. It is a plain
/// value, not an owning reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemBound {
    pub id: ItemId,
    pub bound: Aabb,
}

impl ItemBound {
    pub fn new(id: ItemId, bound: Aabb) -> Self {
        Self { id, bound }
    }
}

/// The item's draw routine. Invoked by the submission stage with the frame's
/// render args and the batch currently in scope; it records whatever commands
/// the item needs.
pub type DrawFn = Box<dyn Fn(&mut RenderArgs, &mut Batch) + Send + Sync>;

/// A renderable entity held by the scene.
pub struct Item {
    key: ItemKey,
    shape_key: ShapeKey,
    bound: Aabb,
    draw: DrawFn,
}

impl Item {
    /// Create an item with an explicit classification.
    pub fn new(
        key: ItemKey,
        shape_key: ShapeKey,
        bound: Aabb,
        draw: impl Fn(&mut RenderArgs, &mut Batch) + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            shape_key,
            bound,
            draw: Box::new(draw),
        }
    }

    /// Create a shape-category item. The item is additionally classified
    /// translucent when its shape key carries the TRANSLUCENT feature.
    pub fn shape(
        shape_key: ShapeKey,
        bound: Aabb,
        draw: impl Fn(&mut RenderArgs, &mut Batch) + Send + Sync + 'static,
    ) -> Self {
        let mut key = ItemKey::SHAPE;
        if shape_key.contains(ShapeKey::TRANSLUCENT) {
            key |= ItemKey::TRANSLUCENT;
        }
        Self::new(key, shape_key, bound, draw)
    }

    /// Create a light-category item. Lights carry no resolvable shape key.
    pub fn light(
        bound: Aabb,
        draw: impl Fn(&mut RenderArgs, &mut Batch) + Send + Sync + 'static,
    ) -> Self {
        Self::new(ItemKey::LIGHT, ShapeKey::INVALID, bound, draw)
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn shape_key(&self) -> ShapeKey {
        self.shape_key
    }

    pub fn bound(&self) -> Aabb {
        self.bound
    }

    /// Invoke the item's draw routine.
    pub fn render(&self, args: &mut RenderArgs, batch: &mut Batch) {
        (self.draw)(args, batch);
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("key", &self.key)
            .field("shape_key", &self.shape_key)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
