//! Shape keys and the pipeline table keyed by them.
//!
//! A [`ShapeKey`] compactly encodes a shape item's rendering requirements as
//! feature bits, plus two control bits: INVALID (no key could be resolved)
//! and OWN_PIPELINE (the item binds its own GPU state and must never be
//! looked up in the pipeline table). The feature bits are what the pipeline
//! sort stage groups by.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use thiserror::Error;

use prism_gpu::Pipeline;

bitflags! {
    /// Compact classification of a shape's rendering requirements.
    ///
    /// Equality, hashing, and ordering are all derived from the raw bits, so
    /// a key can serve directly as a grouping/mapping key.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ShapeKey: u16 {
        const MATERIAL = 1 << 0;
        const TRANSLUCENT = 1 << 1;
        const LIGHTMAP = 1 << 2;
        const TANGENTS = 1 << 3;
        const SKINNED = 1 << 4;
        const WIREFRAME = 1 << 5;

        /// The item binds its own pipeline; never looked up in the table.
        const OWN_PIPELINE = 1 << 14;
        /// No key could be resolved for the item.
        const INVALID = 1 << 15;
    }
}

impl ShapeKey {
    /// Whether a key was resolvable at all.
    pub fn is_valid(self) -> bool {
        !self.contains(Self::INVALID)
    }

    /// Whether the item manages its own GPU pipeline state.
    pub fn has_own_pipeline(self) -> bool {
        self.contains(Self::OWN_PIPELINE)
    }

    /// Start building a key from no features.
    pub fn builder() -> ShapeKeyBuilder {
        ShapeKeyBuilder { key: Self::empty() }
    }
}

/// Fluent builder for [`ShapeKey`]s.
#[derive(Clone, Copy, Debug)]
pub struct ShapeKeyBuilder {
    key: ShapeKey,
}

impl ShapeKeyBuilder {
    pub fn material(mut self) -> Self {
        self.key |= ShapeKey::MATERIAL;
        self
    }

    pub fn translucent(mut self) -> Self {
        self.key |= ShapeKey::TRANSLUCENT;
        self
    }

    pub fn lightmap(mut self) -> Self {
        self.key |= ShapeKey::LIGHTMAP;
        self
    }

    pub fn tangents(mut self) -> Self {
        self.key |= ShapeKey::TANGENTS;
        self
    }

    pub fn skinned(mut self) -> Self {
        self.key |= ShapeKey::SKINNED;
        self
    }

    pub fn wireframe(mut self) -> Self {
        self.key |= ShapeKey::WIREFRAME;
        self
    }

    pub fn own_pipeline(mut self) -> Self {
        self.key |= ShapeKey::OWN_PIPELINE;
        self
    }

    pub fn invalid(mut self) -> Self {
        self.key |= ShapeKey::INVALID;
        self
    }

    pub fn build(self) -> ShapeKey {
        self.key
    }
}

// ---------------------------------------------------------------------------
// Pipeline table
// ---------------------------------------------------------------------------

/// Errors returned when registering shape pipelines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapePipelineError {
    /// INVALID keys are never looked up, so registering one is a mistake.
    #[error("cannot register a pipeline for invalid shape key {0:?}")]
    InvalidKey(ShapeKey),

    /// OWN_PIPELINE keys bypass the table entirely.
    #[error("shape key {0:?} declares its own pipeline and bypasses the table")]
    OwnPipelineKey(ShapeKey),

    /// A pipeline is already registered under this key.
    #[error("a pipeline is already registered for shape key {0:?}")]
    DuplicateKey(ShapeKey),
}

/// Resolves a GPU pipeline for a shape key.
///
/// Resolution may fail for any reason (missing shader variant, resource
/// exhaustion); callers must treat `None` as "skip this item, keep going".
pub trait ShapePipelines {
    fn pick_pipeline(&self, key: ShapeKey) -> Option<Pipeline>;
}

/// A map-backed pipeline table with exact-key lookup.
#[derive(Debug, Default)]
pub struct ShapePipelineMap {
    pipelines: FxHashMap<ShapeKey, Pipeline>,
}

impl ShapePipelineMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pipeline for a key. Rejects INVALID and OWN_PIPELINE keys
    /// (they must never reach the table) and duplicate registrations.
    pub fn add_pipeline(
        &mut self,
        key: ShapeKey,
        pipeline: Pipeline,
    ) -> Result<(), ShapePipelineError> {
        if !key.is_valid() {
            return Err(ShapePipelineError::InvalidKey(key));
        }
        if key.has_own_pipeline() {
            return Err(ShapePipelineError::OwnPipelineKey(key));
        }
        if self.pipelines.contains_key(&key) {
            return Err(ShapePipelineError::DuplicateKey(key));
        }
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    /// Number of registered pipelines.
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl ShapePipelines for ShapePipelineMap {
    fn pick_pipeline(&self, key: ShapeKey) -> Option<Pipeline> {
        let found = self.pipelines.get(&key).cloned();
        if found.is_none() {
            log::debug!("no pipeline registered for shape key {key:?}");
        }
        found
    }
}
