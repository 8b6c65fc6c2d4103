//! Shared geometric value types for the Prism draw pipeline.

pub mod aabb;

pub use aabb::Aabb;
