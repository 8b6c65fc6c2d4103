//! Opaque pipeline handles.
//!
//! A [`Pipeline`] names a fully compiled GPU pipeline owned by whatever
//! backend compiled it. Handles are cheap to clone and compare; this crate
//! never inspects what they point at.

use std::fmt;
use std::sync::Arc;

/// A cheap, cloneable handle to a compiled GPU pipeline.
///
/// Two handles are equal iff they were created with the same id. The label
/// exists for diagnostics only and does not participate in equality.
#[derive(Clone)]
pub struct Pipeline {
    id: u64,
    label: Arc<str>,
}

impl Pipeline {
    /// Create a handle with the given id and diagnostic label.
    pub fn new(id: u64, label: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// The backend-assigned pipeline id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Diagnostic label, e.g. the shader variant name.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Pipeline {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pipeline {}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipeline({}, {:?})", self.id, self.label)
    }
}
