//! Batch submission context.
//!
//! [`GpuContext::do_in_batch`] is the only way to obtain a batch: it opens a
//! scope, lends the recorder to a closure, and submits the finished batch to
//! the [`BatchBackend`] when the closure returns. The closure never owns the
//! batch, so it cannot retain it past the scope.

use std::sync::{Arc, Mutex};

use crate::batch::Batch;

/// Executes finished batches. Implementations may replay commands on a real
/// device, queue them for a render thread, or just record them for tests.
pub trait BatchBackend {
    /// Consume a finished batch. Called exactly once per batch scope.
    fn execute(&mut self, batch: Batch);
}

/// Entry point for recording work against a backend.
pub struct GpuContext {
    backend: Box<dyn BatchBackend>,
    batches_submitted: u64,
}

impl GpuContext {
    /// Create a context that submits to the given backend.
    pub fn new(backend: Box<dyn BatchBackend>) -> Self {
        Self {
            backend,
            batches_submitted: 0,
        }
    }

    /// Open a batch scope: run `record` with a fresh batch, then submit the
    /// batch to the backend. Submission happens on every normal exit path,
    /// including when the closure records nothing.
    pub fn do_in_batch<F>(&mut self, label: Option<&'static str>, record: F)
    where
        F: FnOnce(&mut Batch),
    {
        let mut batch = Batch::new(label);
        record(&mut batch);
        self.batches_submitted += 1;
        self.backend.execute(batch);
    }

    /// Total number of batches submitted since creation.
    pub fn batches_submitted(&self) -> u64 {
        self.batches_submitted
    }
}

/// Backend that discards every batch. Useful when only the recording-side
/// counters matter.
#[derive(Debug, Default)]
pub struct NullBackend;

impl BatchBackend for NullBackend {
    fn execute(&mut self, _batch: Batch) {}
}

/// Backend that retains every executed batch for later inspection.
///
/// Clone the shared handle with [`RecordingBackend::batches`] before moving
/// the backend into a [`GpuContext`].
#[derive(Debug, Default)]
pub struct RecordingBackend {
    batches: Arc<Mutex<Vec<Batch>>>,
}

impl RecordingBackend {
    /// Create an empty recording backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the executed batches.
    pub fn batches(&self) -> Arc<Mutex<Vec<Batch>>> {
        Arc::clone(&self.batches)
    }
}

impl BatchBackend for RecordingBackend {
    fn execute(&mut self, batch: Batch) {
        match self.batches.lock() {
            Ok(mut batches) => batches.push(batch),
            Err(poisoned) => {
                log::warn!("recording backend mutex poisoned; dropping batch");
                drop(poisoned);
            }
        }
    }
}
