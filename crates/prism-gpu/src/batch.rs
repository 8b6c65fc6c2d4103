//! Draw command recording.
//!
//! A [`Batch`] is an append-only list of [`Command`]s recorded during one
//! submission scope. Callers only ever see a `&mut Batch` inside
//! [`GpuContext::do_in_batch`](crate::context::GpuContext::do_in_batch), so a
//! batch cannot outlive the scope that opened it.

use crate::pipeline::Pipeline;

/// A single recorded GPU command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Bind the given pipeline for subsequent draws.
    SetPipeline(Pipeline),
    /// Issue a draw with the currently bound pipeline.
    Draw {
        vertex_count: u32,
        instance_count: u32,
    },
}

/// An ordered list of commands recorded within one batch scope.
#[derive(Debug, Default)]
pub struct Batch {
    label: Option<&'static str>,
    commands: Vec<Command>,
}

impl Batch {
    /// Create a new empty batch.
    pub fn new(label: Option<&'static str>) -> Self {
        Self {
            label,
            commands: Vec::new(),
        }
    }

    /// Create a batch with preallocated command capacity.
    pub fn with_capacity(label: Option<&'static str>, capacity: usize) -> Self {
        Self {
            label,
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Debug label for this batch, if any.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Record a pipeline bind.
    pub fn set_pipeline(&mut self, pipeline: &Pipeline) {
        self.commands.push(Command::SetPipeline(pipeline.clone()));
    }

    /// Record a draw call.
    pub fn draw(&mut self, vertex_count: u32, instance_count: u32) {
        self.commands.push(Command::Draw {
            vertex_count,
            instance_count,
        });
    }

    /// The commands recorded so far, in recording order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count of draw commands (excluding state changes).
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. }))
            .count()
    }

    /// Clear recorded commands, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_batch_is_empty() {
        let batch = Batch::new(Some("frame"));
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
        assert_eq!(batch.label(), Some("frame"));
    }

    #[test]
    fn test_commands_preserve_recording_order() {
        let mut batch = Batch::new(None);
        let p = Pipeline::new(1, "lit");
        batch.set_pipeline(&p);
        batch.draw(36, 1);
        batch.draw(6, 4);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.commands()[0], Command::SetPipeline(p));
        assert_eq!(
            batch.commands()[1],
            Command::Draw {
                vertex_count: 36,
                instance_count: 1
            }
        );
        assert_eq!(
            batch.commands()[2],
            Command::Draw {
                vertex_count: 6,
                instance_count: 4
            }
        );
    }

    #[test]
    fn test_draw_count_ignores_state_changes() {
        let mut batch = Batch::new(None);
        batch.set_pipeline(&Pipeline::new(1, "a"));
        batch.draw(3, 1);
        batch.set_pipeline(&Pipeline::new(2, "b"));
        batch.draw(3, 1);
        assert_eq!(batch.draw_count(), 2);
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_clear_resets_batch() {
        let mut batch = Batch::new(None);
        batch.draw(3, 1);
        batch.clear();
        assert!(batch.is_empty());
    }
}
