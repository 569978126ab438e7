//! Graphics backend seam.

use super::{Batch, UiVertex};

/// Consumer of finished batches.
///
/// `vertices` and `indices` are the whole ring slot the batch lives in;
/// the batch's `first_index..first_index + index_count` range selects its
/// primitives.
pub trait RenderBackend {
    /// Starts submitting `frame`.
    fn begin_frame(&mut self, frame: u64);

    /// Draws one batch.
    fn draw_batch(&mut self, batch: &Batch, vertices: &[UiVertex], indices: &[u32]);

    /// Finishes submitting `frame`.
    fn end_frame(&mut self, frame: u64);

    /// Newest frame the GPU has finished reading, if any.
    fn completed_frame(&self) -> Option<u64>;
}
