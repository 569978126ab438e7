//! Scoped scissor acquisition.

use std::ops::{Deref, DerefMut};

use super::BatchRecorder;
use crate::geometry::Rect;

/// Pushes a scissor rectangle on creation and pops it on drop.
///
/// The pop runs on every exit path out of the clipped subtree, unwinding
/// included.
pub struct ScissorGuard<'a, R: BatchRecorder + ?Sized> {
    recorder: &'a mut R,
}

impl<'a, R: BatchRecorder + ?Sized> ScissorGuard<'a, R> {
    /// Pushes `rect` on `recorder`.
    pub fn push(recorder: &'a mut R, rect: Rect) -> Self {
        recorder.push_scissor_rect(rect);
        Self { recorder }
    }
}

impl<R: BatchRecorder + ?Sized> Deref for ScissorGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.recorder
    }
}

impl<R: BatchRecorder + ?Sized> DerefMut for ScissorGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.recorder
    }
}

impl<R: BatchRecorder + ?Sized> Drop for ScissorGuard<'_, R> {
    fn drop(&mut self) {
        self.recorder.pop_scissor_rect();
    }
}
