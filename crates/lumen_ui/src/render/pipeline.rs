//! Pipeline state cache.
//!
//! Backends compile one pipeline per distinct [`PipelineKey`]. The cache
//! hands out stable ids so batches can be compared and submitted without
//! touching descriptors. Creation is idempotent and serialized by a mutex
//! so asset-setup threads may warm it concurrently.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::BlendMode;

/// Shader family of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Solid color quads.
    Colored,
    /// Quads sampling bound textures.
    Textured,
    /// Glyph quads sampling a font atlas.
    Text,
}

/// Everything a pipeline is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    /// Shader family.
    pub kind: PipelineKind,
    /// Blend state.
    pub blend: BlendMode,
    /// Depth test state.
    pub depth_test: bool,
}

/// Stable handle of a cached pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub u32);

/// Descriptor-keyed pipeline cache.
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: Mutex<HashMap<PipelineKey, PipelineId>>,
}

impl PipelineCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `key`, creating it on first use.
    pub fn get_or_create(&self, key: PipelineKey) -> PipelineId {
        let mut entries = self.entries.lock();
        let next = PipelineId(entries.len() as u32);
        *entries.entry(key).or_insert_with(|| {
            tracing::trace!(?key, id = next.0, "pipeline created");
            next
        })
    }

    /// Returns the id for `key` if it was created already.
    #[must_use]
    pub fn get(&self, key: &PipelineKey) -> Option<PipelineId> {
        self.entries.lock().get(key).copied()
    }

    /// Number of distinct pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
