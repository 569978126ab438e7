//! Per-frame partitioned vertex/index storage.
//!
//! The ring stands in for a GPU-visible buffer split into `N` slots. The
//! UI thread writes into the current slot; once a frame is submitted every
//! slot it touched is fenced with that frame's index and stays read-only
//! until the backend reports the frame complete.

use super::vertex::{UiVertex, QUAD_INDICES};

#[derive(Debug, Default)]
struct RingSlot {
    vertices: Vec<UiVertex>,
    indices: Vec<u32>,
    /// Frame whose submission still reads this slot.
    fence: Option<u64>,
    /// Written during the frame being recorded.
    in_use: bool,
}

/// Ring-allocated quad storage.
#[derive(Debug)]
pub struct FrameRing {
    slots: Vec<RingSlot>,
    quad_capacity: usize,
    current: Option<usize>,
    /// Last slot acquired; the next search starts after it.
    cursor: Option<usize>,
    completed: Option<u64>,
}

impl FrameRing {
    /// Creates `slot_count` slots of `quad_capacity` quads each.
    #[must_use]
    pub fn new(slot_count: usize, quad_capacity: usize) -> Self {
        let slot_count = slot_count.max(1);
        let quad_capacity = quad_capacity.max(1);
        let slots = (0..slot_count)
            .map(|_| RingSlot {
                vertices: Vec::with_capacity(quad_capacity * 4),
                indices: Vec::with_capacity(quad_capacity * 6),
                fence: None,
                in_use: false,
            })
            .collect();
        Self {
            slots,
            quad_capacity,
            current: None,
            cursor: None,
            completed: None,
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Quads each slot can hold.
    #[must_use]
    pub fn quad_capacity(&self) -> usize {
        self.quad_capacity
    }

    /// Slot currently being written, if one could be acquired.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Records that the backend finished every frame up to `frame`.
    pub fn retire(&mut self, completed: Option<u64>) {
        if completed > self.completed {
            self.completed = completed;
        }
        let done = self.completed;
        for slot in &mut self.slots {
            if slot.fence.is_some() && slot.fence <= done {
                slot.fence = None;
            }
        }
    }

    fn is_free(&self, index: usize) -> bool {
        let slot = &self.slots[index];
        slot.fence.is_none() && !slot.in_use
    }

    /// Starts recording a frame in the next free slot after the previous one.
    ///
    /// Returns `None` when every slot is still fenced.
    pub fn begin_frame(&mut self) -> Option<usize> {
        for slot in &mut self.slots {
            slot.in_use = false;
        }
        self.current = None;
        self.rotate()
    }

    /// Moves recording to another free slot within the same frame.
    pub fn rotate(&mut self) -> Option<usize> {
        let count = self.slots.len();
        let start = self.cursor.map_or(0, |c| c + 1);
        let next = (0..count).map(|k| (start + k) % count).find(|&i| self.is_free(i));
        if let Some(index) = next {
            let slot = &mut self.slots[index];
            slot.vertices.clear();
            slot.indices.clear();
            slot.in_use = true;
            self.current = Some(index);
            self.cursor = Some(index);
        } else {
            self.current = None;
        }
        self.current
    }

    /// Returns true if the current slot can take `quads` more quads.
    #[must_use]
    pub fn has_room(&self, quads: usize) -> bool {
        self.current.is_some_and(|c| {
            self.slots[c].vertices.len() / 4 + quads <= self.quad_capacity
        })
    }

    /// Writes one quad into the current slot.
    ///
    /// Returns the index offset of its six indices, or `None` when there is
    /// no slot or no room.
    pub fn push_quad(&mut self, vertices: [UiVertex; 4]) -> Option<u32> {
        if !self.has_room(1) {
            return None;
        }
        let slot = &mut self.slots[self.current?];
        let base = slot.vertices.len() as u32;
        let first_index = slot.indices.len() as u32;
        slot.vertices.extend_from_slice(&vertices);
        slot.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        Some(first_index)
    }

    /// Index count written so far into the current slot.
    #[must_use]
    pub fn index_cursor(&self) -> u32 {
        self.current.map_or(0, |c| self.slots[c].indices.len() as u32)
    }

    /// Vertex and index data of a slot.
    #[must_use]
    pub fn slot_data(&self, index: usize) -> (&[UiVertex], &[u32]) {
        self.slots
            .get(index)
            .map_or((&[][..], &[][..]), |s| (s.vertices.as_slice(), s.indices.as_slice()))
    }

    /// Fences every slot written this frame with `frame`.
    pub fn submit(&mut self, frame: u64) {
        for slot in &mut self.slots {
            if slot.in_use {
                slot.fence = Some(frame);
                slot.in_use = false;
            }
        }
        self.current = None;
    }

    /// Returns true if `index` is fenced by a frame the backend still reads.
    #[must_use]
    pub fn is_fenced(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.fence.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> [UiVertex; 4] {
        [UiVertex::default(); 4]
    }

    #[test]
    fn test_slots_advance_per_frame() {
        let mut ring = FrameRing::new(3, 4);
        assert_eq!(ring.begin_frame(), Some(0));
        ring.submit(1);
        ring.retire(Some(1));
        assert_eq!(ring.begin_frame(), Some(1));
        ring.submit(2);
        assert_eq!(ring.begin_frame(), Some(2));
        ring.submit(3);
        ring.retire(Some(3));
        assert_eq!(ring.begin_frame(), Some(0));
    }

    #[test]
    fn test_fenced_slot_is_not_reused() {
        let mut ring = FrameRing::new(2, 4);
        ring.begin_frame();
        ring.submit(1);
        ring.begin_frame();
        ring.submit(2);

        // Nothing completed yet: both slots are fenced.
        assert_eq!(ring.begin_frame(), None);
        assert!(ring.push_quad(quad()).is_none());

        ring.retire(Some(1));
        assert_eq!(ring.begin_frame(), Some(0));
        assert!(ring.is_fenced(1));
    }

    #[test]
    fn test_capacity_and_rotation() {
        let mut ring = FrameRing::new(2, 2);
        ring.begin_frame();
        assert_eq!(ring.push_quad(quad()), Some(0));
        assert_eq!(ring.push_quad(quad()), Some(6));
        assert!(ring.push_quad(quad()).is_none());

        assert_eq!(ring.rotate(), Some(1));
        assert_eq!(ring.push_quad(quad()), Some(0));
        assert_eq!(ring.rotate(), None);
    }

    #[test]
    fn test_indices_are_offset_by_vertex_base() {
        let mut ring = FrameRing::new(1, 4);
        ring.begin_frame();
        ring.push_quad(quad());
        ring.push_quad(quad());
        let (vertices, indices) = ring.slot_data(0);
        assert_eq!(vertices.len(), 8);
        assert_eq!(&indices[6..], &[4, 5, 6, 4, 6, 7]);
    }
}
