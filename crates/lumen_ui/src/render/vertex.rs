//! GPU vertex layout.

use crate::geometry::Vec2;
use crate::style::Color;

/// Vertex for UI rendering.
///
/// 24 bytes, no padding. `color` is RGBA bytes, converted from the
/// in-memory ARGB at emission.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UiVertex {
    /// Screen position (x, y).
    pub position: [f32; 2],
    /// UV coordinates.
    pub uv: [f32; 2],
    /// Color (RGBA bytes).
    pub color: [u8; 4],
    /// Index into the batch's texture bindings.
    pub tex_index: u32,
}

impl UiVertex {
    /// Creates a new vertex.
    #[must_use]
    pub fn new(position: Vec2, uv: Vec2, color: Color, tex_index: u32) -> Self {
        Self {
            position: [position.x, position.y],
            uv: [uv.x, uv.y],
            color: color.to_rgba8(),
            tex_index,
        }
    }

    /// Four vertices for a quad with corners in TL, TR, BR, BL order.
    #[must_use]
    pub fn quad(corners: [Vec2; 4], uv_min: Vec2, uv_max: Vec2, color: Color, tex_index: u32) -> [Self; 4] {
        let uvs = [
            uv_min,
            Vec2::new(uv_max.x, uv_min.y),
            uv_max,
            Vec2::new(uv_min.x, uv_max.y),
        ];
        let mut out = [Self::default(); 4];
        for (slot, (corner, uv)) in out.iter_mut().zip(corners.into_iter().zip(uvs)) {
            *slot = Self::new(corner, uv, color, tex_index);
        }
        out
    }
}

/// Index pattern of one quad relative to its first vertex.
pub(crate) const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];
