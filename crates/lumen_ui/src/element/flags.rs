//! Element state bits.

/// Element state flags (bitfield for efficiency).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementFlags(u32);

impl ElementFlags {
    /// Element is visible.
    pub const VISIBLE: u32 = 1 << 0;
    /// Element is enabled (can receive input).
    pub const ENABLED: u32 = 1 << 1;
    /// Pointer is over the element.
    pub const HOVERED: u32 = 1 << 2;
    /// Left button went down on the element and has not been released.
    pub const PRESSED: u32 = 1 << 3;
    /// Layout inputs changed since the last layout pass.
    pub const DIRTY_LAYOUT: u32 = 1 << 4;
    /// Appearance or transform changed since the last render pass.
    pub const DIRTY_RENDER: u32 = 1 << 5;

    /// Flags of a freshly created element.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::ENABLED | Self::DIRTY_LAYOUT | Self::DIRTY_RENDER);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}
