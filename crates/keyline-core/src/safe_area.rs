#![forbid(unsafe_code)]

//! Safe-area adjustment for keyboard heights.
//!
//! On devices with a bottom inset (home indicator), content docked to the
//! safe-area bottom already sits that far above the screen edge. Lifting it
//! by the full keyboard height would leave a gap, so the inset is subtracted.

use crate::geometry::EdgeInsets;

/// Safe-area insets of the window a screen is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SafeArea {
    insets: EdgeInsets,
}

impl SafeArea {
    #[must_use]
    pub const fn new(insets: EdgeInsets) -> Self {
        Self { insets }
    }

    /// Safe area with only a bottom inset.
    #[must_use]
    pub const fn with_bottom(bottom: f64) -> Self {
        Self::new(EdgeInsets::bottom(bottom))
    }

    #[must_use]
    pub const fn insets(&self) -> EdgeInsets {
        self.insets
    }

    /// True when the window reserves space at the bottom edge.
    #[must_use]
    pub fn has_notch(&self) -> bool {
        self.insets.bottom > 0.0
    }

    /// Distance to lift bottom-docked content for a keyboard of `height`.
    ///
    /// Clamped at zero; non-finite heights yield zero.
    #[must_use]
    pub fn keyboard_lift(&self, height: f64) -> f64 {
        if !height.is_finite() {
            return 0.0;
        }
        let lift = if self.has_notch() {
            height - self.insets.bottom
        } else {
            height
        };
        lift.max(0.0)
    }
}
