#![forbid(unsafe_code)]

//! Floating-point geometry in host points.
//!
//! Keyboard frames arrive from the host in screen coordinates with a
//! top-left origin. All values are `f64`; a rectangle is only ever built
//! from finite components when parsed from a payload.

use std::fmt;

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// The zero rectangle, used wherever a frame is missing or unreadable.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from an origin and a size.
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bottom edge (`y + height`).
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge (`x + width`).
    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// True when the rectangle has no area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when every component is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Parse the host's string form of a rectangle: `{{x, y}, {w, h}}`.
    ///
    /// Whitespace around numbers is ignored. Returns `None` for anything that
    /// does not have exactly four finite numbers in that shape.
    #[must_use]
    pub fn parse_host(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?.trim();
        let (origin, size) = split_pair(inner)?;
        let (x, y) = parse_pair(origin)?;
        let (width, height) = parse_pair(size)?;
        let rect = Self::new(x, y, width, height);
        rect.is_finite().then_some(rect)
    }
}

impl fmt::Display for Rect {
    /// Writes the host string form, so `parse_host(to_string())` holds.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{{{}, {}}}, {{{}, {}}}}}",
            self.x, self.y, self.width, self.height
        )
    }
}

// "{a, b}, {c, d}" -> ("{a, b}", "{c, d}")
fn split_pair(text: &str) -> Option<(&str, &str)> {
    let close = text.find('}')?;
    let (first, rest) = text.split_at(close + 1);
    let second = rest.trim_start().strip_prefix(',')?.trim();
    Some((first.trim(), second))
}

fn parse_pair(text: &str) -> Option<(f64, f64)> {
    let body = text.strip_prefix('{')?.strip_suffix('}')?;
    let mut parts = body.split(',');
    let a = parts.next()?.trim().parse::<f64>().ok()?;
    let b = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b))
}

/// Insets from each edge of a window (safe-area margins).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create insets in top, left, bottom, right order.
    #[must_use]
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Insets with only a bottom margin.
    #[must_use]
    pub const fn bottom(bottom: f64) -> Self {
        Self::new(0.0, 0.0, bottom, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_rect_is_empty() {
        assert_eq!(Rect::default(), Rect::ZERO);
        assert!(Rect::ZERO.is_empty());
    }

    #[test]
    fn edges() {
        let r = Rect::new(0.0, 500.0, 320.0, 216.0);
        assert_eq!(r.max_y(), 716.0);
        assert_eq!(r.max_x(), 320.0);
        assert_eq!(r.origin(), Point::new(0.0, 500.0));
        assert_eq!(r.size(), Size::new(320.0, 216.0));
        assert_eq!(Rect::from_origin_size(r.origin(), r.size()), r);
    }

    #[test]
    fn edge_insets_constructors() {
        assert_eq!(EdgeInsets::default(), EdgeInsets::ZERO);
        assert_eq!(EdgeInsets::bottom(34.0), EdgeInsets::new(0.0, 0.0, 34.0, 0.0));
    }

    #[test]
    fn parse_host_form() {
        assert_eq!(
            Rect::parse_host("{{0, 500}, {320, 216}}"),
            Some(Rect::new(0.0, 500.0, 320.0, 216.0))
        );
        assert_eq!(
            Rect::parse_host("  {{0.5,-2},{10.25, 3}} "),
            Some(Rect::new(0.5, -2.0, 10.25, 3.0))
        );
    }

    #[test]
    fn parse_host_rejects_garbage() {
        for bad in [
            "",
            "{}",
            "{{0, 0}}",
            "{{0, 0}, {1}}",
            "{{0, 0, 0}, {1, 1}}",
            "{{a, 0}, {1, 1}}",
            "{{0, 0}, {1, 1}",
            "{{0, 0}; {1, 1}}",
            "{{NaN, 0}, {1, 1}}",
            "{{inf, 0}, {1, 1}}",
        ] {
            assert_eq!(Rect::parse_host(bad), None, "input: {bad:?}");
        }
    }

    #[test]
    fn display_uses_host_form() {
        let r = Rect::new(0.0, 500.0, 320.0, 216.0);
        assert_eq!(r.to_string(), "{{0, 500}, {320, 216}}");
    }

    proptest! {
        #[test]
        fn parse_host_never_panics(s in ".*") {
            let _ = Rect::parse_host(&s);
        }

        #[test]
        fn display_parses_back(
            x in -1.0e6f64..1.0e6,
            y in -1.0e6f64..1.0e6,
            w in 0.0f64..1.0e6,
            h in 0.0f64..1.0e6,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert_eq!(Rect::parse_host(&r.to_string()), Some(r));
        }
    }
}
