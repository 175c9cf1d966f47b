//! Visual-line geometry produced by a measurement service.

use std::ops::Range;

/// One rendered (possibly wrapped) row of text.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualFragment {
    /// Char range of the buffer covered by this row, including a trailing
    /// line break when the row ends a logical line.
    pub chars: Range<usize>,
    /// Rendered row height in points.
    pub height: f32,
}

impl VisualFragment {
    /// Creates a fragment covering `chars` with the given height.
    pub fn new(chars: Range<usize>, height: f32) -> Self {
        Self { chars, height }
    }
}

/// Width available to the text container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum WrapWidth {
    /// Lines never wrap.
    #[default]
    Unbounded,
    /// Lines wrap at this width in points.
    Fixed(f32),
}

impl WrapWidth {
    /// Builds a wrap width from a raw container width; non-finite widths do
    /// not wrap.
    pub fn from_points(width: f32) -> Self {
        if width.is_finite() {
            Self::Fixed(width.max(0.0))
        } else {
            Self::Unbounded
        }
    }

    /// Width in points, `f32::INFINITY` when unbounded.
    pub fn as_points(self) -> f32 {
        match self {
            Self::Unbounded => f32::INFINITY,
            Self::Fixed(width) => width,
        }
    }
}

/// Lays out text and reports visual rows in reading order.
///
/// Implementations must yield fragments in increasing char order whose
/// ranges partition the laid-out text. A trailing empty line may be left
/// without a fragment; the height reconciler pads it.
pub trait MeasurementService {
    /// Lays out `text` at `width` and yields its visual rows.
    fn layout<'a>(
        &'a self,
        text: &'a str,
        width: WrapWidth,
    ) -> impl Iterator<Item = VisualFragment> + 'a;

    /// Height of an empty line in the editor font.
    fn default_line_height(&self) -> f32;
}
