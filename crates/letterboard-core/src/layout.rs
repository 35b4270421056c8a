//! Turning submitted text into glyphs.

use crate::config::LayoutConfig;
use crate::glyph::Glyph;
use kurbo::{Point, Size};

/// Measures rendered characters.
pub trait GlyphMetrics {
    /// Size of the box a single character occupies once rendered.
    fn measure(&self, ch: char) -> Size;
}

/// Fixed-size metrics, every character gets the same box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub size: Size,
}

impl MonospaceMetrics {
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl From<&LayoutConfig> for MonospaceMetrics {
    fn from(config: &LayoutConfig) -> Self {
        Self::new(config.glyph_size())
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn measure(&self, _ch: char) -> Size {
        self.size
    }
}

/// Where a fresh batch of glyphs is stacked: horizontally centered in the
/// viewport at the configured `top`.
pub fn batch_origin(viewport: Size, config: &LayoutConfig) -> Point {
    Point::new(viewport.width / 2.0, config.top)
}

/// One glyph per non-whitespace character, all stacked at `origin`.
///
/// The batch overlaps itself completely; collision correction is what
/// spreads it out into a row.
pub fn layout_text(text: &str, metrics: &dyn GlyphMetrics, origin: Point) -> Vec<Glyph> {
    text.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| Glyph::new(ch, origin, metrics.measure(ch)))
        .collect()
}
