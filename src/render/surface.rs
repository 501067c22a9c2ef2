use crate::assets::decode::DecodedImage;
use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Bounds, Canvas, Point};
use crate::foundation::error::AdResult;
use crate::template::model::TextAlign;

/// How an image is positioned on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImagePlacement {
    /// Draw at decoded size with the top-left corner at `origin`.
    Native {
        /// Top-left corner.
        origin: Point,
    },
    /// Scale the image to fill the box exactly.
    Stretched(Bounds),
}

impl ImagePlacement {
    /// Destination box for an image of the given decoded size.
    pub fn dest_bounds(self, image_width: u32, image_height: u32) -> Bounds {
        match self {
            ImagePlacement::Native { origin } => Bounds::new(
                origin.x,
                origin.y,
                f64::from(image_width),
                f64::from(image_height),
            ),
            ImagePlacement::Stretched(b) => b,
        }
    }
}

/// Vertical anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// Position is on the alphabetic baseline of the first line.
    #[default]
    Alphabetic,
    /// Position is at the vertical middle of the line box.
    Middle,
}

/// Style of one `fill_text` call.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Glyph color.
    pub color: Color,
    /// Font size in pixels.
    pub font_size: f64,
    /// Horizontal anchoring.
    pub align: TextAlign,
    /// Vertical anchoring.
    pub baseline: TextBaseline,
}

/// A raster target the draw pipeline paints into.
///
/// Calls are issued in paint order; later calls cover earlier ones. Implementations are free to
/// buffer work until [`Surface::flush`].
pub trait Surface {
    /// Pixel dimensions of the surface.
    fn canvas(&self) -> Canvas;

    /// Reset every pixel to transparent and drop any buffered work.
    fn clear(&mut self) -> AdResult<()>;

    /// Fill an axis-aligned box with a solid color.
    fn fill_rect(&mut self, bounds: Bounds, color: &Color) -> AdResult<()>;

    /// Fill a closed path with a solid color (non-zero winding).
    fn fill_path(&mut self, path: &BezPath, color: &Color) -> AdResult<()>;

    /// Paint a decoded image.
    fn draw_image(&mut self, image: &DecodedImage, placement: ImagePlacement) -> AdResult<()>;

    /// Advance width of `text` at `font_size`, trailing whitespace included.
    fn measure_text(&mut self, text: &str, font_size: f64) -> AdResult<f64>;

    /// Paint a single line of text anchored at `at`.
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> AdResult<()>;

    /// Commit buffered work to pixels.
    fn flush(&mut self) -> AdResult<()> {
        Ok(())
    }
}
