use kurbo::Shape;

use crate::assets::decode::DecodedImage;
use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Bounds, Canvas, Point};
use crate::foundation::error::AdResult;
use crate::render::surface::{ImagePlacement, Surface, TextStyle};

/// One call received by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// `clear`.
    Clear,
    /// `fill_rect`.
    FillRect {
        /// Filled box.
        bounds: Bounds,
        /// Fill color.
        color: Color,
    },
    /// `fill_path`, summarized by the path's bounding box.
    FillPath {
        /// Bounding box of the filled path.
        bounds: Bounds,
        /// Fill color.
        color: Color,
    },
    /// `draw_image`.
    DrawImage {
        /// Decoded size of the image.
        image_size: (u32, u32),
        /// Requested placement.
        placement: ImagePlacement,
    },
    /// `fill_text`.
    FillText {
        /// Text drawn.
        text: String,
        /// Anchor.
        at: Point,
        /// Style used.
        style: TextStyle,
    },
    /// `flush`.
    Flush,
}

/// Surface that records draw calls instead of producing pixels.
///
/// Text is measured with a fixed advance per character (`font_size * advance_em`), which keeps
/// layout deterministic without any font. Useful for dry runs and for inspecting the draw order.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    advance_em: f64,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Default per-character advance, as a fraction of the font size.
    pub const DEFAULT_ADVANCE_EM: f64 = 0.5;

    /// Create an empty recorder for a canvas of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            advance_em: Self::DEFAULT_ADVANCE_EM,
            calls: Vec::new(),
        }
    }

    /// Override the per-character advance used by `measure_text`.
    pub fn with_advance_em(mut self, advance_em: f64) -> Self {
        self.advance_em = advance_em;
        self
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the recorder empty.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self) -> AdResult<()> {
        self.calls.push(DrawCall::Clear);
        Ok(())
    }

    fn fill_rect(&mut self, bounds: Bounds, color: &Color) -> AdResult<()> {
        self.calls.push(DrawCall::FillRect {
            bounds,
            color: color.clone(),
        });
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: &Color) -> AdResult<()> {
        let bb = path.bounding_box();
        self.calls.push(DrawCall::FillPath {
            bounds: Bounds::new(bb.x0, bb.y0, bb.width(), bb.height()),
            color: color.clone(),
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &DecodedImage, placement: ImagePlacement) -> AdResult<()> {
        self.calls.push(DrawCall::DrawImage {
            image_size: (image.width, image.height),
            placement,
        });
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> AdResult<f64> {
        Ok(text.chars().count() as f64 * font_size * self.advance_em)
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> AdResult<()> {
        self.calls.push(DrawCall::FillText {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
        Ok(())
    }

    fn flush(&mut self) -> AdResult<()> {
        self.calls.push(DrawCall::Flush);
        Ok(())
    }
}
