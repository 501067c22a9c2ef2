use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::decode::DecodedImage;
use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Bounds, Canvas, Point};
use crate::foundation::error::{AdError, AdResult};
use crate::render::surface::{ImagePlacement, Surface, TextBaseline, TextStyle};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Return a straight-alpha copy of the frame.
    pub fn to_straight(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }

    /// Write the frame as a straight-alpha PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> AdResult<()> {
        let path = path.as_ref();
        let straight = self.to_straight();
        image::save_buffer_with_format(
            path,
            &straight.data,
            straight.width,
            straight.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Parley contexts plus the single font the surface draws text with.
struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextShaper {
    fn new(font_bytes: Vec<u8>) -> AdResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| AdError::configuration("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AdError::configuration("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
        })
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f64,
        brush: TextBrushRgba8,
    ) -> AdResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AdError::draw("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// CPU raster surface backed by `vello_cpu`, with text shaped by `parley`.
///
/// Draw calls are recorded into a render context and rasterized on [`Surface::flush`]. Text
/// needs a font registered with [`CpuSurface::with_font`]; whitespace-only strings never need
/// one (they measure 0 without a font and paint nothing).
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: Option<TextShaper>,
}

impl CpuSurface {
    /// Create a transparent surface.
    pub fn new(canvas: Canvas) -> AdResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| AdError::configuration("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| AdError::configuration("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(AdError::configuration("surface dimensions must be > 0"));
        }
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            text: None,
        })
    }

    /// Register the font (TTF/OTF bytes) used for all text on this surface.
    pub fn with_font(mut self, font_bytes: Vec<u8>) -> AdResult<Self> {
        self.text = Some(TextShaper::new(font_bytes)?);
        Ok(self)
    }

    /// `true` when a font is registered.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Copy out the current pixels (premultiplied).
    ///
    /// Only reflects draw calls up to the last flush.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn shaper(&mut self) -> AdResult<&mut TextShaper> {
        self.text
            .as_mut()
            .ok_or_else(|| AdError::draw("no font registered on surface"))
    }

    fn reset_state(&mut self) {
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    fn clear(&mut self) -> AdResult<()> {
        self.ctx.reset();
        clear_pixmap_to_transparent(&mut self.pixmap);
        Ok(())
    }

    fn fill_rect(&mut self, bounds: Bounds, color: &Color) -> AdResult<()> {
        let [r, g, b, a] = color.to_rgba8()?;
        self.reset_state();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&rect_to_cpu(bounds));
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: &Color) -> AdResult<()> {
        let [r, g, b, a] = color.to_rgba8()?;
        self.reset_state();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_path(&bezpath_to_cpu(path));
        Ok(())
    }

    fn draw_image(&mut self, image: &DecodedImage, placement: ImagePlacement) -> AdResult<()> {
        if image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let dest = placement.dest_bounds(image.width, image.height);
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let paint = rgba_premul_to_image(&image.rgba8_premul, image.width, image.height)?;

        self.reset_state();
        self.ctx.set_transform(
            vello_cpu::kurbo::Affine::translate((dest.x, dest.y))
                * vello_cpu::kurbo::Affine::scale_non_uniform(dest.width / iw, dest.height / ih),
        );
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font_size: f64) -> AdResult<f64> {
        if text.is_empty() || (self.text.is_none() && text.trim().is_empty()) {
            return Ok(0.0);
        }
        let layout = self
            .shaper()?
            .layout(text, font_size, TextBrushRgba8::default())?;
        Ok(f64::from(layout.full_width()))
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) -> AdResult<()> {
        let [r, g, b, a] = style.color.to_rgba8()?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let shaper = self.shaper()?;
        let layout = shaper.layout(text, style.font_size, TextBrushRgba8 { r, g, b, a })?;
        let font = shaper.font.clone();

        let width = f64::from(layout.full_width());
        let top = match style.baseline {
            TextBaseline::Alphabetic => {
                let baseline = layout
                    .lines()
                    .next()
                    .map(|line| f64::from(line.metrics().baseline))
                    .unwrap_or(0.0);
                at.y - baseline
            }
            TextBaseline::Middle => at.y - f64::from(layout.height()) / 2.0,
        };
        let left = at.x + style.align.offset_for_width(width);

        self.reset_state();
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((left, top)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> AdResult<()> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn rect_to_cpu(b: Bounds) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(b.x, b.y, b.x + b.width, b.y + b.height)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> AdResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| AdError::draw("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| AdError::draw("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(AdError::draw("image byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> AdResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
