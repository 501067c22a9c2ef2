use crate::assets::loader::ImageRef;
use crate::foundation::color::Color;
use crate::foundation::core::{Bounds, Canvas, Point, Vec2};
use crate::foundation::error::AdResult;
use crate::render::surface::ImagePlacement;
use crate::template::model::{TemplateConfig, TextAlign};
use crate::template::state::RenderState;

/// Offset from the image mask origin to where the mask asset is composited.
pub const MASK_OFFSET: Vec2 = Vec2::new(-56.0, -441.0);
/// Growth of the image mask size that gives the stroke box size.
pub const STROKE_GROWTH: Vec2 = Vec2::new(112.0, 477.0);

/// Which template image a [`ImageLayer`] comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageLayerKind {
    /// `urls.design_pattern`, stretched over the canvas.
    DesignPattern,
    /// `urls.mask`, composited at native size.
    Mask,
    /// `urls.stroke`, stretched over the expanded mask box.
    Stroke,
}

impl ImageLayerKind {
    /// Stable name used in logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            ImageLayerKind::DesignPattern => "design_pattern",
            ImageLayerKind::Mask => "mask",
            ImageLayerKind::Stroke => "stroke",
        }
    }
}

/// A template image layer with resolved placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageLayer {
    /// Origin of the layer in the template.
    pub kind: ImageLayerKind,
    /// Image to load.
    pub source: ImageRef,
    /// Where and how large to draw it.
    pub placement: ImagePlacement,
}

impl ImageLayer {
    /// `true` when the image is drawn at its decoded size rather than into a box.
    pub fn composite_only(&self) -> bool {
        matches!(self.placement, ImagePlacement::Native { .. })
    }
}

/// Caption text with everything the wrapper and painter need.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLayer {
    /// Text to wrap.
    pub text: String,
    /// Glyph color.
    pub color: Color,
    /// Font size in pixels; also the line advance.
    pub font_size: f64,
    /// Alignment of each line relative to `origin.x`.
    pub align: TextAlign,
    /// Measured-width threshold for wrapping.
    pub max_width: f64,
    /// Baseline anchor of the first line.
    pub origin: Point,
}

/// Call-to-action label and background colors, anchored at the label center.
#[derive(Clone, Debug, PartialEq)]
pub struct CtaLayer {
    /// Label text.
    pub text: String,
    /// Label color.
    pub text_color: Color,
    /// Background box color.
    pub background_color: Color,
    /// Center of the label and of its background box.
    pub anchor: Point,
}

/// One entry of the draw list, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerDescriptor {
    /// Solid fill over the whole canvas.
    Background {
        /// Fill color.
        color: Color,
    },
    /// Template image (pattern, mask or stroke).
    Image(ImageLayer),
    /// Wrapped caption text.
    Caption(CaptionLayer),
    /// Call-to-action button.
    Cta(CtaLayer),
    /// User photo stretched into the image mask box.
    Photo {
        /// Photo to load.
        source: ImageRef,
        /// Target box (the template `image_mask`).
        bounds: Bounds,
    },
}

impl LayerDescriptor {
    /// Stable name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            LayerDescriptor::Background { .. } => "background",
            LayerDescriptor::Image(l) => l.kind.name(),
            LayerDescriptor::Caption(_) => "caption",
            LayerDescriptor::Cta(_) => "cta",
            LayerDescriptor::Photo { .. } => "photo",
        }
    }

    /// Image the layer depends on, if any.
    pub fn image_source(&self) -> Option<&ImageRef> {
        match self {
            LayerDescriptor::Image(l) => Some(&l.source),
            LayerDescriptor::Photo { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Top-left corner where the mask asset is composited.
pub fn mask_origin(image_mask: Bounds) -> Point {
    image_mask.origin() + MASK_OFFSET
}

/// Box the stroke asset is stretched into.
pub fn stroke_bounds(image_mask: Bounds) -> Bounds {
    let o = mask_origin(image_mask);
    Bounds::new(
        o.x,
        o.y,
        image_mask.width + STROKE_GROWTH.x,
        image_mask.height + STROKE_GROWTH.y,
    )
}

/// Turn a template plus the current user inputs into the ordered draw list.
///
/// Order is always background, design pattern, mask, stroke, caption, CTA, photo. Image layers
/// whose reference is absent are omitted. The photo is only placed when the user selected one
/// *and* the template declares a mask.
#[tracing::instrument(skip_all)]
pub fn resolve_layers(
    config: &TemplateConfig,
    state: &RenderState,
    canvas: Canvas,
) -> AdResult<Vec<LayerDescriptor>> {
    let mut layers = Vec::with_capacity(7);

    layers.push(LayerDescriptor::Background {
        color: state.background_color.clone(),
    });

    if let Some(source) = &config.urls.design_pattern {
        layers.push(LayerDescriptor::Image(ImageLayer {
            kind: ImageLayerKind::DesignPattern,
            source: source.clone(),
            placement: ImagePlacement::Stretched(canvas.bounds()),
        }));
    }

    if let Some(source) = &config.urls.mask {
        let image_mask = config.require_image_mask("mask")?;
        layers.push(LayerDescriptor::Image(ImageLayer {
            kind: ImageLayerKind::Mask,
            source: source.clone(),
            placement: ImagePlacement::Native {
                origin: mask_origin(image_mask),
            },
        }));
    }

    if let Some(source) = &config.urls.stroke {
        let image_mask = config.require_image_mask("stroke")?;
        layers.push(LayerDescriptor::Image(ImageLayer {
            kind: ImageLayerKind::Stroke,
            source: source.clone(),
            placement: ImagePlacement::Stretched(stroke_bounds(image_mask)),
        }));
    }

    let caption = &config.caption;
    layers.push(LayerDescriptor::Caption(CaptionLayer {
        text: state.caption_text.clone(),
        color: caption.text_color.clone(),
        font_size: caption.font_size,
        align: caption.alignment,
        max_width: caption.max_characters_per_line,
        origin: caption.position,
    }));

    layers.push(LayerDescriptor::Cta(CtaLayer {
        text: state.cta_text.clone(),
        text_color: config.cta.text_color.clone(),
        background_color: config.cta.background_color.clone(),
        anchor: config.cta.position,
    }));

    // Gated on urls.mask, not on a photo-specific field. The mask URL itself is not reused.
    if let (Some(source), Some(_)) = (&state.selected_image, &config.urls.mask) {
        let bounds = config.require_image_mask("photo")?;
        layers.push(LayerDescriptor::Photo {
            source: source.clone(),
            bounds,
        });
    }

    tracing::debug!(count = layers.len(), "resolved layers");
    Ok(layers)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
