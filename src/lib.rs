//! adcanvas renders a single social-media ad frame from a JSON template and a few user inputs.
//!
//! A template describes a 1080x1080 layout: a background color, up to three layered images
//! (design pattern, mask, stroke), a wrapped caption and a call-to-action button. The user
//! supplies the caption text, CTA text, background color and an optional photo.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: JSON -> [`TemplateConfig`], then [`TemplateConfig::validate`]
//! 2. **Resolve**: `TemplateConfig + RenderState -> Vec<LayerDescriptor>` (what is drawn, where,
//!    in paint order)
//! 3. **Draw**: layers -> [`Surface`] calls, with each image awaited through an [`ImageLoader`]
//!    before the next layer is touched
//!
//! Two surfaces ship with the crate: [`CpuSurface`] rasterizes into premultiplied RGBA8 pixels,
//! [`RecordingSurface`] records the calls for inspection.
//!
//! # Failure model
//!
//! - Template problems are [`AdError::Configuration`] and are reported before any drawing.
//! - An image that cannot be loaded is skipped by default and listed in the [`RenderReport`];
//!   [`ImageFailurePolicy::Abort`] turns it into an error instead.
//! - Draw failures (bad color strings, text without a font) always abort the render.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod layout;
mod render;
mod template;

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::loader::{FsImageLoader, ImageLoader, ImageRef, MemoryImageLoader};
pub use crate::foundation::color::Color;
pub use crate::foundation::core::{BezPath, Bounds, Canvas, Point, Rect, Vec2};
pub use crate::foundation::error::{AdError, AdResult, ImageLoadError, ImageLoadErrorKind};
pub use crate::layout::resolver::{
    CaptionLayer, CtaLayer, ImageLayer, ImageLayerKind, LayerDescriptor, MASK_OFFSET,
    STROKE_GROWTH, mask_origin, resolve_layers, stroke_bounds,
};
pub use crate::layout::text::{
    CTA_CORNER_RADIUS, CTA_FONT_SIZE, CTA_LINE_HEIGHT_FACTOR, CTA_PADDING_X, CTA_PADDING_Y,
    CaptionLine, CtaLayout, cta_layout, wrap_caption,
};
pub use crate::render::cpu::{CpuSurface, FrameRGBA};
pub use crate::render::pipeline::{
    ImageFailurePolicy, RenderOpts, RenderReport, SkippedLayer, render, render_blocking,
    render_layers,
};
pub use crate::render::recording::{DrawCall, RecordingSurface};
pub use crate::render::rounded_rect::{fill_rounded_rect, rounded_rect_path};
pub use crate::render::surface::{ImagePlacement, Surface, TextBaseline, TextStyle};
pub use crate::template::model::{CaptionDef, CtaDef, TemplateConfig, TemplateUrls, TextAlign};
pub use crate::template::state::{DEFAULT_BACKGROUND, RenderState};
