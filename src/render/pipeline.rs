use crate::assets::loader::{ImageLoader, ImageRef};
use crate::foundation::error::{AdResult, ImageLoadError};
use crate::layout::resolver::{CaptionLayer, CtaLayer, LayerDescriptor, resolve_layers};
use crate::layout::text::{CTA_FONT_SIZE, cta_layout, wrap_caption};
use crate::render::rounded_rect::fill_rounded_rect;
use crate::render::surface::{ImagePlacement, Surface, TextBaseline, TextStyle};
use crate::template::model::{TemplateConfig, TextAlign};
use crate::template::state::RenderState;

/// What to do when an image layer fails to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFailurePolicy {
    /// Log the failure, skip the layer and keep drawing.
    #[default]
    Skip,
    /// Stop the render and return the load error.
    Abort,
}

/// Render options.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOpts {
    /// Handling of image load failures.
    pub image_failures: ImageFailurePolicy,
}

/// An image layer that was not drawn.
#[derive(Debug)]
pub struct SkippedLayer {
    /// Layer name (see [`LayerDescriptor::name`]).
    pub layer: &'static str,
    /// Why its image could not be loaded.
    pub error: ImageLoadError,
}

/// Summary of one render call.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Names of the layers that were drawn, in paint order.
    pub drawn: Vec<&'static str>,
    /// Image layers skipped because their image failed to load.
    pub skipped: Vec<SkippedLayer>,
}

impl RenderReport {
    /// `true` when every resolved layer was drawn.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Render a template with the current user inputs onto `surface`.
///
/// The template is validated and resolved before the surface is touched, so configuration errors
/// leave the surface unchanged. See [`render_layers`] for the draw phase.
pub async fn render<S, L>(
    surface: &mut S,
    config: &TemplateConfig,
    state: &RenderState,
    loader: &L,
    opts: RenderOpts,
) -> AdResult<RenderReport>
where
    S: Surface + ?Sized,
    L: ImageLoader,
{
    config.validate()?;
    let layers = resolve_layers(config, state, surface.canvas())?;
    render_layers(surface, &layers, loader, opts).await
}

/// Blocking wrapper around [`render`] for callers without an async runtime.
pub fn render_blocking<S, L>(
    surface: &mut S,
    config: &TemplateConfig,
    state: &RenderState,
    loader: &L,
    opts: RenderOpts,
) -> AdResult<RenderReport>
where
    S: Surface + ?Sized,
    L: ImageLoader,
{
    pollster::block_on(render(surface, config, state, loader, opts))
}

/// Clear `surface` and paint `layers` in order.
///
/// Each image layer is loaded and awaited before its draw call, and before any later layer is
/// touched, so paint order never depends on load timing. Load failures are handled per
/// [`RenderOpts::image_failures`]; draw failures always abort.
#[tracing::instrument(skip_all, fields(layers = layers.len()))]
pub async fn render_layers<S, L>(
    surface: &mut S,
    layers: &[LayerDescriptor],
    loader: &L,
    opts: RenderOpts,
) -> AdResult<RenderReport>
where
    S: Surface + ?Sized,
    L: ImageLoader,
{
    let mut report = RenderReport::default();
    surface.clear()?;

    for layer in layers {
        let name = layer.name();
        match layer {
            LayerDescriptor::Background { color } => {
                let bounds = surface.canvas().bounds();
                surface.fill_rect(bounds, color)?;
            }
            LayerDescriptor::Image(image) => {
                let loaded = draw_image_layer(surface, loader, &image.source, image.placement).await?;
                if let Err(error) = loaded {
                    skip_or_abort(&mut report, name, error, opts)?;
                    continue;
                }
            }
            LayerDescriptor::Caption(caption) => paint_caption(surface, caption)?,
            LayerDescriptor::Cta(cta) => paint_cta(surface, cta)?,
            LayerDescriptor::Photo { source, bounds } => {
                let placement = ImagePlacement::Stretched(*bounds);
                let loaded = draw_image_layer(surface, loader, source, placement).await?;
                if let Err(error) = loaded {
                    skip_or_abort(&mut report, name, error, opts)?;
                    continue;
                }
            }
        }
        tracing::debug!(layer = name, "drawn");
        report.drawn.push(name);
    }

    surface.flush()?;
    Ok(report)
}

/// Load one image and draw it.
///
/// The outer result carries draw errors, the inner one the load outcome.
async fn draw_image_layer<S, L>(
    surface: &mut S,
    loader: &L,
    source: &ImageRef,
    placement: ImagePlacement,
) -> AdResult<Result<(), ImageLoadError>>
where
    S: Surface + ?Sized,
    L: ImageLoader,
{
    let image = match loader.load(source).await {
        Ok(image) => image,
        Err(e) => return Ok(Err(e)),
    };
    surface.draw_image(&image, placement)?;
    Ok(Ok(()))
}

fn skip_or_abort(
    report: &mut RenderReport,
    layer: &'static str,
    error: ImageLoadError,
    opts: RenderOpts,
) -> AdResult<()> {
    match opts.image_failures {
        ImageFailurePolicy::Abort => Err(error.into()),
        ImageFailurePolicy::Skip => {
            tracing::warn!(layer, error = %error, "image layer skipped");
            report.skipped.push(SkippedLayer { layer, error });
            Ok(())
        }
    }
}

fn paint_caption<S: Surface + ?Sized>(surface: &mut S, caption: &CaptionLayer) -> AdResult<()> {
    let font_size = caption.font_size;
    let lines = wrap_caption(
        &caption.text,
        caption.origin,
        caption.max_width,
        font_size,
        |s| surface.measure_text(s, font_size),
    )?;

    let style = TextStyle {
        color: caption.color.clone(),
        font_size,
        align: caption.align,
        baseline: TextBaseline::Alphabetic,
    };
    for line in &lines {
        surface.fill_text(&line.text, line.origin, &style)?;
    }
    Ok(())
}

fn paint_cta<S: Surface + ?Sized>(surface: &mut S, cta: &CtaLayer) -> AdResult<()> {
    let layout = cta_layout(&cta.text, cta.anchor, |s| {
        surface.measure_text(s, CTA_FONT_SIZE)
    })?;

    if let Some(bg) = layout.background {
        fill_rounded_rect(surface, bg, layout.corner_radius, &cta.background_color)?;
    }

    let style = TextStyle {
        color: cta.text_color.clone(),
        font_size: CTA_FONT_SIZE,
        align: TextAlign::Center,
        baseline: TextBaseline::Middle,
    };
    surface.fill_text(&cta.text, cta.anchor, &style)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
