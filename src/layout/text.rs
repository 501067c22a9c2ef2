//! Caption wrapping and CTA sizing.
//!
//! Both algorithms are pure given a width-measuring function, so they can be driven by a real
//! font backend or by a fixed-advance stub.

use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::AdResult;

/// Font size of the CTA label, in pixels.
pub const CTA_FONT_SIZE: f64 = 35.0;
/// Line-height multiplier used to size the CTA box vertically.
pub const CTA_LINE_HEIGHT_FACTOR: f64 = 1.2;
/// Horizontal padding on each side of the CTA label.
pub const CTA_PADDING_X: f64 = 20.0;
/// Vertical padding above and below the CTA label.
pub const CTA_PADDING_Y: f64 = 20.0;
/// Corner radius of the CTA background box.
pub const CTA_CORNER_RADIUS: f64 = 10.0;

/// One wrapped caption line and its baseline anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLine {
    /// Line text, including the trailing space left by the word joiner.
    pub text: String,
    /// Baseline anchor.
    pub origin: Point,
}

/// Greedy word wrap.
///
/// Words are split on single spaces. Each candidate line is `line + word + " "`; when its measured
/// width exceeds `max_width` and the current line is not empty, the current line is emitted and
/// the next one starts `font_size` pixels lower. The remaining line is always emitted at the end,
/// even if empty.
pub fn wrap_caption(
    text: &str,
    origin: Point,
    max_width: f64,
    font_size: f64,
    mut measure: impl FnMut(&str) -> AdResult<f64>,
) -> AdResult<Vec<CaptionLine>> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut y = origin.y;

    for word in text.split(' ') {
        let candidate = format!("{line}{word} ");
        let width = measure(&candidate)?;
        if width > max_width && !line.is_empty() {
            lines.push(CaptionLine {
                text: std::mem::take(&mut line),
                origin: Point::new(origin.x, y),
            });
            line = format!("{word} ");
            y += font_size;
        } else {
            line = candidate;
        }
    }

    lines.push(CaptionLine {
        text: line,
        origin: Point::new(origin.x, y),
    });
    Ok(lines)
}

/// Resolved CTA geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct CtaLayout {
    /// Measured label width at [`CTA_FONT_SIZE`].
    pub text_width: f64,
    /// Background box centered on the anchor, or `None` for blank labels.
    pub background: Option<Bounds>,
    /// Corner radius to paint the background with.
    pub corner_radius: f64,
}

/// Size the CTA background around its label.
///
/// `measure` must report widths at [`CTA_FONT_SIZE`].
pub fn cta_layout(
    text: &str,
    anchor: Point,
    mut measure: impl FnMut(&str) -> AdResult<f64>,
) -> AdResult<CtaLayout> {
    let text_width = measure(text)?;
    let text_height = CTA_FONT_SIZE * CTA_LINE_HEIGHT_FACTOR;

    let background = (!text.trim().is_empty()).then(|| {
        Bounds::new(
            anchor.x - text_width / 2.0 - CTA_PADDING_X,
            anchor.y - text_height / 2.0 - CTA_PADDING_Y,
            text_width + 2.0 * CTA_PADDING_X,
            text_height + 2.0 * CTA_PADDING_Y,
        )
    });

    Ok(CtaLayout {
        text_width,
        background,
        corner_radius: CTA_CORNER_RADIUS,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
