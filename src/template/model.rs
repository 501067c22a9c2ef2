use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::assets::loader::ImageRef;
use crate::foundation::color::Color;
use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::{AdError, AdResult};

/// Declarative description of one ad layout.
///
/// This is the JSON-facing template. It is loaded once and never mutated; everything that changes
/// between renders lives in [`crate::RenderState`].
#[derive(Clone, Debug, serde::Deserialize)]
pub struct TemplateConfig {
    /// Default background color offered to callers when building a render state.
    #[serde(default)]
    pub background_color: Option<Color>,
    /// Optional image layers. A missing reference disables its layer.
    #[serde(default)]
    pub urls: TemplateUrls,
    /// Base geometry of the masked photo. Required when `urls.mask` or `urls.stroke` is set.
    #[serde(default)]
    pub image_mask: Option<Bounds>,
    /// Caption text block.
    pub caption: CaptionDef,
    /// Call-to-action button.
    pub cta: CtaDef,
}

/// Image references used by a template.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct TemplateUrls {
    /// Decorative pattern stretched over the full canvas.
    #[serde(default)]
    pub design_pattern: Option<ImageRef>,
    /// Mask silhouette composited at native size above the pattern.
    #[serde(default)]
    pub mask: Option<ImageRef>,
    /// Stroke border stretched over the expanded mask box.
    #[serde(default)]
    pub stroke: Option<ImageRef>,
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Position is the left edge of the run.
    Left,
    /// Position is the right edge of the run.
    Right,
    /// Position is the horizontal center of the run.
    Center,
    /// Same as `Left` for left-to-right text.
    #[default]
    Start,
    /// Same as `Right` for left-to-right text.
    End,
}

impl TextAlign {
    /// Horizontal offset to apply to a run of width `width` so it anchors at the position.
    pub fn offset_for_width(self, width: f64) -> f64 {
        match self {
            TextAlign::Left | TextAlign::Start => 0.0,
            TextAlign::Center => -width / 2.0,
            TextAlign::Right | TextAlign::End => -width,
        }
    }
}

/// Caption text block definition.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct CaptionDef {
    /// Default caption text.
    #[serde(default)]
    pub text: String,
    /// Fill color of the caption glyphs.
    pub text_color: Color,
    /// Font size in pixels. Also used as the line height when wrapping.
    pub font_size: f64,
    /// Horizontal alignment of every wrapped line.
    #[serde(default)]
    pub alignment: TextAlign,
    /// Maximum measured line width in pixels.
    ///
    /// Despite the name, this is compared against measured text width, not a character count.
    pub max_characters_per_line: f64,
    /// Anchor of the first line (alphabetic baseline).
    pub position: Point,
}

/// Call-to-action button definition.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct CtaDef {
    /// Default button label.
    #[serde(default)]
    pub text: String,
    /// Fill color of the label glyphs.
    pub text_color: Color,
    /// Fill color of the rounded background box.
    pub background_color: Color,
    /// Center of the label (and of its background box).
    pub position: Point,
}

impl TemplateConfig {
    /// Parse a template from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AdResult<Self> {
        serde_json::from_reader(r).map_err(|e| AdError::serde(format!("parse template JSON: {e}")))
    }

    /// Parse a template from a JSON string.
    pub fn from_json_str(s: &str) -> AdResult<Self> {
        serde_json::from_str(s).map_err(|e| AdError::serde(format!("parse template JSON: {e}")))
    }

    /// Parse a template from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AdResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AdError::configuration(format!("open template JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the invariants every enabled layer relies on.
    ///
    /// A template that declares a mask or stroke image without `image_mask` has no defined
    /// geometry for those layers and is rejected here, before anything is drawn.
    pub fn validate(&self) -> AdResult<()> {
        match self.image_mask {
            None if self.urls.mask.is_some() || self.urls.stroke.is_some() => {
                return Err(AdError::configuration(
                    "image_mask is required when urls.mask or urls.stroke is set",
                ));
            }
            Some(b) if !b.is_finite() => {
                return Err(AdError::configuration("image_mask must be finite"));
            }
            _ => {}
        }

        let c = &self.caption;
        if !c.font_size.is_finite() || c.font_size <= 0.0 {
            return Err(AdError::configuration(
                "caption.font_size must be finite and > 0",
            ));
        }
        if !c.max_characters_per_line.is_finite() {
            return Err(AdError::configuration(
                "caption.max_characters_per_line must be finite",
            ));
        }
        if !c.position.is_finite() {
            return Err(AdError::configuration("caption.position must be finite"));
        }
        if !self.cta.position.is_finite() {
            return Err(AdError::configuration("cta.position must be finite"));
        }
        Ok(())
    }

    /// Image mask geometry, or a configuration error naming the layer that needed it.
    pub(crate) fn require_image_mask(&self, layer: &str) -> AdResult<Bounds> {
        self.image_mask.ok_or_else(|| {
            AdError::configuration(format!("{layer} layer requires image_mask geometry"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
