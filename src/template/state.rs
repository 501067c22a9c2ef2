use crate::assets::loader::ImageRef;
use crate::foundation::color::Color;
use crate::template::model::TemplateConfig;

/// Background used when neither the caller nor the template picks one.
pub const DEFAULT_BACKGROUND: &str = "#0369A1";

/// Per-render user inputs.
///
/// Callers rebuild or mutate this between renders; the engine never keeps a copy.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Fill color of the background layer.
    pub background_color: Color,
    /// Caption text to wrap and draw.
    pub caption_text: String,
    /// Call-to-action label.
    pub cta_text: String,
    /// User photo placed inside the mask box, if any.
    pub selected_image: Option<ImageRef>,
}

impl RenderState {
    /// Initial state for a freshly opened template: template texts, template background (or
    /// [`DEFAULT_BACKGROUND`]), no photo.
    pub fn from_template(config: &TemplateConfig) -> Self {
        Self {
            background_color: config
                .background_color
                .clone()
                .unwrap_or_else(|| Color::new(DEFAULT_BACKGROUND)),
            caption_text: config.caption.text.clone(),
            cta_text: config.cta.text.clone(),
            selected_image: None,
        }
    }

    /// Replace the selected photo.
    pub fn with_selected_image(mut self, image: Option<ImageRef>) -> Self {
        self.selected_image = image;
        self
    }
}
