use super::*;
use crate::template::state::{DEFAULT_BACKGROUND, RenderState};

const FULL: &str = r##"{
  "background_color": "#112233",
  "urls": {
    "design_pattern": "pattern.png",
    "mask": "mask.png",
    "stroke": "stroke.png"
  },
  "image_mask": { "x": 56, "y": 442, "width": 970, "height": 600 },
  "caption": {
    "text": "1 & 2 BHK Luxury Apartments at just Rs.34.97 Lakhs",
    "text_color": "#FFFFFF",
    "font_size": 44,
    "alignment": "left",
    "max_characters_per_line": 31,
    "position": { "x": 50, "y": 50 }
  },
  "cta": {
    "text": "Shop Now",
    "text_color": "#FFFFFF",
    "background_color": "#000000",
    "position": { "x": 190, "y": 320 }
  }
}"##;

#[test]
fn parses_reference_shaped_template() {
    let t = TemplateConfig::from_json_str(FULL).unwrap();
    t.validate().unwrap();
    assert_eq!(t.background_color, Some(Color::new("#112233")));
    assert_eq!(t.urls.mask, Some(ImageRef::location("mask.png")));
    assert_eq!(t.image_mask, Some(Bounds::new(56.0, 442.0, 970.0, 600.0)));
    assert_eq!(t.caption.alignment, TextAlign::Left);
    assert_eq!(t.caption.max_characters_per_line, 31.0);
    assert_eq!(t.cta.position, Point::new(190.0, 320.0));
}

#[test]
fn urls_and_mask_are_optional() {
    let t = TemplateConfig::from_json_str(
        r##"{
          "caption": { "text_color": "#fff", "font_size": 20, "max_characters_per_line": 100,
                       "position": { "x": 0, "y": 0 } },
          "cta": { "text_color": "#fff", "background_color": "#000", "position": { "x": 0, "y": 0 } }
        }"##,
    )
    .unwrap();
    t.validate().unwrap();
    assert!(t.urls.design_pattern.is_none());
    assert!(t.image_mask.is_none());
    assert_eq!(t.caption.alignment, TextAlign::Start);
    assert_eq!(t.caption.text, "");
}

#[test]
fn mask_without_geometry_is_a_configuration_error() {
    let mut t = TemplateConfig::from_json_str(FULL).unwrap();
    t.image_mask = None;
    assert!(matches!(t.validate(), Err(AdError::Configuration(_))));

    t.urls.mask = None;
    assert!(matches!(t.validate(), Err(AdError::Configuration(_))));

    t.urls.stroke = None;
    t.validate().unwrap();
}

#[test]
fn non_positive_font_size_is_rejected() {
    let mut t = TemplateConfig::from_json_str(FULL).unwrap();
    t.caption.font_size = 0.0;
    assert!(matches!(t.validate(), Err(AdError::Configuration(_))));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        TemplateConfig::from_json_str("{ not json"),
        Err(AdError::Serde(_))
    ));
}

#[test]
fn text_align_offsets() {
    assert_eq!(TextAlign::Left.offset_for_width(100.0), 0.0);
    assert_eq!(TextAlign::Start.offset_for_width(100.0), 0.0);
    assert_eq!(TextAlign::Center.offset_for_width(100.0), -50.0);
    assert_eq!(TextAlign::Right.offset_for_width(100.0), -100.0);
    assert_eq!(TextAlign::End.offset_for_width(100.0), -100.0);
}

#[test]
fn render_state_defaults_come_from_template() {
    let mut t = TemplateConfig::from_json_str(FULL).unwrap();
    let s = RenderState::from_template(&t);
    assert_eq!(s.background_color, Color::new("#112233"));
    assert_eq!(s.caption_text, t.caption.text);
    assert_eq!(s.cta_text, "Shop Now");
    assert!(s.selected_image.is_none());

    t.background_color = None;
    let s = RenderState::from_template(&t);
    assert_eq!(s.background_color.as_str(), DEFAULT_BACKGROUND);
}
