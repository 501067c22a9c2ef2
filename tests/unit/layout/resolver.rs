use super::*;
use crate::foundation::error::AdError;
use crate::template::model::{CaptionDef, CtaDef, TemplateUrls};

fn template(urls: TemplateUrls, image_mask: Option<Bounds>) -> TemplateConfig {
    TemplateConfig {
        background_color: None,
        urls,
        image_mask,
        caption: CaptionDef {
            text: "caption".to_string(),
            text_color: Color::new("#ffffff"),
            font_size: 40.0,
            alignment: TextAlign::Left,
            max_characters_per_line: 300.0,
            position: Point::new(50.0, 60.0),
        },
        cta: CtaDef {
            text: "Shop".to_string(),
            text_color: Color::new("#ffffff"),
            background_color: Color::new("#000000"),
            position: Point::new(200.0, 320.0),
        },
    }
}

fn all_urls() -> TemplateUrls {
    TemplateUrls {
        design_pattern: Some(ImageRef::location("pattern.png")),
        mask: Some(ImageRef::location("mask.png")),
        stroke: Some(ImageRef::location("stroke.png")),
    }
}

fn names(layers: &[LayerDescriptor]) -> Vec<&'static str> {
    layers.iter().map(LayerDescriptor::name).collect()
}

#[test]
fn full_template_resolves_in_fixed_order() {
    let t = template(all_urls(), Some(Bounds::new(56.0, 442.0, 970.0, 600.0)));
    let state = RenderState::from_template(&t).with_selected_image(Some(ImageRef::location("me.png")));
    let layers = resolve_layers(&t, &state, Canvas::default()).unwrap();
    assert_eq!(
        names(&layers),
        [
            "background",
            "design_pattern",
            "mask",
            "stroke",
            "caption",
            "cta",
            "photo"
        ]
    );

    let LayerDescriptor::Image(pattern) = &layers[1] else {
        panic!("expected pattern image layer");
    };
    assert_eq!(
        pattern.placement,
        ImagePlacement::Stretched(Bounds::new(0.0, 0.0, 1080.0, 1080.0))
    );
    assert!(!pattern.composite_only());

    let LayerDescriptor::Image(mask) = &layers[2] else {
        panic!("expected mask image layer");
    };
    assert!(mask.composite_only());
    assert_eq!(
        mask.placement,
        ImagePlacement::Native {
            origin: Point::new(0.0, 1.0)
        }
    );

    let LayerDescriptor::Photo { bounds, .. } = &layers[6] else {
        panic!("expected photo layer");
    };
    assert_eq!(*bounds, Bounds::new(56.0, 442.0, 970.0, 600.0));
}

#[test]
fn mask_and_stroke_geometry_for_arbitrary_boxes() {
    for b in [
        Bounds::new(0.0, 0.0, 0.0, 0.0),
        Bounds::new(-10.0, -20.0, 5.0, 7.0),
        Bounds::new(56.0, 441.0, 968.0, 603.0),
        Bounds::new(1e6, -1e6, 0.5, 0.25),
    ] {
        assert_eq!(mask_origin(b), Point::new(b.x - 56.0, b.y - 441.0));
        assert_eq!(
            stroke_bounds(b),
            Bounds::new(b.x - 56.0, b.y - 441.0, b.width + 112.0, b.height + 477.0)
        );

        let t = template(all_urls(), Some(b));
        let layers = resolve_layers(&t, &RenderState::from_template(&t), Canvas::default()).unwrap();
        let stroke = layers
            .iter()
            .find_map(|l| match l {
                LayerDescriptor::Image(i) if i.kind == ImageLayerKind::Stroke => Some(i),
                _ => None,
            })
            .unwrap();
        assert_eq!(stroke.placement, ImagePlacement::Stretched(stroke_bounds(b)));
    }
}

#[test]
fn absent_urls_omit_their_layers() {
    let t = template(TemplateUrls::default(), None);
    let state = RenderState::from_template(&t);
    let layers = resolve_layers(&t, &state, Canvas::default()).unwrap();
    assert_eq!(names(&layers), ["background", "caption", "cta"]);
    assert!(layers.iter().all(|l| l.image_source().is_none()));
}

#[test]
fn photo_requires_both_selection_and_mask_url() {
    let mask_box = Some(Bounds::new(10.0, 10.0, 100.0, 100.0));

    let t = template(all_urls(), mask_box);
    let layers = resolve_layers(&t, &RenderState::from_template(&t), Canvas::default()).unwrap();
    assert!(!names(&layers).contains(&"photo"));

    let mut urls = all_urls();
    urls.mask = None;
    let t = template(urls, mask_box);
    let state = RenderState::from_template(&t).with_selected_image(Some(ImageRef::location("me.png")));
    let layers = resolve_layers(&t, &state, Canvas::default()).unwrap();
    assert!(!names(&layers).contains(&"photo"));
    assert!(names(&layers).contains(&"stroke"));
}

#[test]
fn missing_geometry_fails_fast() {
    let t = template(all_urls(), None);
    let err = resolve_layers(&t, &RenderState::from_template(&t), Canvas::default()).unwrap_err();
    assert!(matches!(err, AdError::Configuration(_)));

    let urls = TemplateUrls {
        stroke: Some(ImageRef::location("stroke.png")),
        ..TemplateUrls::default()
    };
    let t = template(urls, None);
    let err = resolve_layers(&t, &RenderState::from_template(&t), Canvas::default()).unwrap_err();
    assert!(matches!(err, AdError::Configuration(_)));
}

#[test]
fn text_layers_take_state_text_and_template_style() {
    let t = template(TemplateUrls::default(), None);
    let mut state = RenderState::from_template(&t);
    state.caption_text = "edited caption".to_string();
    state.cta_text = "Buy Now".to_string();
    state.background_color = Color::new("#123456");

    let layers = resolve_layers(&t, &state, Canvas::default()).unwrap();
    assert_eq!(
        layers[0],
        LayerDescriptor::Background {
            color: Color::new("#123456")
        }
    );
    let LayerDescriptor::Caption(c) = &layers[1] else {
        panic!("expected caption");
    };
    assert_eq!(c.text, "edited caption");
    assert_eq!(c.max_width, 300.0);
    assert_eq!(c.origin, Point::new(50.0, 60.0));
    let LayerDescriptor::Cta(cta) = &layers[2] else {
        panic!("expected cta");
    };
    assert_eq!(cta.text, "Buy Now");
    assert_eq!(cta.anchor, Point::new(200.0, 320.0));
}
