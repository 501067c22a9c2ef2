use super::*;

#[test]
fn reference_canvas_bounds_cover_full_surface() {
    let b = Canvas::default().bounds();
    assert_eq!(b, Bounds::new(0.0, 0.0, 1080.0, 1080.0));
}

#[test]
fn bounds_to_rect_keeps_negative_origin() {
    let r = Bounds::new(-56.0, -441.0, 112.0, 477.0).to_rect();
    assert_eq!(r, Rect::new(-56.0, -441.0, 56.0, 36.0));
    assert_eq!(
        Bounds::new(-1.0, 2.0, 3.0, 4.0).origin(),
        Point::new(-1.0, 2.0)
    );
}

#[test]
fn bounds_finiteness() {
    assert!(Bounds::new(0.0, 0.0, 0.0, 0.0).is_finite());
    assert!(!Bounds::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
    assert!(!Bounds::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
}
