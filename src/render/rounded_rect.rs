use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, RoundedRectRadii};

use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Bounds, Point, Vec2};
use crate::foundation::error::AdResult;
use crate::render::surface::Surface;

const ARC_TOLERANCE: f64 = 0.1;

/// Outline of a rectangle with rounded corners.
///
/// Four straight edges joined by quarter arcs, clockwise from the end of the top-left arc.
/// Radii are used as given: a radius larger than half the shorter side produces overlapping arcs.
pub fn rounded_rect_path(bounds: Bounds, radii: impl Into<RoundedRectRadii>) -> BezPath {
    let r = radii.into();
    let Bounds {
        x,
        y,
        width: w,
        height: h,
    } = bounds;

    let mut path = BezPath::new();
    path.move_to((x + r.top_left, y));
    path.line_to((x + w - r.top_right, y));
    corner(&mut path, Point::new(x + w - r.top_right, y + r.top_right), r.top_right, -FRAC_PI_2);
    path.line_to((x + w, y + h - r.bottom_right));
    corner(
        &mut path,
        Point::new(x + w - r.bottom_right, y + h - r.bottom_right),
        r.bottom_right,
        0.0,
    );
    path.line_to((x + r.bottom_left, y + h));
    corner(
        &mut path,
        Point::new(x + r.bottom_left, y + h - r.bottom_left),
        r.bottom_left,
        FRAC_PI_2,
    );
    path.line_to((x, y + r.top_left));
    corner(&mut path, Point::new(x + r.top_left, y + r.top_left), r.top_left, PI);
    path.close_path();
    path
}

fn corner(path: &mut BezPath, center: Point, radius: f64, start_angle: f64) {
    if radius == 0.0 {
        return;
    }
    let arc = Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle,
        sweep_angle: FRAC_PI_2,
        x_rotation: 0.0,
    };
    path.extend(arc.append_iter(ARC_TOLERANCE));
}

/// Fill a rounded rectangle on `surface`.
pub fn fill_rounded_rect<S: Surface + ?Sized>(
    surface: &mut S,
    bounds: Bounds,
    radii: impl Into<RoundedRectRadii>,
    color: &Color,
) -> AdResult<()> {
    let path = rounded_rect_path(bounds, radii);
    surface.fill_path(&path, color)
}

#[cfg(test)]
#[path = "../../tests/unit/render/rounded_rect.rs"]
mod tests;
