use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Rect, RoundedRect};
use crate::foundation::math::clamp_corner_radius;

const PATH_TOLERANCE: f64 = 0.1;

/// Closed rounded-rectangle outline for `rect`.
///
/// The radius is clamped to half the shorter side, so building the path twice from the same inputs
/// always yields the same elements.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let rect = rect.abs();
    let r = clamp_corner_radius(radius, rect.width(), rect.height());
    let mut p = BezPath::new();
    if rect.area() <= 0.0 {
        return p;
    }
    for el in RoundedRect::from_rect(rect, r).path_elements(PATH_TOLERANCE) {
        p.push(el);
    }
    p
}

pub(crate) fn to_cpu_path(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
