pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Largest `radius` that keeps opposite corner arcs of a `w`×`h` rounded rect from overlapping.
pub(crate) fn clamp_corner_radius(radius: f64, w: f64, h: f64) -> f64 {
    let max = (w.min(h) / 2.0).max(0.0);
    if !radius.is_finite() {
        return 0.0;
    }
    radius.clamp(0.0, max)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
