use crate::foundation::error::{QuadviewError, QuadviewResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Destination-out: erase `dst` by the coverage (alpha) of `mask`.
pub fn dest_out(dst: PremulRgba8, mask: PremulRgba8) -> PremulRgba8 {
    let keep = 255u16 - u16::from(mask[3]);
    [
        mul_div255_u8(u16::from(dst[0]), keep),
        mul_div255_u8(u16::from(dst[1]), keep),
        mul_div255_u8(u16::from(dst[2]), keep),
        mul_div255_u8(u16::from(dst[3]), keep),
    ]
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> QuadviewResult<()> {
    check_lengths("over_in_place", dst, src)?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn dest_out_in_place(dst: &mut [u8], mask: &[u8]) -> QuadviewResult<()> {
    check_lengths("dest_out_in_place", dst, mask)?;
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        if m[3] == 0 {
            continue;
        }
        let out = dest_out([d[0], d[1], d[2], d[3]], [m[0], m[1], m[2], m[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn fill_in_place(dst: &mut [u8], px: PremulRgba8) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

fn check_lengths(op: &str, a: &[u8], b: &[u8]) -> QuadviewResult<()> {
    if a.len() != b.len() || !a.len().is_multiple_of(4) {
        return Err(QuadviewError::invalid_argument(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
