use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_half_alpha_blends() {
    let out = over([0, 0, 255, 255], [128, 0, 0, 128]);
    assert_eq!(out, [128, 0, 127, 255]);
}

#[test]
fn dest_out_full_mask_clears_to_transparent() {
    assert_eq!(dest_out([12, 34, 56, 255], [255, 255, 255, 255]), [0, 0, 0, 0]);
}

#[test]
fn dest_out_partial_mask_scales_all_channels() {
    assert_eq!(dest_out([200, 100, 50, 255], [0, 0, 0, 128]), [100, 50, 25, 127]);
}

#[test]
fn dest_out_in_place_leaves_unmasked_pixels() {
    let mut dst = vec![9, 9, 9, 255, 9, 9, 9, 255];
    let mask = vec![0, 0, 0, 0, 255, 255, 255, 255];
    dest_out_in_place(&mut dst, &mask).unwrap();
    assert_eq!(dst, vec![9, 9, 9, 255, 0, 0, 0, 0]);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(dest_out_in_place(&mut dst, &[0u8; 7]).is_err());
}

#[test]
fn fill_writes_every_pixel() {
    let mut dst = vec![0u8; 12];
    fill_in_place(&mut dst, [1, 2, 3, 4]);
    assert_eq!(dst, [1, 2, 3, 4].repeat(3));
}
