use super::*;

#[test]
fn transparent_source_keeps_destination() {
    assert_eq!(over([10, 20, 30, 255], [0, 0, 0, 0]), [10, 20, 30, 255]);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(over([10, 20, 30, 255], [255, 255, 0, 255]), [255, 255, 0, 255]);
}

#[test]
fn half_alpha_blends() {
    let out = over([0, 0, 200, 255], [128, 128, 0, 128]);
    assert_eq!(out, [128, 128, 100, 255]);
}

#[test]
fn in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(over_in_place(&mut dst[..6], &[0u8; 6]).is_err());

    let src = [255, 0, 0, 255, 0, 0, 0, 0];
    over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255, 0, 0, 0, 0]);
}
