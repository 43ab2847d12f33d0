use super::*;

#[test]
fn new_kymograph_is_zeroed() {
    let k = Kymograph::new(3, 2, PixelDepth::Gray16).unwrap();
    assert_eq!((k.width(), k.height()), (3, 2));
    assert_eq!(k.depth(), PixelDepth::Gray16);
    assert_eq!(k.row(1), Some(vec![0.0, 0.0, 0.0]));
    assert_eq!(k.get(3, 0), None);
    assert_eq!(k.row(2), None);
}

#[test]
fn put_row_quantizes_to_depth() {
    let mut k8 = Kymograph::new(4, 1, PixelDepth::Gray8).unwrap();
    k8.put_row(0, &[1.4, 1.6, 300.0, -2.0]);
    assert_eq!(k8.row(0), Some(vec![1.0, 2.0, 255.0, 0.0]));

    let mut kf = Kymograph::new(2, 1, PixelDepth::Gray32F).unwrap();
    kf.put_row(0, &[1.25, -3.5]);
    assert_eq!(kf.row(0), Some(vec![1.25, -3.5]));
}

#[test]
fn put_row_drops_overflow_and_bad_rows() {
    let mut k = Kymograph::new(2, 2, PixelDepth::Gray16).unwrap();
    k.put_row(1, &[7.0, 8.0, 9.0]);
    k.put_row(5, &[1.0, 1.0]);
    assert_eq!(k.row(0), Some(vec![0.0, 0.0]));
    assert_eq!(k.row(1), Some(vec![7.0, 8.0]));

    k.put_row(0, &[3.0]);
    assert_eq!(k.row(0), Some(vec![3.0, 0.0]));
}

#[test]
fn integer_depths_convert_losslessly() {
    let mut k = Kymograph::new(2, 1, PixelDepth::Gray16).unwrap();
    k.put_row(0, &[1000.0, 65535.0]);
    let img = k.to_image().unwrap();
    let luma = img.as_luma16().unwrap();
    assert_eq!(luma.get_pixel(0, 0).0, [1000]);
    assert_eq!(luma.get_pixel(1, 0).0, [65535]);
}

#[test]
fn float_depth_is_normalized_for_output() {
    let mut k = Kymograph::new(3, 1, PixelDepth::Gray32F).unwrap();
    k.put_row(0, &[-1.0, 0.0, 1.0]);
    let img = k.to_image().unwrap();
    let luma = img.as_luma16().unwrap();
    assert_eq!(luma.get_pixel(0, 0).0, [0]);
    assert_eq!(luma.get_pixel(2, 0).0, [65535]);
    let mid = luma.get_pixel(1, 0).0[0];
    assert!((32767..=32768).contains(&mid));
}

#[test]
fn flat_float_image_converts_to_black() {
    let mut k = Kymograph::new(2, 1, PixelDepth::Gray32F).unwrap();
    k.put_row(0, &[5.0, 5.0]);
    let img = k.to_image().unwrap();
    assert!(img.as_luma16().unwrap().pixels().all(|p| p.0 == [0]));
}
