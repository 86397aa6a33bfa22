use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn normalized_height_preserves_aspect() {
    assert_eq!(normalized_height(100, 200, 50), 25);
    assert_eq!(normalized_height(100, 300, 200), 67);
    assert_eq!(normalized_height(100, 10_000, 1), 1);
}

#[test]
fn normalize_rescales_to_target_width() {
    let rgba = decode_rgba8(&png_bytes(40, 20, [0, 255, 0, 255]), "mem").unwrap();
    let prepared = normalize_rgba8(&rgba, 100);
    assert_eq!(prepared.width, 100);
    assert_eq!(prepared.height, 50);
    assert_eq!(prepared.rgba8_premul.len(), 100 * 50 * 4);
    // Center pixel of a solid image keeps its color through the resize.
    let i = ((25 * 100 + 50) * 4) as usize;
    let px = &prepared.rgba8_premul[i..i + 4];
    assert!(px[0] <= 1 && px[1] >= 254 && px[2] <= 1 && px[3] >= 254, "{px:?}");
}

#[test]
fn normalize_premultiplies() {
    let rgba = decode_rgba8(&png_bytes(2, 2, [200, 100, 0, 128]), "mem").unwrap();
    let prepared = normalize_rgba8(&rgba, 2);
    assert_eq!(
        &prepared.rgba8_premul[0..4],
        &[
            ((200u16 * 128 + 127) / 255) as u8,
            ((100u16 * 128 + 127) / 255) as u8,
            0,
            128
        ]
    );
}

#[test]
fn undecodable_bytes_are_resource_errors() {
    let err = decode_rgba8(b"not an image", "junk").unwrap_err();
    assert!(err.is_resource());
}

#[test]
fn missing_file_is_resource_error() {
    let err = load_normalized(Path::new("target/does/not/exist.png"), 100).unwrap_err();
    assert!(err.is_resource());
}

#[test]
fn normalized_height_beyond_raster_limit_is_invalid_config() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/decode_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tall_1x700.png");
    std::fs::write(&path, png_bytes(1, 700, [0, 0, 0, 255])).unwrap();

    // 100 px wide means 70000 px tall.
    assert!(load_normalized(&path, 100).unwrap_err().is_invalid_config());
    assert_eq!(load_normalized(&path, 10).unwrap().height, 7000);
    assert!(
        load_normalized(&path, Canvas::MAX_EDGE + 1)
            .unwrap_err()
            .is_invalid_config()
    );
}
