use std::path::{Path, PathBuf};

use super::*;
use crate::encode::sink::InMemorySink;

fn still(name: &str, w: u32, h: u32, rgba: [u8; 4]) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("target/stitch_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{name}.png"));
    image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
        .save(&path)
        .unwrap();
    path
}

fn opts() -> StitchOpts {
    StitchOpts::new(Fps::whole(10).unwrap())
}

#[test]
fn stills_are_centered_on_the_largest_canvas() {
    let wide = still("wide", 40, 20, [0, 0, 255, 255]);
    let tall = still("tall", 20, 40, [0, 255, 0, 255]);
    let items = [StitchItem::new(wide, 0.35), StitchItem::new(tall, 0.2)];
    let mut sink = InMemorySink::new();
    let summary = stitch_into(&items, opts(), &mut sink).unwrap();

    assert_eq!(summary.canvas, Canvas::new(40, 40).unwrap());
    // trunc(3.5) + trunc(2.0) frames.
    assert_eq!(summary.frames, 5);
    assert_eq!(sink.frames().len(), 5);
    assert!(sink.is_finalized());

    let first = &sink.frames()[0].1;
    assert_eq!(first.pixel(20, 5), Some([255, 255, 255, 255]));
    assert_eq!(first.pixel(20, 15), Some([0, 0, 255, 255]));
    assert_eq!(first.pixel(20, 34), Some([255, 255, 255, 255]));

    let last = &sink.frames()[4].1;
    assert_eq!(last.pixel(5, 20), Some([255, 255, 255, 255]));
    assert_eq!(last.pixel(15, 20), Some([0, 255, 0, 255]));
    assert_eq!(last.pixel(34, 20), Some([255, 255, 255, 255]));
}

#[test]
fn odd_padding_goes_right_and_bottom() {
    let big = still("big_odd", 41, 21, [0, 0, 0, 255]);
    let small = still("small_even", 10, 10, [255, 0, 0, 255]);
    let items = [StitchItem::new(big, 0.1), StitchItem::new(small, 0.1)];
    let mut sink = InMemorySink::new();
    stitch_into(&items, opts(), &mut sink).unwrap();

    let framed = &sink.frames()[1].1;
    // Left pad floor(31 / 2) = 15, top pad floor(11 / 2) = 5.
    assert_eq!(framed.pixel(14, 5), Some([255, 255, 255, 255]));
    assert_eq!(framed.pixel(15, 5), Some([255, 0, 0, 255]));
    assert_eq!(framed.pixel(24, 14), Some([255, 0, 0, 255]));
    assert_eq!(framed.pixel(25, 14), Some([255, 255, 255, 255]));
    assert_eq!(framed.pixel(15, 15), Some([255, 255, 255, 255]));
}

#[test]
fn h264_output_rounds_canvas_up_to_even() {
    let odd = still("odd_h264", 41, 21, [0, 0, 0, 255]);
    let mut o = opts();
    o.codec = VideoCodec::H264;
    let mut sink = InMemorySink::new();
    let summary = stitch_into(&[StitchItem::new(odd, 0.1)], o, &mut sink).unwrap();
    assert_eq!(summary.canvas, Canvas::new(42, 22).unwrap());
}

#[test]
fn empty_list_is_rejected() {
    let mut sink = InMemorySink::new();
    let err = stitch_into(&[], opts(), &mut sink).unwrap_err();
    assert!(err.is_invalid_config());
    assert!(sink.config().is_none());
}

#[test]
fn unreadable_item_fails_before_sink_opens() {
    let ok = still("fine", 8, 8, [0, 0, 0, 255]);
    let items = [
        StitchItem::new(ok, 1.0),
        StitchItem::new("target/stitch_unit/missing.png", 1.0),
    ];
    let mut sink = InMemorySink::new();
    let err = stitch_into(&items, opts(), &mut sink).unwrap_err();
    assert!(err.is_resource());
    assert!(sink.config().is_none());
}

#[test]
fn negative_still_duration_is_rejected() {
    let ok = still("negative", 8, 8, [0, 0, 0, 255]);
    let mut sink = InMemorySink::new();
    let err = stitch_into(&[StitchItem::new(ok, -1.0)], opts(), &mut sink).unwrap_err();
    assert!(err.is_invalid_config());
}

#[test]
fn item_kind_follows_extension() {
    assert!(StitchItem::new("race.mp4", 0.0).is_video());
    assert!(!StitchItem::new("title.png", 2.0).is_video());
}
