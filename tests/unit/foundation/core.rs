use super::*;

#[test]
fn fps_validation_rejects_zero() {
    assert!(Fps::new(0, 1).unwrap_err().is_invalid_config());
    assert!(Fps::new(10, 0).unwrap_err().is_invalid_config());
    assert_eq!(Fps::whole(10).unwrap().as_f64(), 10.0);
}

#[test]
fn fps_frame_second_conversions() {
    let fps = Fps::whole(10).unwrap();
    assert_eq!(fps.frames_to_secs(25), 2.5);
    assert_eq!(fps.secs_to_frames_round(4.96), 50);
    assert_eq!(fps.secs_to_frames_trunc(4.96), 49);
    assert_eq!(fps.secs_to_frames_round(-1.0), 0);

    let ntsc = Fps::new(30_000, 1001).unwrap();
    assert!((ntsc.as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn canvas_rejects_empty_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(800, 600).unwrap();
    assert_eq!(c.rgba_len(), 800 * 600 * 4);
}

#[test]
fn frame_index_next_increments() {
    assert_eq!(FrameIndex(4).next(), FrameIndex(5));
}
