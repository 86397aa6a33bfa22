use super::*;
use crate::foundation::core::Canvas;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 4,
        fps: Fps::whole(10).unwrap(),
    }
}

fn frame() -> FrameRGBA {
    FrameRGBA::filled(Canvas::new(4, 4).unwrap(), [0, 0, 0, 255])
}

#[test]
fn lifecycle_records_frames_and_single_release() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.push_frame(FrameIndex(1), &frame()).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config(), Some(&cfg()));
    assert!(sink.is_finalized());
    assert_eq!(sink.release_count(), 1);
}

#[test]
fn second_end_is_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.end().unwrap();
    assert!(sink.end().is_err());
    assert_eq!(sink.release_count(), 1);
}

#[test]
fn out_of_order_frames_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame()).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame()).is_err());
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
}

#[test]
fn abort_releases_without_finalizing() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.abort();
    sink.abort();
    assert!(!sink.is_finalized());
    assert_eq!(sink.release_count(), 1);
    assert!(sink.end().is_err());
}
