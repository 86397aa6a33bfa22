use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::encode::sink::{InMemorySink, SinkConfig};
use crate::race::config::ParticipantSpec;

fn image(w: u32, h: u32) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    }
}

fn spec(name: &str, y: i64, speed: f64) -> ParticipantSpec {
    ParticipantSpec {
        name: name.to_string(),
        image: PathBuf::from(format!("{name}.png")),
        location: [0, y],
        speed,
    }
}

// 800x600, finish at 560, start at 100: a 460 px track over 460 distance units is one unit per
// pixel, and at 10 fps a physical speed of 100 moves 10 px per frame.
fn advancer(speeds: &[f64]) -> FrameAdvancer {
    let canvas = Canvas::new(800, 600).unwrap();
    let track = TrackLayout::new(canvas, 0.3, 100);
    let scale = DistanceScale::for_track(460.0, &track).unwrap();
    let fps = Fps::whole(10).unwrap();
    let participants = speeds
        .iter()
        .enumerate()
        .map(|(i, &speed)| {
            let s = spec(&format!("p{i}"), 50 + 120 * i as i64, speed);
            Participant::with_image(i, &s, image(100, 40), scale.pixel_speed(speed, fps, 1.0))
        })
        .collect();
    FrameAdvancer::new(
        participants,
        track,
        scale,
        AdvanceParams {
            canvas,
            fps,
            simulation_speed: 1.0,
            target_width: 100,
            title: "Tortoise and Hare".to_string(),
            units: UnitLabels::default(),
        },
    )
}

fn texts(scene: &FrameScene) -> Vec<&str> {
    scene.texts.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn scene_holds_sprites_rules_and_overlays() {
    let mut adv = advancer(&[100.0, 50.0]);
    let scene = adv.advance(FrameIndex(0));
    assert_eq!(scene.sprites.len(), 2);
    assert_eq!(scene.rules.len(), 3);
    // Four lines per participant, the race clock and the title.
    assert_eq!(scene.texts.len(), 10);
    assert_eq!(scene.background, Rgba8::WHITE);
}

#[test]
fn overlays_report_distance_time_and_speed() {
    let mut adv = advancer(&[100.0]);
    let scene = adv.advance(FrameIndex(10));
    let p = &adv.participants()[0];
    assert_eq!(p.right_px(), 200);

    let lines = texts(&scene);
    assert_eq!(lines[0], "p0");
    assert_eq!(lines[1], "Distance: 100.00 miles");
    assert_eq!(lines[2], "Time: 1.00 hours");
    assert_eq!(lines[3], "Speed: 100 miles/hour");
    assert_eq!(lines[4], "Time: 1.00 hours");
    assert_eq!(lines[5], "Tortoise and Hare");

    let label_x = adv.track().label_x();
    assert!(scene.texts.iter().all(|t| t.origin.x == label_x));
    assert_eq!(scene.texts[0].origin.y, 50.0);
    assert_eq!(scene.texts[3].origin.y, 110.0);
    assert_eq!(scene.texts[4].origin.y, 150.0);
    assert_eq!(scene.texts[5].origin.y, 10.0);
}

#[test]
fn race_clock_scales_with_simulation_speed() {
    let mut adv = advancer(&[100.0]);
    adv.params.simulation_speed = 2.5;
    assert!((adv.race_clock(FrameIndex(4)) - 1.0).abs() < 1e-12);
    assert_eq!(adv.elapsed_secs(FrameIndex(4)), 0.4);
}

#[test]
fn finish_frames_are_recorded_once() {
    let mut adv = advancer(&[100.0, 50.0]);
    for f in 0..=46u64 {
        adv.advance(FrameIndex(f));
    }
    // 100 + 10 f reaches 560 at f = 46; the slower one is still running.
    assert_eq!(adv.finish_frames()[0], Some(FrameIndex(46)));
    assert_eq!(adv.finish_frames()[1], None);
    assert!(!adv.all_stopped());

    for f in 47..=92u64 {
        adv.advance(FrameIndex(f));
    }
    assert_eq!(adv.finish_frames()[0], Some(FrameIndex(46)));
    assert_eq!(adv.finish_frames()[1], Some(FrameIndex(92)));
    assert!(adv.all_stopped());
    assert_eq!(adv.participants()[0].right_px(), 560);
}

#[test]
fn tick_composes_and_emits_frame() {
    let mut adv = advancer(&[100.0]);
    let canvas = Canvas::new(800, 600).unwrap();
    let mut compositor = Compositor::new(canvas, None).unwrap();
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 800,
        height: 600,
        fps: Fps::whole(10).unwrap(),
    })
    .unwrap();

    let frame = adv.tick(FrameIndex(0), &mut compositor, &mut sink).unwrap();
    assert_eq!(sink.frames().len(), 1);
    assert_eq!(sink.frames()[0].0, FrameIndex(0));
    // Sprite is opaque white; the start line is red at column 100.
    assert_eq!(frame.pixel(100, 5), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(560, 5), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(700, 300), Some([255, 255, 255, 255]));
}
