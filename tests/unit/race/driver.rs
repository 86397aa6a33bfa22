use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::*;
use crate::encode::sink::InMemorySink;

fn fixture_dir() -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("target/race_driver_unit");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sprite_png(name: &str) -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let path = fixture_dir().join(format!("{name}-{n}.png"));
    image::RgbaImage::from_pixel(50, 25, image::Rgba([0, 0, 255, 255]))
        .save(&path)
        .unwrap();
    path
}

fn runner(name: &str, y: i64, speed: f64) -> ParticipantSpec {
    ParticipantSpec {
        name: name.to_string(),
        image: sprite_png(name),
        location: [0, y],
        speed,
    }
}

fn config(duration: f64, max_frames: u64) -> RaceConfig {
    RaceConfig {
        fps: 10,
        width: 800,
        height: 600,
        max_frames,
        duration,
        ..RaceConfig::default()
    }
}

/// Sink that fails on a chosen frame and records how it was released.
struct FailingSink {
    inner: InMemorySink,
    fail_at: u64,
    ended: u32,
    aborted: u32,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, cfg: SinkConfig) -> LineartResult<()> {
        self.inner.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LineartResult<()> {
        if idx.0 == self.fail_at {
            return Err(LineartError::render("disk full"));
        }
        self.inner.push_frame(idx, frame)
    }

    fn end(&mut self) -> LineartResult<()> {
        self.ended += 1;
        self.inner.end()
    }

    fn abort(&mut self) {
        self.aborted += 1;
        self.inner.abort();
    }
}

#[test]
fn early_finish_is_padded_to_requested_duration() {
    // 460 px track over 100 units at 10 fps: speed 100 moves 46 px per frame and
    // reaches the finish line on frame 10.
    let mut sim = RaceSimulation::new(&config(5.0, 500), &[runner("hare", 40, 100.0)]).unwrap();
    assert_eq!(sim.target_frames(), 50);
    let mut sink = InMemorySink::new();
    let report = sim.run(&mut sink).unwrap();

    assert_eq!(report.termination, Termination::AllFinished);
    assert_eq!(report.frames_rendered, 11);
    assert_eq!(report.frames_padded, 39);
    assert_eq!(report.total_frames(), 50);
    assert_eq!(sink.frames().len(), 50);
    assert_eq!(report.finishes[0].finish_frame, Some(FrameIndex(10)));
    assert!(report.clip.is_none());

    let last_rendered = &sink.frames()[10].1;
    assert!(sink.frames()[11..].iter().all(|(_, f)| f == last_rendered));
    for (i, (idx, _)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
    }
    assert!(sink.is_finalized());
    assert_eq!(sink.release_count(), 1);
    assert_eq!(sim.phase(), RunPhase::Finalized);
}

#[test]
fn slow_race_stops_at_requested_duration() {
    let mut sim = RaceSimulation::new(
        &config(5.0, 500),
        &[runner("tortoise", 40, 1.0), runner("snail", 200, 0.5)],
    )
    .unwrap();
    let mut sink = InMemorySink::new();
    let report = sim.run(&mut sink).unwrap();

    assert_eq!(report.termination, Termination::DurationReached);
    assert_eq!(report.frames_rendered, 50);
    assert_eq!(report.frames_padded, 0);
    assert_eq!(sink.frames().len(), 50);
    assert!(report.finishes.iter().all(|r| r.finish_frame.is_none()));
    assert_eq!(report.finishes[1].name, "snail");
}

/// Log sink shared between a scoped subscriber and the test body.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn frame_cap_ends_run_and_still_finalizes() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    let mut sink = InMemorySink::new();
    let report = tracing::subscriber::with_default(subscriber, || {
        let mut sim =
            RaceSimulation::new(&config(5.0, 20), &[runner("tortoise", 40, 1.0)]).unwrap();
        sim.run(&mut sink).unwrap()
    });

    let logged = logs.text();
    assert!(
        logged.contains("WARN") && logged.contains("frame cap reached before the race finished"),
        "{logged}"
    );
    assert!(logged.contains("max_frames=20"), "{logged}");

    assert_eq!(report.termination, Termination::FrameCapReached);
    assert_eq!(report.frames_rendered, 20);
    assert_eq!(report.frames_padded, 0);
    assert_eq!(sink.frames().len(), 20);
    assert!(sink.is_finalized());
    assert_eq!(sink.release_count(), 1);
}

#[test]
fn invalid_config_is_rejected_before_sink_opens() {
    let mut zero_fps = config(5.0, 500);
    zero_fps.fps = 0;
    let err = RaceSimulation::new(&zero_fps, &[runner("a", 0, 1.0)]).unwrap_err();
    assert!(err.is_invalid_config());

    let mut zero_width = config(5.0, 500);
    zero_width.width = 0;
    let err = RaceSimulation::new(&zero_width, &[runner("b", 0, 1.0)]).unwrap_err();
    assert!(err.is_invalid_config());

    let err = RaceSimulation::new(&config(5.0, 500), &[]).unwrap_err();
    assert!(err.is_invalid_config());

    let mut negative = runner("c", 0, 1.0);
    negative.location = [-5, 0];
    let err = RaceSimulation::new(&config(5.0, 500), &[negative]).unwrap_err();
    assert!(err.is_invalid_config());
}

#[test]
fn undecodable_image_fails_setup() {
    let bogus = fixture_dir().join("not_an_image.png");
    std::fs::write(&bogus, b"definitely not a png").unwrap();
    let spec = ParticipantSpec {
        name: "broken".to_string(),
        image: bogus,
        location: [0, 0],
        speed: 1.0,
    };
    let err = RaceSimulation::new(&config(5.0, 500), &[spec]).unwrap_err();
    assert!(err.is_resource());
}

#[test]
fn failing_frame_aborts_sink_once() {
    let mut sim = RaceSimulation::new(&config(5.0, 500), &[runner("tortoise", 40, 1.0)]).unwrap();
    let mut sink = FailingSink {
        inner: InMemorySink::new(),
        fail_at: 3,
        ended: 0,
        aborted: 0,
    };
    assert!(sim.run(&mut sink).is_err());
    assert_eq!(sink.aborted, 1);
    assert_eq!(sink.ended, 0);
    assert_eq!(sink.inner.frames().len(), 3);
    assert_eq!(sink.inner.release_count(), 1);
}

#[test]
fn simulation_runs_only_once() {
    let mut sim = RaceSimulation::new(&config(0.5, 500), &[runner("hare", 40, 100.0)]).unwrap();
    let mut sink = InMemorySink::new();
    sim.run(&mut sink).unwrap();
    let mut second = InMemorySink::new();
    assert!(sim.run(&mut second).is_err());
    assert!(second.config().is_none());
}

#[test]
fn oversized_normalized_image_fails_setup() {
    let path = fixture_dir().join("needle_1x700.png");
    image::RgbaImage::from_pixel(1, 700, image::Rgba([0, 0, 0, 255]))
        .save(&path)
        .unwrap();
    let mut spec = runner("needle", 0, 1.0);
    spec.image = path;

    let err = RaceSimulation::new(&config(5.0, 500), &[spec]).unwrap_err();
    assert!(err.is_invalid_config(), "{err}");
}
