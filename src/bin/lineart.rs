use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lineart", version)]
struct Cli {
    /// Log debug events.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a race described in JSON (requires `ffmpeg` on PATH).
    Race(RaceArgs),
    /// Concatenate still images and videos into one video.
    Stitch(StitchArgs),
    /// Change the playback speed of a video.
    Speed(SpeedArgs),
    /// Draw multiline text onto a PNG card.
    TextImage(TextImageArgs),
}

#[derive(Parser, Debug)]
struct RaceArgs {
    /// Input race JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Also write an H.264 copy to this path.
    #[arg(long)]
    compress: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StitchArgs {
    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Output frame rate.
    #[arg(long, default_value_t = 10)]
    fps: u32,

    /// Input as `path=seconds`; videos play in full and may omit the duration.
    #[arg(long = "item", required = true, value_parser = parse_item)]
    items: Vec<lineart::StitchItem>,

    /// Output codec.
    #[arg(long, value_enum, default_value_t = CodecChoice::Mjpeg)]
    codec: CodecChoice,
}

#[derive(Parser, Debug)]
struct SpeedArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video.
    #[arg(long)]
    out: PathBuf,

    /// Playback speed multiplier; 2 plays twice as fast.
    #[arg(long)]
    factor: f64,
}

#[derive(Parser, Debug)]
struct TextImageArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file (TTF/OTF).
    #[arg(long)]
    font: PathBuf,

    /// Text; `\n` separates lines.
    #[arg(long)]
    text: String,

    #[arg(long, default_value_t = 500)]
    width: u32,

    #[arg(long, default_value_t = 300)]
    height: u32,

    /// Glyph and line spacing multiplier.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Extra pixels between lines.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    line_space: i32,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CodecChoice {
    Mjpeg,
    H264,
}

impl From<CodecChoice> for lineart::VideoCodec {
    fn from(c: CodecChoice) -> Self {
        match c {
            CodecChoice::Mjpeg => Self::Mjpeg,
            CodecChoice::H264 => Self::H264,
        }
    }
}

fn parse_item(s: &str) -> Result<lineart::StitchItem, String> {
    match s.rsplit_once('=') {
        Some((path, secs)) => {
            let duration = secs
                .parse::<f64>()
                .map_err(|e| format!("invalid duration '{secs}': {e}"))?;
            Ok(lineart::StitchItem::new(path, duration))
        }
        None => Ok(lineart::StitchItem::new(s, 0.0)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .try_init();

    match cli.cmd {
        Command::Race(args) => cmd_race(args),
        Command::Stitch(args) => cmd_stitch(args),
        Command::Speed(args) => cmd_speed(args),
        Command::TextImage(args) => cmd_text_image(args),
    }
}

fn cmd_race(args: RaceArgs) -> anyhow::Result<()> {
    let race = lineart::RaceFile::from_path(&args.in_path)
        .with_context(|| format!("load race '{}'", args.in_path.display()))?;
    let report = lineart::render_race_to_file(&race, &args.out)?;
    for finish in &report.finishes {
        match finish.finish_frame {
            Some(frame) => eprintln!("{} finished on frame {}", finish.name, frame.0),
            None => eprintln!("{} did not finish ({:.2})", finish.name, finish.distance),
        }
    }
    let clip = report
        .clip
        .context("ffmpeg sink did not report an output file")?;
    eprintln!(
        "wrote {} ({} frames, {:?})",
        clip.path.display(),
        clip.frame_count,
        report.termination
    );
    if let Some(compressed) = args.compress {
        let small = clip.compress_h264(&compressed)?;
        eprintln!("wrote {}", small.path.display());
    }
    Ok(())
}

fn cmd_stitch(args: StitchArgs) -> anyhow::Result<()> {
    let mut opts = lineart::StitchOpts::new(lineart::Fps::whole(args.fps)?);
    opts.codec = args.codec.into();
    let clip = lineart::stitch(&args.items, &args.out, opts)?;
    eprintln!(
        "wrote {} ({}x{}, {} frames)",
        clip.path.display(),
        clip.width,
        clip.height,
        clip.frame_count
    );
    Ok(())
}

fn cmd_speed(args: SpeedArgs) -> anyhow::Result<()> {
    let clip = lineart::change_speed(&args.in_path, &args.out, args.factor)?;
    eprintln!(
        "wrote {} ({:.2}s)",
        clip.path.display(),
        clip.duration_secs()
    );
    Ok(())
}

fn cmd_text_image(args: TextImageArgs) -> anyhow::Result<()> {
    let mut opts = lineart::TextImageOpts::new(args.text.replace("\\n", "\n"), args.font);
    opts.width = args.width;
    opts.height = args.height;
    opts.font_scale = args.scale;
    opts.line_space = args.line_space;
    lineart::save_text_image(&opts, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
