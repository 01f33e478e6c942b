use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use framestyle::logging::{LoggingConfig, init_logging};
use framestyle::transform::{PastelPreset, WarmPreset, WatermarkSpec};
use framestyle::{
    Fps, Frame, FrameCtx, FrameIndex, Progress, RainDensity, RunRequest, Style, StyleConfig,
    compose, process_video,
};

#[derive(Parser, Debug)]
#[command(name = "framestyle", version, about = "Apply visual styles to video frames")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stylize a video file (requires `ffmpeg` and `ffprobe` on PATH).
    Video(VideoArgs),
    /// Stylize a single image and write it as PNG.
    Frame(FrameArgs),
    /// List style and rain identifiers.
    Styles,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PastelArg {
    Soft,
    Vivid,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WarmArg {
    Subtle,
    Cinematic,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Style id (none, cartoon, pastel, warm). Unknown ids apply no style.
    #[arg(long, default_value = "none")]
    style: String,

    /// Rain level (none, light, medium, heavy).
    #[arg(long, default_value = "none")]
    rain: String,

    /// JSON file with tunings; unset fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pastel preset, overriding the config file.
    #[arg(long, value_enum)]
    pastel_preset: Option<PastelArg>,

    /// Warm preset, overriding the config file.
    #[arg(long, value_enum)]
    warm_preset: Option<WarmArg>,

    /// Disable warm film grain.
    #[arg(long, default_value_t = false)]
    no_grain: bool,

    /// Seed for grain and rain.
    #[arg(long)]
    seed: Option<u64>,
}

impl StyleArgs {
    fn load_config(&self) -> anyhow::Result<StyleConfig> {
        let mut cfg = match &self.config {
            Some(path) => StyleConfig::from_path(path)?,
            None => StyleConfig::default(),
        };
        if let Some(p) = self.pastel_preset {
            cfg = cfg.with_pastel_preset(match p {
                PastelArg::Soft => PastelPreset::Soft,
                PastelArg::Vivid => PastelPreset::Vivid,
            });
        }
        if let Some(w) = self.warm_preset {
            cfg = cfg.with_warm_preset(match w {
                WarmArg::Subtle => WarmPreset::Subtle,
                WarmArg::Cinematic => WarmPreset::Cinematic,
            });
        }
        if self.no_grain {
            cfg.warm.grain = None;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    /// Burn a scrolling text label into a second output file.
    #[arg(long)]
    watermark: Option<String>,

    /// Font file for the watermark.
    #[arg(long, requires = "watermark")]
    font: Option<PathBuf>,

    /// Watermark scroll speed in pixels per second.
    #[arg(long, requires = "watermark")]
    watermark_speed: Option<f32>,

    /// x264 constant rate factor.
    #[arg(long)]
    crf: Option<u8>,

    /// Drop the input's audio track.
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    /// Do not print progress.
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input image (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    /// Frame index used to seed grain and rain.
    #[arg(long, default_value_t = 0)]
    index: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });
    match cli.cmd {
        Command::Video(args) => cmd_video(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Styles => cmd_styles(),
    }
}

fn cmd_styles() -> anyhow::Result<()> {
    println!("styles:");
    for s in Style::ALL {
        println!("  {:<8} {}", s.id(), s.describe());
    }
    println!("rain:");
    for r in RainDensity::ALL {
        println!("  {}", r.id());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.style.load_config()?;
    let style = Style::from_id(&args.style.style);
    let rain = RainDensity::from_id(&args.style.rain);
    let chain = compose(style, rain, &cfg);

    let img = image::open(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?
        .to_rgb8();
    let frame = Frame::from_rgb_image(img);
    let ctx = FrameCtx::new(FrameIndex(args.index), Fps::new(30, 1)?, cfg.seed);
    let styled = chain.apply(&frame, &ctx)?;

    ensure_parent(&args.out)?;
    styled
        .to_rgb_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {} ({})", args.out.display(), chain.describe());
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let mut cfg = args.style.load_config()?;
    if args.crf.is_some() {
        cfg.encode.crf = args.crf;
    }

    let watermark = args.watermark.map(|text| {
        let mut spec = WatermarkSpec::new(text);
        spec.font_file = args.font.clone();
        if let Some(speed) = args.watermark_speed {
            spec.speed_px_per_sec = speed;
        }
        spec
    });

    let req = RunRequest {
        input: args.in_path,
        output: args.out,
        style: Style::from_id(&args.style.style),
        rain: RainDensity::from_id(&args.style.rain),
        watermark,
        keep_audio: !args.no_audio,
        config: cfg,
    };

    let progress = Progress::new();
    let done = AtomicBool::new(false);
    let result = std::thread::scope(|scope| {
        if !args.quiet {
            let reader = progress.clone();
            let done = &done;
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    print_progress(&reader);
                    std::thread::sleep(Duration::from_millis(250));
                }
                print_progress(&reader);
                eprintln!();
            });
        }
        let res = process_video(&req, &progress);
        done.store(true, Ordering::Release);
        res
    });
    let report = result?;

    if let Some(Err(err)) = &report.watermark {
        eprintln!("warning: {err}");
    }
    eprintln!(
        "wrote {} ({} frames, {}, {:.2}s)",
        report.final_output().display(),
        report.frames,
        report.chain,
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

fn print_progress(progress: &Progress) {
    let s = progress.snapshot();
    if s.total == 0 {
        return;
    }
    eprint!(
        "\rstyling frames: {}/{} ({:>3.0}%)",
        s.processed,
        s.total,
        s.fraction() * 100.0
    );
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
