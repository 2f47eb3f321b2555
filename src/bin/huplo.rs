use std::{
    fs::File,
    io::{BufRead as _, BufReader},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "huplo", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a timed command script over a synthetic video stream, writing PNG frames.
    Render(RenderArgs),
    /// Validate a serialized queue config and print it with defaults filled in.
    CheckConfig(CheckConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON-lines command script; each line is a command plus an `at_s` timestamp.
    #[arg(long)]
    script: PathBuf,

    /// Directory for `frame_NNNNN.png` output.
    #[arg(long)]
    out_dir: PathBuf,

    /// Overlay config JSON (font, canvas, initial queues).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file; overrides `font_path` from the config.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    fps: Option<u32>,

    /// Number of frames to render.
    #[arg(long, default_value_t = 300)]
    frames: u64,
}

#[derive(Parser, Debug)]
struct CheckConfigArgs {
    /// Queue config JSON file.
    path: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct ScriptLine {
    at_s: f64,
    #[serde(flatten)]
    cmd: huplo::Command,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("huplo=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_script(path: &Path) -> anyhow::Result<Vec<ScriptLine>> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let mut lines = Vec::new();
    for (idx, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read script '{}'", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let entry: ScriptLine = serde_json::from_str(line)
            .with_context(|| format!("parse script line {}", idx + 1))?;
        if !entry.at_s.is_finite() || entry.at_s < 0.0 {
            anyhow::bail!("script line {}: at_s must be finite and >= 0", idx + 1);
        }
        lines.push(entry);
    }
    lines.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
    Ok(lines)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => huplo::OverlayConfig::from_path(path)?,
        None => huplo::OverlayConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if args.font.is_some() {
        cfg.font_path = args.font.clone();
    }
    cfg.validate()?;

    let font_path = cfg
        .font_path
        .clone()
        .context("no font given; pass --font or set font_path in the config")?;
    let painter = huplo::CpuTextPainter::from_font_file(&font_path)?;
    tracing::info!(family = painter.family_name(), "font loaded");

    let script = read_script(&args.script)?;
    let manager = huplo::SharedQueueManager::new(cfg.build_manager());
    let mut pipeline = huplo::OverlayPipeline::new(manager.clone(), painter);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let canvas = huplo::Canvas::new(cfg.canvas.width, cfg.canvas.height)?;
    let mut pending = script.into_iter().peekable();
    for i in 0..args.frames {
        let t = i as f64 / f64::from(cfg.fps);
        while let Some(entry) = pending.next_if(|e| e.at_s <= t) {
            if let Err(err) = manager.apply(entry.cmd) {
                tracing::warn!(at_s = entry.at_s, error = %err, "command ignored");
            }
        }

        let mut frame = huplo::FrameRgba::solid(canvas, cfg.clear_rgba);
        pipeline.process_frame(&mut frame, t);

        let out = args.out_dir.join(format!("frame_{i:05}.png"));
        image::save_buffer_with_format(
            &out,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
    }

    eprintln!("wrote {} frames to {}", args.frames, args.out_dir.display());
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("read queue config '{}'", args.path.display()))?;
    let cfg = huplo::QueueConfig::from_json(&text)?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}
