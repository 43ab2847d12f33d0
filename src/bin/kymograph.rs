use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

use kymograph::{FrameIndex, GrayStack, InterpMode, KymoConfig, KymoSession, Point, Polyline};

#[derive(Parser, Debug)]
#[command(name = "kymograph", version, about = "Build a kymograph along a moving path")]
struct Cli {
    /// Frame images, in stack order.
    #[arg(long, num_args = 1.., required = true)]
    frames: Vec<PathBuf>,

    /// Key frame as `<FRAME>:<x>,<y>;<x>,<y>...` (1-based frame). Repeatable.
    #[arg(long = "key", required = true)]
    keys: Vec<String>,

    /// Number of parallel paths averaged per sample (odd).
    #[arg(long)]
    line_width: Option<u32>,

    /// Align rows on this vertex of the path.
    #[arg(long)]
    anchor: Option<usize>,

    /// Repeat the earlier key frame instead of interpolating.
    #[arg(long)]
    hold: bool,

    /// Compute rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// JSON config file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = resolve_config(&cli)?;
    let stack = load_stack(&cli.frames)?;

    let mut session = KymoSession::new(cli.frames.len())?.with_mode(cfg.interp_mode);
    for arg in &cli.keys {
        let (frame, polyline) = parse_key(arg)?;
        session
            .record_key_frame(frame, &polyline)
            .with_context(|| format!("record key frame '{arg}'"))?;
    }
    if let Some(vertex) = cfg.anchor_vertex {
        session.set_anchor(vertex)?;
    }

    let kymo = session.make_kymograph(&stack, cfg.line_width()?, &cfg.assemble_opts())?;
    tracing::info!(width = kymo.width(), height = kymo.height(), "kymograph assembled");

    if let Some(parent) = cli.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    kymo.to_image()?
        .save(&cli.out)
        .with_context(|| format!("write image '{}'", cli.out.display()))?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<KymoConfig> {
    let mut cfg = match &cli.config {
        Some(path) => KymoConfig::from_json_file(path)?,
        None => KymoConfig::default(),
    };
    if let Some(w) = cli.line_width {
        cfg.line_width = w;
    }
    if cli.anchor.is_some() {
        cfg.anchor_vertex = cli.anchor;
    }
    if cli.hold {
        cfg.interp_mode = InterpMode::Hold;
    }
    if cli.parallel {
        cfg.parallel = true;
    }
    if cli.threads.is_some() {
        cfg.threads = cli.threads;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_stack(paths: &[PathBuf]) -> anyhow::Result<GrayStack> {
    let images = paths
        .iter()
        .map(|p| open_frame(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(GrayStack::from_images(images)?)
}

fn open_frame(path: &Path) -> anyhow::Result<image::DynamicImage> {
    image::open(path).with_context(|| format!("open frame '{}'", path.display()))
}

fn parse_key(arg: &str) -> anyhow::Result<(FrameIndex, Polyline)> {
    let (frame, coords) = arg
        .split_once(':')
        .with_context(|| format!("key '{arg}' must look like FRAME:x,y;x,y"))?;
    let frame: u64 = frame
        .trim()
        .parse()
        .with_context(|| format!("parse frame number in key '{arg}'"))?;

    let points = coords
        .split(';')
        .filter(|s| !s.trim().is_empty())
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .with_context(|| format!("vertex '{pair}' must look like x,y"))?;
            let x: f64 = x.trim().parse().with_context(|| format!("parse x in '{pair}'"))?;
            let y: f64 = y.trim().parse().with_context(|| format!("parse y in '{pair}'"))?;
            Ok(Point::new(x, y))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok((FrameIndex(frame), Polyline::new(points)))
}
