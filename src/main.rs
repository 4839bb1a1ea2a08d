use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use bgswitcher::constants::*;
use bgswitcher::sim::{SimDocument, SimLayer};
use bgswitcher::{Configuration, Controller, ImageSource, Layer, Point, Size};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "bgswitcher", version)]
struct Cli {
    /// Log ticks, switches and layer synthesis.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the rotation headless and print every image change.
    Simulate(SimulateArgs),
    /// Show the rotation in a window (Space toggles, R resets).
    #[cfg(feature = "viewer")]
    View(RotationArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    rotation: RotationArgs,

    /// Simulated time, in seconds.
    #[arg(long, default_value_t = 20.0)]
    duration: f32,
}

#[derive(Args, Debug)]
struct RotationArgs {
    /// Image URLs or paths, in rotation order.
    images: Vec<String>,

    /// JSON configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rotate every image of this directory, sorted by name.
    #[arg(long, conflicts_with = "template")]
    dir: Option<PathBuf>,

    /// Template URL; a counter is inserted before its extension.
    #[arg(long)]
    template: Option<String>,

    /// First template counter.
    #[arg(long, default_value_t = 1)]
    from: i64,

    /// Last template counter (inclusive).
    #[arg(long, default_value_t = 1)]
    to: i64,

    /// Milliseconds between switches.
    #[arg(long)]
    interval: Option<u64>,

    /// Cross-fade duration in milliseconds, 0 switches instantly.
    #[arg(long)]
    fade_speed: Option<u64>,

    /// Stop on the last image instead of wrapping around.
    #[arg(long)]
    no_loop: bool,

    /// Pick images at random.
    #[arg(long)]
    random: bool,

    /// Wait for a toggle before rotating.
    #[arg(long)]
    no_autostart: bool,

    /// Keep layer widths in sync with the target on resize.
    #[arg(long)]
    resize: bool,

    /// Element receiving the backgrounds.
    #[arg(long, value_enum, default_value_t = TargetChoice::Body)]
    target: TargetChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetChoice {
    /// The page body, wrapped so its content stays above the fade.
    Body,
    /// A panel inset in the page.
    Panel,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        #[cfg(feature = "viewer")]
        Command::View(args) => cmd_view(args),
    }
}

fn build_config(args: &RotationArgs) -> anyhow::Result<Configuration> {
    let mut config = match &args.config {
        Some(path) => Configuration::from_json_file(path)
            .with_context(|| format!("load configuration '{}'", path.display()))?,
        None => Configuration::default(),
    };

    if let Some(dir) = &args.dir {
        config.images = Some(ImageSource::from_dir(dir)?);
    } else if let Some(base) = &args.template {
        config.images = Some(ImageSource::template(base.as_str(), args.from, args.to));
    } else if !args.images.is_empty() {
        config.images = Some(ImageSource::list(args.images.iter().cloned()));
    }

    if let Some(ms) = args.interval {
        config.interval = Duration::from_millis(ms);
    }
    if let Some(ms) = args.fade_speed {
        config.fade_speed = Duration::from_millis(ms);
    }
    if args.no_loop {
        config.looping = false;
    }
    if args.random {
        config.random = true;
    }
    if args.no_autostart {
        config.auto_start = false;
    }
    if args.resize {
        config.resize = true;
    }
    Ok(config)
}

fn make_document(choice: TargetChoice) -> (SimDocument, SimLayer) {
    let viewport = Size::new(VIEW_WIDTH as f64, VIEW_HEIGHT as f64);
    let mut document = SimDocument::new(viewport);
    let body = document.body();
    let target = match choice {
        TargetChoice::Body => body,
        TargetChoice::Panel => {
            let panel = document.append_element(&body, "section");
            panel.set_offset(Point::new(viewport.width * 0.1, viewport.height * 0.1));
            panel.set_size(Size::new(viewport.width * 0.8, viewport.height * 0.8));
            panel
        }
    };
    (document, target)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = build_config(&args.rotation)?;
    let (mut document, target) = make_document(args.rotation.target);
    let mut controller =
        Controller::new(&mut document, target, config).context("start rotation")?;

    println!("0.000s  #{}  {}", controller.current_index(), controller.current_image());

    let step = Duration::from_secs_f32(FRAME_TIME);
    let frames = (args.duration.max(0.0) / FRAME_TIME).ceil() as u64;
    let mut shown = controller.current_index();
    let mut running = controller.is_running();
    let mut elapsed = Duration::ZERO;

    for _ in 0..frames {
        controller.update(step);
        elapsed += step;

        if controller.current_index() != shown {
            shown = controller.current_index();
            println!(
                "{:.3}s  #{}  {}",
                elapsed.as_secs_f64(),
                shown,
                controller.current_image()
            );
        }
        if controller.is_running() != running {
            running = controller.is_running();
            println!(
                "{:.3}s  {}",
                elapsed.as_secs_f64(),
                if running { "started" } else { "stopped" }
            );
        }
    }
    Ok(())
}

#[cfg(feature = "viewer")]
fn cmd_view(args: RotationArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let (document, target) = make_document(args.target);
    bgswitcher::viewer::run(document, target, config)
}
