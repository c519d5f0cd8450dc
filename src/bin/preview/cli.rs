// cli.rs - Argument parsing and the two render loops

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

use backdrop_engine::config::{RippleConfig, SceneConfig, SceneOptions};
use backdrop_engine::orbit::Orrery;
use backdrop_engine::ripple::{Impulse, RippleSim};

use crate::export;

/// Simulated wall clock per frame
const FRAME_MS: f64 = 16.0;

#[derive(Parser)]
#[command(name = "backdrop-preview", about = "Render the site backdrops headless to PNG frames")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Water ripple over the gradient backdrop, seeded with one press
    Ripple(RunArgs),
    /// Sun, planets, belt and starfield
    Orrery {
        #[command(flatten)]
        run: RunArgs,
        /// Hide the orbit paths
        #[arg(long)]
        hide_orbits: bool,
        /// Keep planets from spinning on their axes
        #[arg(long)]
        no_rotate: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    #[arg(long, default_value_t = 360)]
    pub height: u32,
    #[arg(long, default_value_t = 120)]
    pub frames: u32,
    /// Write a PNG every N frames
    #[arg(long, default_value_t = 30)]
    pub every: u32,
    /// JSON file with camelCase config fields, missing ones keep defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, default_value = "frames")]
    pub out: PathBuf,
}

impl RunArgs {
    fn check(&self) -> Result<()> {
        ensure!(self.width > 0 && self.height > 0, "width and height must be non-zero");
        Ok(())
    }

    fn due(&self, frame: u32) -> bool {
        frame % self.every.max(1) == 0
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Ripple(args) => ripple(&args),
        Command::Orrery { run, hide_orbits, no_rotate } => {
            let options = SceneOptions { show_orbits: !hide_orbits, auto_rotate: !no_rotate };
            orrery(&run, options)
        }
    }
}

fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else { return Ok(T::default()) };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn ripple(args: &RunArgs) -> Result<()> {
    args.check()?;
    let config: RippleConfig = load_config(args.config.as_deref())?;
    let mut sim = RippleSim::new(args.width, args.height, config);

    let press = sim.config().press;
    sim.impulse(Impulse::new(args.width as f32 / 2.0, args.height as f32 / 2.0, press.radius, press.strength));
    log::info!("ripple {}x{}, start energy {:.1}", args.width, args.height, sim.field().energy());

    let mut written = 0;
    for frame in 1..=args.frames {
        sim.tick(frame as f64 * FRAME_MS);
        if args.due(frame) {
            let path = export::write_png(&args.out, "ripple", frame, sim.width(), sim.height(), sim.pixels())?;
            log::debug!("wrote {}", path.display());
            written += 1;
        }
    }

    log::info!(
        "ripple done: {} frames, {written} written to {}, end energy {:.3}",
        args.frames,
        args.out.display(),
        sim.field().energy()
    );
    Ok(())
}

fn orrery(args: &RunArgs, options: SceneOptions) -> Result<()> {
    args.check()?;
    let config: SceneConfig = load_config(args.config.as_deref())?;
    let mut orrery = Orrery::new(args.width, args.height, config, options);
    log::info!("orrery {}x{}, {} bodies", args.width, args.height, orrery.scene().bodies().len());

    let mut written = 0;
    for frame in 1..=args.frames {
        orrery.tick();
        if args.due(frame) {
            let path = export::write_png(&args.out, "orrery", frame, orrery.width(), orrery.height(), orrery.pixels())?;
            log::debug!("wrote {}", path.display());
            written += 1;
        }
    }

    log::info!(
        "orrery done: t = {:.2}, {written} frames written to {}",
        orrery.scene().time(),
        args.out.display()
    );
    Ok(())
}
