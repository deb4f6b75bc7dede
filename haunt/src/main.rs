//! Runs a cartridge image headlessly for a number of frames, then reports the machine state.

use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;
use wisp::Gameboy;

pub mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// The cartridge image to run.
    rom: PathBuf,
    /// A TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// The number of frames to run. Overrides the configuration file.
    #[arg(long)]
    frames: Option<u32>,
    /// Log every executed instruction.
    #[arg(long)]
    trace: bool,
    /// Pace the frames to this rate. Overrides the configuration file.
    #[arg(long)]
    fps: Option<u32>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(fps) = self.fps {
            config.fps = Some(fps);
        }
        if self.trace {
            config.emulator.trace_instructions = true;
            config.log_filter = format!("{},wisp=trace", config.log_filter);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::read(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .compact()
        .init();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM {}", args.rom.display()))?;
    let mut gb = Gameboy::with_config(&rom, config.emulator.clone())?;
    info!("Running {} frames", config.frames);

    let frame_time = config
        .fps
        .filter(|fps| *fps > 0)
        .map(|fps| Duration::from_secs(1) / fps);
    for frame in 0..config.frames {
        let start = Instant::now();
        gb.next_frame()?;
        debug!("Frame {frame} done at {} cycles", gb.cycles());
        if let Some(rest) = frame_time.and_then(|time| time.checked_sub(start.elapsed())) {
            std::thread::sleep(rest);
        }
    }

    report(&gb);
    Ok(())
}

fn report(gb: &Gameboy) {
    println!("Title: {}", gb.header().title);
    println!("Cycles: {}", gb.cycles());
    println!("{}", gb.cpu);
    println!("LY={} Mode={}", gb.ppu.ly(), gb.ppu.mode());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args =
            Args::try_parse_from(["haunt", "game.gb", "--frames", "3", "--trace", "--fps", "30"])
                .unwrap();
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.frames, 3);
        assert_eq!(config.fps, Some(30));
        assert!(config.emulator.trace_instructions);
        assert_eq!(config.log_filter, "info,wisp=trace");
    }

    #[test]
    fn config_is_kept_without_flags() {
        let args = Args::try_parse_from(["haunt", "game.gb"]).unwrap();
        let mut config = Config {
            frames: 10,
            ..Config::default()
        };
        args.apply(&mut config);
        assert_eq!(config.frames, 10);
        assert_eq!(config.fps, None);
        assert!(!config.emulator.trace_instructions);
    }
}
