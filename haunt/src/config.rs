use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;

/// The runner's configuration file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The default `tracing` filter. `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// The number of frames to run before reporting.
    pub frames: u32,
    /// Frames are paced to this rate. Without it, the emulator runs as fast as it can.
    pub fps: Option<u32>,
    pub emulator: wisp::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_owned(),
            frames: 60,
            fps: None,
            emulator: wisp::Config::default(),
        }
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file() {
        let config = Config::parse(
            r#"
            frames = 5
            fps = 60

            [emulator]
            trace_instructions = true
            "#,
        )
        .unwrap();
        assert_eq!(config.frames, 5);
        assert_eq!(config.fps, Some(60));
        assert_eq!(config.log_filter, "info");
        assert!(config.emulator.trace_instructions);
        assert!(config.emulator.report_rom_writes);
    }

    #[test]
    fn round_trip() {
        let config = Config {
            fps: Some(30),
            ..Config::default()
        };
        let data = toml::to_string(&config).unwrap();
        assert_eq!(Config::parse(&data).unwrap(), config);
    }
}
