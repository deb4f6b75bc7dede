use serde::Deserialize;
use serde::Serialize;

/// Options for a single emulation session. Front ends usually deserialize this from their own
/// config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emit a `trace` event with the disassembly of every executed instruction.
    pub trace_instructions: bool,
    /// Emit a `debug` event for every write into the cartridge ROM, which is discarded.
    pub report_rom_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            report_rom_writes: true,
        }
    }
}
