//! Wisp is the core crate of the haunt project. Contained here is the logic for running a
//! Gameboy ROM: the SM83 CPU, the 64KB bus and its I/O side effects, the interrupt controller,
//! and the timing of the display and timers. Nothing is rendered and no I/O is performed, so
//! front ends drive the `Gameboy` and read back whatever state they need.
//!
//! # Notes
//! Values are little-endian in memory, but register pairs are named high byte first (e.g. `B`
//! is the high byte of `BC`).

use heapless::HistoryBuffer;
use serde::Serialize;
use tracing::error;
use tracing::trace;

pub mod config;
pub mod cpu;
pub mod error;
pub mod instruction;
pub mod interrupt;
pub mod lookup;
pub mod mem;
pub mod ppu;
pub mod rom;
pub mod timer;

pub use config::Config;
pub use error::CartridgeError;
pub use error::DecodeError;
pub use error::Error;

use cpu::Cpu;
use lookup::parse_instruction;
use mem::MemoryMap;
use ppu::DisplayTimingController;
use rom::Cartridge;
use rom::CartridgeHeader;
use timer::Timer;

/// The number of recently executed program counters kept for error reports.
pub const HISTORY_LEN: usize = 32;

/// This is the core emulation primative. It contains the entire state machine of the emulated
/// handheld and is agnostic to usecase and how it is rendered (if at all). Notably, the `Gameboy`
/// does not provide a `run` or analogous method. It must be stepped forward.
///
/// This allows managing tick rate, processing IO, and more to be done externally.
#[derive(Debug, Clone, Serialize)]
pub struct Gameboy {
    pub cpu: Cpu,
    pub mem: MemoryMap,
    pub ppu: DisplayTimingController,
    pub timer: Timer,
    header: CartridgeHeader,
    config: Config,
    #[serde(skip)]
    history: HistoryBuffer<u16, HISTORY_LEN>,
    cycles: u64,
}

impl Gameboy {
    /// Validates the cartridge image and constructs the machine in its power-on state.
    pub fn new(rom: &[u8]) -> Result<Self, CartridgeError> {
        Self::with_config(rom, Config::default())
    }

    pub fn with_config(rom: &[u8], config: Config) -> Result<Self, CartridgeError> {
        let cart = Cartridge::new(rom)?;
        let mut mem = MemoryMap::new(cart.data());
        mem.set_report_rom_writes(config.report_rom_writes);
        Ok(Self {
            cpu: Cpu::new(),
            mem,
            ppu: DisplayTimingController::new(),
            timer: Timer::new(),
            header: cart.header().clone(),
            config,
            history: HistoryBuffer::new(),
            cycles: 0,
        })
    }

    /// Steps the CPU once then moves the timer and display forward by the cycles it took.
    pub fn step(&mut self) -> Result<u8, DecodeError> {
        self.tick().map(|(cycles, _)| cycles)
    }

    /// Steps the gameboy until the display enters its vertical blank.
    pub fn next_frame(&mut self) -> Result<(), DecodeError> {
        while !self.tick()?.1 {}
        Ok(())
    }

    fn tick(&mut self) -> Result<(u8, bool), DecodeError> {
        let pc = self.cpu.regs.pc;
        let running = self.cpu.state.is_running();
        if running && self.config.trace_instructions {
            if let Ok(instr) = parse_instruction(&self.mem, pc) {
                trace!("0x{pc:0>4X}: {instr}");
            }
        }
        let cycles = match self.cpu.step(&mut self.mem) {
            Ok(cycles) => cycles,
            Err(err) => {
                error!("{err}, recent program counters: {}", self.pc_trail());
                return Err(err);
            }
        };
        if running {
            self.history.write(pc);
        }
        self.timer.advance(&mut self.mem, cycles);
        let vblank = self.ppu.advance(&mut self.mem, cycles);
        self.cycles += cycles as u64;
        Ok((cycles, vblank))
    }

    fn pc_trail(&self) -> String {
        self.recent_pcs()
            .map(|pc| format!("0x{pc:0>4X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The total number of machine cycles stepped through.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The program counters of the most recent steps, oldest first.
    pub fn recent_pcs(&self) -> impl Iterator<Item = u16> + '_ {
        self.history.oldest_ordered().copied()
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
