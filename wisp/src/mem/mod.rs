use serde::Serialize;
use serde_with::serde_as;
use tracing::debug;
use tracing::trace;

use crate::interrupt::Interrupt;

pub mod io;

use io::*;

/// The size of the flat address space.
pub const ADDRESS_SPACE: usize = 0x1_0000;
/// The largest cartridge image that is mapped directly into the address space.
pub const ROM_LEN: usize = VRAM_START as usize;

/// This trait is used to abstract over the memory map. Besides the full `MemoryMap`, tests use a
/// flat byte vector.
pub trait MemoryLike {
    fn read_byte(&self, addr: u16) -> u8;

    fn write_byte(&mut self, addr: u16, val: u8);
}

/// The `impl FnOnce` in `update_byte` would make `MemoryLike` non-object safe, which is needed
/// for instruction parsing.
pub trait MemoryLikeExt: MemoryLike {
    fn update_byte(&mut self, addr: u16, op: impl FnOnce(&mut u8)) -> u8 {
        let mut val = self.read_byte(addr);
        op(&mut val);
        self.write_byte(addr, val);
        val
    }

    /// Sets the interrupt's bit in the requested interrupts bitmap.
    fn request_interrupt(&mut self, int: Interrupt) {
        self.update_byte(INTERRUPT_FLAGS, |flags| *flags |= int.mask());
    }
}

/// The full 64KB address space. Reads are plain loads. Writes are routed by address since a
/// handful of registers have side effects.
#[serde_as]
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize)]
pub struct MemoryMap {
    #[serde_as(as = "serde_with::Bytes")]
    data: Box<[u8]>,
    /// Set whenever software writes to the divider register. The timer takes this latch so it can
    /// restart its own sub-counter alongside the register.
    divider_reset: bool,
    /// Whether discarded ROM writes are reported.
    report_rom_writes: bool,
}

impl MemoryLike for MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        trace!("Write 0x{val:0>2X} -> 0x{addr:0>4X}");
        match addr {
            0x0000..=0x7FFF => {
                if self.report_rom_writes {
                    debug!("Discarding write of 0x{val:0>2X} to ROM address 0x{addr:0>4X}");
                }
            }
            DIVIDER => {
                self.data[DIVIDER as usize] = 0;
                self.divider_reset = true;
            }
            LCD_STATUS => selective_write(
                &mut self.data[LCD_STATUS as usize],
                LCD_STATUS_WRITABLE,
                val,
            ),
            OAM_DMA => {
                self.data[OAM_DMA as usize] = val;
                self.oam_dma(val);
            }
            n => self.data[n as usize] = val,
        }
    }
}

impl MemoryLikeExt for MemoryMap {}

impl MemoryMap {
    /// Constructs the address space from a cartridge image. Only the first 32KB of the image are
    /// mapped, everything else starts zeroed.
    pub fn new(rom: &[u8]) -> Self {
        let mut digest = Self::construct();
        let len = rom.len().min(ROM_LEN);
        digest.data[..len].copy_from_slice(&rom[..len]);
        digest
    }

    /// Creates an empty address space. Notably, this will not have a ROM header, so it is not
    /// bootable on its own.
    pub fn construct() -> Self {
        Self {
            data: vec![0; ADDRESS_SPACE].into_boxed_slice(),
            divider_reset: false,
            report_rom_writes: true,
        }
    }

    pub fn set_report_rom_writes(&mut self, report: bool) {
        self.report_rom_writes = report;
    }

    /// Copies 160 bytes from `page * 0x100` into the object attribute memory. The real transfer
    /// takes 160 machine cycles during which the CPU can only access high RAM. Here it happens
    /// all at once.
    fn oam_dma(&mut self, page: u8) {
        let src = u16::from_be_bytes([page, 0x00]) as usize;
        let dest = OAM_START as usize;
        let len = OAM_LEN as usize;
        debug!("OAM DMA from 0x{src:0>4X}");
        // Sources above 0xFF60 would run off the end of the address space
        for i in 0..len {
            self.data[dest + i] = self.data[(src + i) % ADDRESS_SPACE];
        }
    }

    /// Used by the display timing controller, which is the only writer of the scanline counter.
    pub(crate) fn set_lcd_y(&mut self, ly: u8) {
        self.data[LCD_Y as usize] = ly;
    }

    /// Used by the display timing controller to update the mode and coincidence bits, which are
    /// read-only to software.
    pub(crate) fn set_lcd_status_low(&mut self, bits: u8) {
        selective_write(
            &mut self.data[LCD_STATUS as usize],
            LCD_STATUS_READ_ONLY,
            bits,
        );
    }

    /// Used by the timer to increment the divider since any normal write resets it.
    pub(crate) fn set_divider(&mut self, val: u8) {
        self.data[DIVIDER as usize] = val;
    }

    /// Returns whether software reset the divider since the last call.
    pub(crate) fn take_divider_reset(&mut self) -> bool {
        std::mem::take(&mut self.divider_reset)
    }

    /// The requested interrupts bitmap.
    pub fn interrupt_flags(&self) -> u8 {
        self.read_byte(INTERRUPT_FLAGS)
    }

    /// The enabled interrupts bitmap.
    pub fn interrupt_enable(&self) -> u8 {
        self.read_byte(INTERRUPT_ENABLE)
    }
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::construct()
    }
}

#[cfg(test)]
impl MemoryLike for Vec<u8> {
    fn read_byte(&self, addr: u16) -> u8 {
        self[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        self[addr as usize] = val;
    }
}

#[cfg(test)]
impl MemoryLikeExt for Vec<u8> {}
