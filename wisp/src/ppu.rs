use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::cpu::check_bit_const;
use crate::interrupt::Interrupt;
use crate::mem::io::LCD_STATUS;
use crate::mem::io::LCD_Y_COMPARE;
use crate::mem::MemoryLike;
use crate::mem::MemoryLikeExt;
use crate::mem::MemoryMap;

/// The number of dots in a machine cycle.
pub const DOTS_PER_CYCLE: u16 = 4;
/// Every scanline, visible or not, takes this many dots.
pub const DOTS_PER_SCANLINE: u16 = 456;
/// The number of visible scanlines. The scanlines after these form the vertical blank.
pub const VISIBLE_SCANLINES: u8 = 144;
/// The last scanline of the vertical blank.
pub const LAST_SCANLINE: u8 = 153;
/// The machine cycles in one full frame.
pub const CYCLES_PER_FRAME: u32 =
    (DOTS_PER_SCANLINE as u32 * (LAST_SCANLINE as u32 + 1)) / DOTS_PER_CYCLE as u32;

/// The mode code reported in the bottom two bits of the LCD status register.
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum PpuMode {
    /// Also refered to as "Mode 0" in the pandocs.
    HBlank = 0,
    /// Also refered to as "Mode 1" in the pandocs.
    VBlank = 1,
    /// Also refered to as "Mode 2" in the pandocs.
    #[default]
    OamScan = 2,
    /// Also refered to as "Mode 3" in the pandocs.
    Drawing = 3,
}

impl PpuMode {
    /// The LCD status bit that allows this mode to raise the LCD interrupt. Drawing has no such
    /// bit.
    fn interrupt_source_enabled(self, status: u8) -> bool {
        match self {
            PpuMode::HBlank => check_bit_const::<3>(status),
            PpuMode::VBlank => check_bit_const::<4>(status),
            PpuMode::OamScan => check_bit_const::<5>(status),
            PpuMode::Drawing => false,
        }
    }
}

/// The state machine behind the display timing. Each state counts the dots spent in it so far.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum PpuInner {
    OamScan { dots: u16 },
    Drawing { dots: u16 },
    HBlank { dots: u16 },
    /// One of the ten scanlines of the vertical blank.
    VBlank { dots: u16 },
}

impl Default for PpuInner {
    fn default() -> Self {
        Self::OamScan { dots: 0 }
    }
}

impl PpuInner {
    fn state(&self) -> PpuMode {
        match self {
            PpuInner::OamScan { .. } => PpuMode::OamScan,
            PpuInner::Drawing { .. } => PpuMode::Drawing,
            PpuInner::HBlank { .. } => PpuMode::HBlank,
            PpuInner::VBlank { .. } => PpuMode::VBlank,
        }
    }

    /// The number of dots this state lasts. The three visible phases add up to one scanline.
    const fn budget(&self) -> u16 {
        match self {
            PpuInner::OamScan { .. } => 80,
            PpuInner::Drawing { .. } => 172,
            PpuInner::HBlank { .. } => 204,
            PpuInner::VBlank { .. } => DOTS_PER_SCANLINE,
        }
    }

    fn dots_mut(&mut self) -> &mut u16 {
        match self {
            PpuInner::OamScan { dots }
            | PpuInner::Drawing { dots }
            | PpuInner::HBlank { dots }
            | PpuInner::VBlank { dots } => dots,
        }
    }
}

/// Tracks where the display is within a frame and keeps the scanline counter, LCD status mode
/// and coincidence bits, and the display-related interrupt requests in sync with it.
///
/// Nothing is rendered. The controller runs whether or not the LCD is enabled.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTimingController {
    inner: PpuInner,
    /// The current scanline, mirrored into LY.
    ly: u8,
    /// The combined LCD interrupt line from the last update. A request is only made when this
    /// goes from low to high.
    stat_line: bool,
}

impl DisplayTimingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PpuMode {
        self.inner.state()
    }

    pub fn ly(&self) -> u8 {
        self.ly
    }

    /// Advances the display by the given number of machine cycles. Returns true if the vertical
    /// blank was entered.
    pub fn advance(&mut self, mem: &mut MemoryMap, cycles: u8) -> bool {
        // Software might have changed LYC or the status enable bits since the last call
        self.update_status(mem);
        let mut dots = cycles as u16 * DOTS_PER_CYCLE;
        let mut entered_vblank = false;
        loop {
            let budget = self.inner.budget();
            let elapsed = self.inner.dots_mut();
            let remaining = budget - *elapsed;
            if dots < remaining {
                *elapsed += dots;
                break;
            }
            dots -= remaining;
            entered_vblank |= self.transition(mem);
            self.update_status(mem);
        }
        self.update_status(mem);
        entered_vblank
    }

    fn transition(&mut self, mem: &mut MemoryMap) -> bool {
        let mut entered_vblank = false;
        self.inner = match self.inner {
            PpuInner::OamScan { .. } => PpuInner::Drawing { dots: 0 },
            PpuInner::Drawing { .. } => PpuInner::HBlank { dots: 0 },
            PpuInner::HBlank { .. } if self.ly == VISIBLE_SCANLINES - 1 => {
                self.ly += 1;
                trace!("Entering vertical blank");
                mem.request_interrupt(Interrupt::VBlank);
                entered_vblank = true;
                PpuInner::VBlank { dots: 0 }
            }
            PpuInner::HBlank { .. } => {
                self.ly += 1;
                PpuInner::OamScan { dots: 0 }
            }
            PpuInner::VBlank { .. } if self.ly == LAST_SCANLINE => {
                self.ly = 0;
                PpuInner::OamScan { dots: 0 }
            }
            PpuInner::VBlank { .. } => {
                self.ly += 1;
                PpuInner::VBlank { dots: 0 }
            }
        };
        entered_vblank
    }

    /// Writes LY and the low status bits, then requests the LCD interrupt on a rising edge of
    /// the combined interrupt line.
    fn update_status(&mut self, mem: &mut MemoryMap) {
        let mode = self.mode();
        let coincidence = self.ly == mem.read_byte(LCD_Y_COMPARE);
        mem.set_lcd_y(self.ly);
        mem.set_lcd_status_low(mode as u8 | (coincidence as u8) << 2);
        let status = mem.read_byte(LCD_STATUS);
        let line = (coincidence && check_bit_const::<6>(status))
            || mode.interrupt_source_enabled(status);
        if line && !self.stat_line {
            trace!("LCD interrupt requested on scanline {} in {mode}", self.ly);
            mem.request_interrupt(Interrupt::LCD);
        }
        self.stat_line = line;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::io::INTERRUPT_FLAGS;
    use crate::mem::io::LCD_Y;

    fn take_lcd_request(mem: &mut MemoryMap) -> bool {
        let flags = mem.interrupt_flags();
        mem.write_byte(INTERRUPT_FLAGS, flags & !Interrupt::LCD.mask());
        flags & Interrupt::LCD.mask() != 0
    }

    #[test]
    fn scanline_timing() {
        let mut mem = MemoryMap::construct();
        let mut ppu = DisplayTimingController::new();
        assert!(!ppu.advance(&mut mem, 19));
        assert_eq!(ppu.mode(), PpuMode::OamScan);
        ppu.advance(&mut mem, 1);
        assert_eq!(ppu.mode(), PpuMode::Drawing);
        assert_eq!(mem.read_byte(LCD_STATUS) & 0b11, 3);
        ppu.advance(&mut mem, 43);
        assert_eq!(ppu.mode(), PpuMode::HBlank);
        assert_eq!(mem.read_byte(LCD_STATUS) & 0b11, 0);
        ppu.advance(&mut mem, 50);
        assert_eq!(ppu.ly(), 0);
        ppu.advance(&mut mem, 1);
        assert_eq!(ppu.mode(), PpuMode::OamScan);
        assert_eq!(ppu.ly(), 1);
        assert_eq!(mem.read_byte(LCD_Y), 1);
    }

    #[test]
    fn leftover_dots_carry_over() {
        let mut mem = MemoryMap::construct();
        let mut ppu = DisplayTimingController::new();
        // 114 cycles in uneven chunks is still exactly one scanline
        for _ in 0..19 {
            ppu.advance(&mut mem, 6);
        }
        assert_eq!(ppu.ly(), 1);
        assert_eq!(ppu.mode(), PpuMode::OamScan);
    }

    #[test]
    fn vblank_after_last_visible_line() {
        let mut mem = MemoryMap::construct();
        let mut ppu = DisplayTimingController::new();
        for _ in 0..143 {
            assert!(!ppu.advance(&mut mem, 114));
        }
        assert_eq!(ppu.ly(), 143);
        assert!(!ppu.advance(&mut mem, 113));
        assert_eq!(ppu.mode(), PpuMode::HBlank);
        assert!(ppu.advance(&mut mem, 1));
        assert_eq!(ppu.mode(), PpuMode::VBlank);
        assert_eq!(ppu.ly(), 144);
        assert_eq!(mem.read_byte(LCD_STATUS) & 0b11, 1);
        assert_ne!(mem.interrupt_flags() & Interrupt::VBlank.mask(), 0);
    }

    #[test]
    fn full_frame() {
        let mut mem = MemoryMap::construct();
        let mut ppu = DisplayTimingController::new();
        let mut cycles = 0;
        let mut vblanks = 0;
        while cycles < CYCLES_PER_FRAME {
            vblanks += ppu.advance(&mut mem, 4) as u32;
            cycles += 4;
        }
        assert_eq!(CYCLES_PER_FRAME, 17556);
        assert_eq!(vblanks, 1);
        assert_eq!(ppu.ly(), 0);
        assert_eq!(ppu.mode(), PpuMode::OamScan);
        assert_eq!(ppu, DisplayTimingController::new());
    }

    #[test]
    fn coincidence_requests_once() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(LCD_Y_COMPARE, 2);
        mem.write_byte(LCD_STATUS, 0b0100_0000);
        let mut ppu = DisplayTimingController::new();
        ppu.advance(&mut mem, 114);
        assert!(!take_lcd_request(&mut mem));
        assert_eq!(mem.read_byte(LCD_STATUS) & 0b100, 0);
        ppu.advance(&mut mem, 114);
        assert_eq!(ppu.ly(), 2);
        assert!(take_lcd_request(&mut mem));
        assert_ne!(mem.read_byte(LCD_STATUS) & 0b100, 0);
        ppu.advance(&mut mem, 100);
        assert!(!take_lcd_request(&mut mem));
    }

    #[test]
    fn coincidence_needs_enable_bit() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(LCD_Y_COMPARE, 1);
        let mut ppu = DisplayTimingController::new();
        ppu.advance(&mut mem, 114);
        assert_ne!(mem.read_byte(LCD_STATUS) & 0b100, 0);
        assert!(!take_lcd_request(&mut mem));
    }

    #[test]
    fn hblank_source() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(LCD_STATUS, 0b0000_1000);
        let mut ppu = DisplayTimingController::new();
        ppu.advance(&mut mem, 62);
        assert!(!take_lcd_request(&mut mem));
        ppu.advance(&mut mem, 1);
        assert!(take_lcd_request(&mut mem));
        ppu.advance(&mut mem, 114);
        assert!(take_lcd_request(&mut mem));
    }

    #[test]
    fn adjacent_sources_do_not_double_request() {
        let mut mem = MemoryMap::construct();
        // Both the HBlank and OAM scan sources
        mem.write_byte(LCD_STATUS, 0b0010_1000);
        let mut ppu = DisplayTimingController::new();
        // The OAM scan of the first line is a rising edge
        ppu.advance(&mut mem, 1);
        assert!(take_lcd_request(&mut mem));
        ppu.advance(&mut mem, 62);
        assert!(take_lcd_request(&mut mem));
        // HBlank into the next OAM scan keeps the line high
        ppu.advance(&mut mem, 52);
        assert_eq!(ppu.mode(), PpuMode::OamScan);
        assert!(!take_lcd_request(&mut mem));
    }

    #[test]
    fn vblank_source() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(LCD_STATUS, 0b0001_0000);
        let mut ppu = DisplayTimingController::new();
        for _ in 0..144 {
            ppu.advance(&mut mem, 114);
        }
        assert!(take_lcd_request(&mut mem));
        for _ in 0..9 {
            ppu.advance(&mut mem, 114);
            assert!(!take_lcd_request(&mut mem));
        }
    }
}
