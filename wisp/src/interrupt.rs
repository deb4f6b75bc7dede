use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::cpu::Registers;
use crate::mem::io::INTERRUPT_ENABLE;
use crate::mem::io::INTERRUPT_FLAGS;
use crate::mem::MemoryLikeExt;

/// The five interrupt sources, each represented by its handler's address.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display("{_variant}")]
#[repr(u16)]
pub enum Interrupt {
    #[display("VBlank")]
    VBlank = 0x0040,
    #[display("LCD")]
    LCD = 0x0048,
    #[display("Timer")]
    Timer = 0x0050,
    #[display("Serial")]
    Serial = 0x0058,
    #[display("Joypad")]
    Joypad = 0x0060,
}

impl Interrupt {
    /// Every source, highest priority first. A source's position here is also its bit in the
    /// requested and enabled bitmaps.
    pub const PRIORITY: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LCD,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    pub const fn index(self) -> u8 {
        ((self as u16 - 0x0040) / 8) as u8
    }

    pub const fn mask(self) -> u8 {
        1 << self.index()
    }

    pub const fn vector(self) -> u16 {
        self as u16
    }

    /// Picks the highest priority source from a bitmap of pending interrupts.
    pub fn highest_priority(pending: u8) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|int| pending & int.mask() != 0)
    }
}

/// Holds the interrupt master enable (IME). The requested and enabled bitmaps live on the bus.
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
#[display("IME={ime} (scheduled={scheduled})")]
pub struct InterruptController {
    ime: bool,
    /// Set by `EI`. The CPU moves this into `ime` once the instruction following the `EI` is
    /// complete.
    scheduled: bool,
}

impl InterruptController {
    /// The number of machine cycles taken to dispatch to a handler.
    pub const DISPATCH_CYCLES: u8 = 5;

    pub fn ime(&self) -> bool {
        self.ime
    }

    /// Sets the master enable immediately. `EI` should go through `schedule_enable`.
    pub fn set_ime(&mut self, ime: bool) {
        self.ime = ime;
    }

    /// `DI` takes effect immediately and cancels a pending `EI`.
    pub fn disable(&mut self) {
        self.ime = false;
        self.scheduled = false;
    }

    pub fn schedule_enable(&mut self) {
        self.scheduled = true;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub(crate) fn take_scheduled(&mut self) -> bool {
        std::mem::take(&mut self.scheduled)
    }

    /// The interrupts that are both requested and enabled.
    pub fn pending<M: MemoryLikeExt>(mem: &M) -> u8 {
        mem.read_byte(INTERRUPT_FLAGS) & mem.read_byte(INTERRUPT_ENABLE) & 0x1F
    }

    /// If the IME is set and an interrupt is pending, jumps to the highest priority handler:
    /// the request bit is cleared, the PC is pushed, and the IME is cleared along with any `EI`
    /// still waiting to take effect. Returns whether a dispatch happened; otherwise nothing is
    /// touched.
    pub fn check_and_dispatch<M: MemoryLikeExt>(
        &mut self,
        regs: &mut Registers,
        mem: &mut M,
    ) -> bool {
        if !self.ime {
            return false;
        }
        let Some(int) = Interrupt::highest_priority(Self::pending(mem)) else {
            return false;
        };
        trace!("Dispatching {int} interrupt from 0x{:0>4X}", regs.pc);
        mem.update_byte(INTERRUPT_FLAGS, |flags| *flags &= !int.mask());
        regs.push(mem, regs.pc);
        regs.pc = int.vector();
        self.ime = false;
        self.scheduled = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::MemoryLike;

    fn setup(requested: u8, enabled: u8) -> (InterruptController, Registers, Vec<u8>) {
        let mut mem = vec![0; 0x10000];
        mem.write_byte(INTERRUPT_FLAGS, requested);
        mem.write_byte(INTERRUPT_ENABLE, enabled);
        let mut ctrl = InterruptController::default();
        ctrl.set_ime(true);
        let mut regs = Registers::default();
        regs.pc = 0x1234;
        (ctrl, regs, mem)
    }

    #[test]
    fn vectors_and_masks() {
        for (i, int) in Interrupt::PRIORITY.into_iter().enumerate() {
            assert_eq!(int.index() as usize, i);
            assert_eq!(int.mask(), 1 << i);
            assert_eq!(int.vector(), 0x40 + 8 * i as u16);
        }
    }

    #[test]
    fn dispatch_timer() {
        let (mut ctrl, mut regs, mut mem) = setup(0b0000_0100, 0b0000_0100);
        assert!(ctrl.check_and_dispatch(&mut regs, &mut mem));
        assert_eq!(regs.pc, 0x0050);
        assert!(!ctrl.ime());
        assert_eq!(mem.read_byte(INTERRUPT_FLAGS), 0);
        assert_eq!(regs.sp, 0xFFFC);
        assert_eq!(mem.read_byte(0xFFFD), 0x12);
        assert_eq!(mem.read_byte(0xFFFC), 0x34);
    }

    #[test]
    fn lowest_bit_wins() {
        let (mut ctrl, mut regs, mut mem) = setup(0b0001_1110, 0b0001_1010);
        assert!(ctrl.check_and_dispatch(&mut regs, &mut mem));
        assert_eq!(regs.pc, Interrupt::LCD.vector());
        // Only the dispatched request is cleared
        assert_eq!(mem.read_byte(INTERRUPT_FLAGS), 0b0001_1100);
    }

    #[test]
    fn nothing_happens_without_ime_or_enable() {
        let (mut ctrl, mut regs, mut mem) = setup(0b0000_0001, 0b0000_0001);
        ctrl.set_ime(false);
        let before = regs;
        assert!(!ctrl.check_and_dispatch(&mut regs, &mut mem));
        assert_eq!(regs, before);
        assert_eq!(mem.read_byte(INTERRUPT_FLAGS), 0b0000_0001);

        let (mut ctrl, mut regs, mut mem) = setup(0b0000_0001, 0b0000_0010);
        assert!(!ctrl.check_and_dispatch(&mut regs, &mut mem));
        assert!(ctrl.ime());
        assert_eq!(regs.pc, 0x1234);
    }

    #[test]
    fn dispatch_drops_scheduled_enable() {
        let (mut ctrl, mut regs, mut mem) = setup(0b0000_0001, 0b0000_0001);
        ctrl.schedule_enable();
        assert!(ctrl.check_and_dispatch(&mut regs, &mut mem));
        assert!(!ctrl.ime());
        assert!(!ctrl.is_scheduled());
    }

    #[test]
    fn disable_cancels_scheduled_enable() {
        let mut ctrl = InterruptController::default();
        ctrl.schedule_enable();
        ctrl.disable();
        assert!(!ctrl.take_scheduled());
        assert!(!ctrl.ime());
    }
}
