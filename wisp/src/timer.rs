use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::cpu::check_bit_const;
use crate::interrupt::Interrupt;
use crate::mem::io::DIVIDER;
use crate::mem::io::TIMER_CONTROL;
use crate::mem::io::TIMER_COUNTER;
use crate::mem::io::TIMER_MODULO;
use crate::mem::MemoryLike;
use crate::mem::MemoryLikeExt;
use crate::mem::MemoryMap;

/// The divider register is incremented once every this many machine cycles.
pub const DIVIDER_PERIOD: u8 = 64;

/// Drives the divider (DIV) and the timer counter (TIMA). The registers themselves live on the
/// bus, this only holds the sub-counters between increments.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Machine cycles since the divider was last incremented.
    div_counter: u8,
    /// Machine cycles since TIMA was last incremented.
    tima_counter: u16,
}

/// The number of machine cycles between TIMA increments for the frequency selected by TAC.
pub fn timer_period(control: u8) -> u16 {
    match control & 0b11 {
        0b00 => 256,
        0b01 => 4,
        0b10 => 16,
        _ => 64,
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, mem: &mut MemoryMap, cycles: u8) {
        if mem.take_divider_reset() {
            self.div_counter = 0;
            self.tima_counter = 0;
        }
        for _ in 0..cycles {
            self.div_counter += 1;
            if self.div_counter == DIVIDER_PERIOD {
                self.div_counter = 0;
                let div = mem.read_byte(DIVIDER).wrapping_add(1);
                mem.set_divider(div);
            }
            let control = mem.read_byte(TIMER_CONTROL);
            if !check_bit_const::<2>(control) {
                continue;
            }
            self.tima_counter += 1;
            if self.tima_counter >= timer_period(control) {
                self.tima_counter = 0;
                self.increment_counter(mem);
            }
        }
    }

    fn increment_counter(&mut self, mem: &mut MemoryMap) {
        match mem.read_byte(TIMER_COUNTER).checked_add(1) {
            Some(val) => mem.write_byte(TIMER_COUNTER, val),
            None => {
                let modulo = mem.read_byte(TIMER_MODULO);
                trace!("Timer overflow, reloading 0x{modulo:0>2X}");
                mem.write_byte(TIMER_COUNTER, modulo);
                mem.request_interrupt(Interrupt::Timer);
            }
        }
    }
}
