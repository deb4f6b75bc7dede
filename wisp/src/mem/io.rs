//! Addresses of the memory mapped registers the core gives meaning to, plus a few helpers for
//! registers where only some of the bits may be written by software.

/// ADDR FF00. Bits 4-5 select the button group, bits 0-3 report the pressed state (active low).
pub const JOYPAD: u16 = 0xFF00;
/// ADDR FF04
pub const DIVIDER: u16 = 0xFF04;
/// ADDR FF05, a.k.a. TIMA
pub const TIMER_COUNTER: u16 = 0xFF05;
/// ADDR FF06, a.k.a. TMA
pub const TIMER_MODULO: u16 = 0xFF06;
/// ADDR FF07, a.k.a. TAC
pub const TIMER_CONTROL: u16 = 0xFF07;
/// ADDR FF0F. The requested interrupts bitmap.
pub const INTERRUPT_FLAGS: u16 = 0xFF0F;
/// ADDR FF40
pub const LCD_CONTROL: u16 = 0xFF40;
/// ADDR FF41
pub const LCD_STATUS: u16 = 0xFF41;
/// ADDR FF44 (set by the display timing controller)
pub const LCD_Y: u16 = 0xFF44;
/// ADDR FF45
pub const LCD_Y_COMPARE: u16 = 0xFF45;
/// ADDR FF46
pub const OAM_DMA: u16 = 0xFF46;
/// ADDR FFFF. The enabled interrupts bitmap.
pub const INTERRUPT_ENABLE: u16 = 0xFFFF;

/// The start of the video RAM. Everything below this address is cartridge ROM.
pub const VRAM_START: u16 = 0x8000;
/// The start of the object attribute memory.
pub const OAM_START: u16 = 0xFE00;
/// The number of bytes copied by an OAM DMA transfer.
pub const OAM_LEN: u16 = 0xA0;

/// The bits of the LCD status register that only the display timing controller may change (the
/// mode and the coincidence flag).
pub const LCD_STATUS_READ_ONLY: u8 = 0b0000_0111;
/// The bits of the LCD status register that software may write (the interrupt source enables).
pub const LCD_STATUS_WRITABLE: u8 = 0b0111_1000;

/// Used to write a new byte into an existing byte where one or more of the bits are read-only.
/// The `mask` should have writable bits set and read-only bits unset. E.g. if the bottom nibble
/// is read-only, the mask should be 0xF0.
pub fn selective_write(existing: &mut u8, mask: u8, new: u8) {
    let masked_existing = *existing & (!mask);
    let masked_new = new & mask;
    *existing = masked_existing | masked_new;
}

#[cfg(test)]
mod tests {
    use super::selective_write;

    #[test]
    fn selective_write_keeps_masked_bits() {
        let mut byte = 0b1010_0101;
        selective_write(&mut byte, 0xF8, 0b0101_1010);
        assert_eq!(byte, 0b0101_1101);

        let mut byte = 0xFF;
        selective_write(&mut byte, 0x00, 0x00);
        assert_eq!(byte, 0xFF);
    }
}
