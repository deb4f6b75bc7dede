//! The flag arithmetic shared by the 8- and 16-bit operations. Every function returns the result
//! and updates the flags. Whether the result is stored is up to the caller (e.g. `CP` drops it).

use super::registers::check_bit_const;
use super::registers::Flags;

/// `ADD` and `ADC`.
pub(crate) fn add(val: u8, op: u8, carry_in: bool, flags: &mut Flags) -> u8 {
    let carry_in = carry_in as u8;
    let (digest, c1) = val.overflowing_add(op);
    let (digest, c2) = digest.overflowing_add(carry_in);
    let h = (val & 0x0F) + (op & 0x0F) + carry_in > 0x0F;
    flags.set_all(digest == 0, false, h, c1 | c2);
    digest
}

/// `SUB`, `SBC`, and `CP`.
pub(crate) fn sub(val: u8, op: u8, carry_in: bool, flags: &mut Flags) -> u8 {
    let carry_in = carry_in as u8;
    let (digest, c1) = val.overflowing_sub(op);
    let (digest, c2) = digest.overflowing_sub(carry_in);
    let h = (val & 0x0F) < (op & 0x0F) + carry_in;
    flags.set_all(digest == 0, true, h, c1 | c2);
    digest
}

pub(crate) fn and(val: u8, op: u8, flags: &mut Flags) -> u8 {
    let digest = val & op;
    flags.set_all(digest == 0, false, true, false);
    digest
}

pub(crate) fn or(val: u8, op: u8, flags: &mut Flags) -> u8 {
    let digest = val | op;
    flags.set_all(digest == 0, false, false, false);
    digest
}

pub(crate) fn xor(val: u8, op: u8, flags: &mut Flags) -> u8 {
    let digest = val ^ op;
    flags.set_all(digest == 0, false, false, false);
    digest
}

/// `INC r` and `INC (HL)`. The carry flag is untouched.
pub(crate) fn inc(val: u8, flags: &mut Flags) -> u8 {
    let digest = val.wrapping_add(1);
    flags.set_zero(digest == 0);
    flags.set_subtract(false);
    flags.set_half_carry(val & 0x0F == 0x0F);
    digest
}

/// `DEC r` and `DEC (HL)`. The carry flag is untouched.
pub(crate) fn dec(val: u8, flags: &mut Flags) -> u8 {
    let digest = val.wrapping_sub(1);
    flags.set_zero(digest == 0);
    flags.set_subtract(true);
    flags.set_half_carry(val & 0x0F == 0x00);
    digest
}

/// `ADD HL, rr`. The half-carry and carry flags come from the bit 3 and bit 7 boundaries of the
/// low bytes. The zero flag is untouched.
pub(crate) fn add_wide(val: u16, op: u16, flags: &mut Flags) -> u16 {
    flags.set_subtract(false);
    flags.set_half_carry((val & 0x000F) + (op & 0x000F) > 0x000F);
    flags.set_carry((val & 0x00FF) + (op & 0x00FF) > 0x00FF);
    val.wrapping_add(op)
}

/// `ADD SP, e8` and `LD HL, SP + e8`. The flags are computed from the unsigned addition of the
/// low bytes, zero and subtract are cleared.
pub(crate) fn add_signed_to_sp(sp: u16, offset: i8, flags: &mut Flags) -> u16 {
    let unsigned = offset as u8 as u16;
    let h = (sp & 0x000F) + (unsigned & 0x000F) > 0x000F;
    let c = (sp & 0x00FF) + unsigned > 0x00FF;
    flags.set_all(false, false, h, c);
    sp.wrapping_add_signed(offset as i16)
}

/// Takes the result of a BCD addition or subtraction and corrects it so that each nibble is
/// again a decimal digit.
pub(crate) fn to_bcd(mut val: u8, flags: &mut Flags) -> u8 {
    let mut carry = flags.carry();
    if !flags.subtract() {
        // after an addition, adjust if (half-)carry occurred or if result is out of bounds
        if carry || val > 0x99 {
            val = val.wrapping_add(0x60);
            carry = true;
        }
        if flags.half_carry() || (val & 0x0f) > 0x09 {
            val = val.wrapping_add(0x6);
        }
    } else {
        if carry {
            val = val.wrapping_sub(0x60);
        }
        if flags.half_carry() {
            val = val.wrapping_sub(0x6);
        }
    }
    flags.set_zero(val == 0);
    flags.set_half_carry(false);
    flags.set_carry(carry);
    val
}

/// The rotate and shift family. Returns the new byte and the bit shifted out, which becomes the
/// carry.
pub(crate) fn rotate_left_circular(val: u8) -> (u8, bool) {
    (val.rotate_left(1), check_bit_const::<7>(val))
}

pub(crate) fn rotate_right_circular(val: u8) -> (u8, bool) {
    (val.rotate_right(1), check_bit_const::<0>(val))
}

pub(crate) fn rotate_left_through_carry(val: u8, carry: bool) -> (u8, bool) {
    let [c, new] = (u16::from_be_bytes([0, val]) << 1 | carry as u16).to_be_bytes();
    (new, c != 0)
}

pub(crate) fn rotate_right_through_carry(val: u8, carry: bool) -> (u8, bool) {
    ((val >> 1) | ((carry as u8) << 7), check_bit_const::<0>(val))
}

pub(crate) fn shift_left_arithmetic(val: u8) -> (u8, bool) {
    (val << 1, check_bit_const::<7>(val))
}

/// Keeps bit 7 in place.
pub(crate) fn shift_right_arithmetic(val: u8) -> (u8, bool) {
    ((val >> 1) | (val & 0x80), check_bit_const::<0>(val))
}

pub(crate) fn shift_right_logical(val: u8) -> (u8, bool) {
    (val >> 1, check_bit_const::<0>(val))
}

pub(crate) fn swap(val: u8) -> (u8, bool) {
    (val.rotate_left(4), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_bcd(val: u8) -> bool {
        val & 0x0F <= 9 && val >> 4 <= 9
    }

    fn from_bcd(val: u8) -> u16 {
        (val >> 4) as u16 * 10 + (val & 0x0F) as u16
    }

    #[test]
    fn zero_flag_matches_result() {
        let mut flags = Flags::default();
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                for carry in [false, true] {
                    let digest = add(a, b, carry, &mut flags);
                    assert_eq!(flags.zero(), digest == 0);
                    let digest = sub(a, b, carry, &mut flags);
                    assert_eq!(flags.zero(), digest == 0);
                    assert!(flags.subtract());
                }
                let digest = and(a, b, &mut flags);
                assert_eq!(flags.zero(), digest == 0);
                assert!(flags.half_carry() && !flags.carry());
                let digest = or(a, b, &mut flags);
                assert_eq!(flags.zero(), digest == 0);
                assert!(!flags.half_carry() && !flags.carry());
                let digest = xor(a, b, &mut flags);
                assert_eq!(flags.zero(), digest == 0);
                // CP is a subtraction that throws the result away
                sub(a, b, false, &mut flags);
                assert_eq!(flags.zero(), a == b);
                assert_eq!(flags.as_byte() & 0x0F, 0);
            }
        }
    }

    #[test]
    fn add_sub_carries() {
        let mut flags = Flags::default();
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                add(a, b, false, &mut flags);
                assert_eq!(flags.carry(), a as u16 + b as u16 > 0xFF);
                assert_eq!(flags.half_carry(), (a & 0xF) + (b & 0xF) > 0xF);
                sub(a, b, true, &mut flags);
                assert_eq!(flags.carry(), (a as u16) < b as u16 + 1);
                assert_eq!(flags.half_carry(), (a & 0xF) < (b & 0xF) + 1);
            }
        }
    }

    #[test]
    fn inc_dec_keep_carry() {
        let mut flags = Flags::default();
        flags.set_carry(true);
        assert_eq!(inc(0xFF, &mut flags), 0);
        assert!(flags.zero() && flags.half_carry() && flags.carry() && !flags.subtract());
        assert_eq!(dec(0x10, &mut flags), 0x0F);
        assert!(!flags.zero() && flags.half_carry() && flags.carry() && flags.subtract());
        flags.set_carry(false);
        assert_eq!(dec(0x01, &mut flags), 0x00);
        assert!(flags.zero() && !flags.half_carry() && !flags.carry());
    }

    #[test]
    fn daa_after_bcd_ops() {
        let mut flags = Flags::default();
        for a in (0..=u8::MAX).filter(|v| is_bcd(*v)) {
            for b in (0..=u8::MAX).filter(|v| is_bcd(*v)) {
                let sum = add(a, b, false, &mut flags);
                let adjusted = to_bcd(sum, &mut flags);
                assert!(is_bcd(adjusted), "{a:X} + {b:X} = {adjusted:X}");
                let expected = from_bcd(a) + from_bcd(b);
                assert_eq!(from_bcd(adjusted), expected % 100);
                assert_eq!(flags.carry(), expected >= 100);
                assert_eq!(flags.zero(), adjusted == 0);
                assert!(!flags.half_carry());

                let diff = sub(a, b, false, &mut flags);
                let adjusted = to_bcd(diff, &mut flags);
                assert!(is_bcd(adjusted), "{a:X} - {b:X} = {adjusted:X}");
                let expected = (100 + from_bcd(a) - from_bcd(b)) % 100;
                assert_eq!(from_bcd(adjusted), expected);
                assert_eq!(flags.carry(), a < b);
            }
        }
    }

    #[test]
    fn wide_adds() {
        let mut flags = Flags::default();
        flags.set_zero(true);
        assert_eq!(add_wide(0x00FF, 0x0001, &mut flags), 0x0100);
        assert!(flags.zero() && flags.half_carry() && flags.carry());
        assert_eq!(add_wide(0x1200, 0x3400, &mut flags), 0x4600);
        assert!(!flags.half_carry() && !flags.carry());

        assert_eq!(add_signed_to_sp(0xFFF8, 8, &mut flags), 0x0000);
        assert!(!flags.zero() && flags.half_carry() && flags.carry());
        assert_eq!(add_signed_to_sp(0x0100, -1, &mut flags), 0x00FF);
        assert!(!flags.half_carry() && !flags.carry());
    }

    #[test]
    fn rotates() {
        assert_eq!(rotate_left_circular(0x85), (0x0B, true));
        assert_eq!(rotate_right_circular(0x01), (0x80, true));
        assert_eq!(rotate_left_through_carry(0x80, false), (0x00, true));
        assert_eq!(rotate_left_through_carry(0x00, true), (0x01, false));
        assert_eq!(rotate_right_through_carry(0x01, false), (0x00, true));
        assert_eq!(rotate_right_through_carry(0x00, true), (0x80, false));
        assert_eq!(shift_left_arithmetic(0xFF), (0xFE, true));
        assert_eq!(shift_right_arithmetic(0x81), (0xC0, true));
        assert_eq!(shift_right_logical(0x81), (0x40, true));
        assert_eq!(swap(0xA5), (0x5A, false));
    }
}
