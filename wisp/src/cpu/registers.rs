use std::ops::Index;
use std::ops::IndexMut;

use serde::Deserialize;
use serde::Serialize;

use crate::instruction::HalfRegister;
use crate::instruction::WideReg;
use crate::instruction::WideRegWithoutSP;
use crate::mem::MemoryLike;

/// The PC after power-on, the entry point of every cartridge.
pub const START_PC: u16 = 0x0100;
/// The SP after power-on.
pub const START_SP: u16 = 0xFFFE;

/// The F register. Only the top nibble is meaningful, the bottom is always zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[display(
    "Flags(Z={} N={} H={} C={})",
    *_0 >> 7 & 1,
    *_0 >> 6 & 1,
    *_0 >> 5 & 1,
    *_0 >> 4 & 1
)]
pub struct Flags(u8);

const fn bit_select<const B: u8>() -> u8 {
    const {
        match B {
            n @ 0..=7 => 0x1 << n,
            _ => panic!("You must select between the 0th and 7th bit!"),
        }
    }
}

pub(crate) const fn check_bit(bit: u8, src: u8) -> bool {
    let bit = 0x1 << bit;
    (src & bit) == bit
}

pub(crate) const fn check_bit_const<const B: u8>(src: u8) -> bool {
    (src & bit_select::<B>()) == bit_select::<B>()
}

impl From<u8> for Flags {
    fn from(value: u8) -> Self {
        Self(value & 0xF0)
    }
}

impl Flags {
    pub const fn as_byte(&self) -> u8 {
        self.0
    }

    const fn get<const B: u8>(&self) -> bool {
        check_bit_const::<B>(self.0)
    }

    fn set<const B: u8>(&mut self, val: bool) {
        self.0 = (self.0 & !bit_select::<B>()) | ((val as u8) << B);
    }

    pub const fn zero(&self) -> bool {
        self.get::<7>()
    }

    pub fn set_zero(&mut self, val: bool) {
        self.set::<7>(val)
    }

    pub const fn subtract(&self) -> bool {
        self.get::<6>()
    }

    pub fn set_subtract(&mut self, val: bool) {
        self.set::<6>(val)
    }

    pub const fn half_carry(&self) -> bool {
        self.get::<5>()
    }

    pub fn set_half_carry(&mut self, val: bool) {
        self.set::<5>(val)
    }

    pub const fn carry(&self) -> bool {
        self.get::<4>()
    }

    pub fn set_carry(&mut self, val: bool) {
        self.set::<4>(val)
    }

    /// Sets all four flags at once.
    pub fn set_all(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.0 = (z as u8) << 7 | (n as u8) << 6 | (h as u8) << 5 | (c as u8) << 4;
    }

    /// Every shift and rotate clears N and H.
    pub fn set_for_byte_shift_op(&mut self, z: bool, c: bool) {
        self.set_all(z, false, false, c)
    }
}

/// The CPU's register file.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display(
    "A=0x{:0>2X} {} B=0x{:0>2X} C=0x{:0>2X} D=0x{:0>2X} E=0x{:0>2X} H=0x{:0>2X} L=0x{:0>2X} SP=0x{:0>4X} PC=0x{:0>4X}",
    a,
    f,
    b,
    c,
    d,
    e,
    h,
    l,
    sp,
    pc
)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Default for Registers {
    /// The power-on state.
    fn default() -> Self {
        Self {
            a: 0,
            f: Flags::default(),
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: START_SP,
            pc: START_PC,
        }
    }
}

impl Registers {
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f.as_byte()])
    }

    pub fn set_af(&mut self, val: u16) {
        let [a, f] = val.to_be_bytes();
        self.a = a;
        self.f = f.into();
    }

    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn set_bc(&mut self, val: u16) {
        [self.b, self.c] = val.to_be_bytes();
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn set_de(&mut self, val: u16) {
        [self.d, self.e] = val.to_be_bytes();
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_hl(&mut self, val: u16) {
        [self.h, self.l] = val.to_be_bytes();
    }

    pub fn read_wide(&self, reg: WideReg) -> u16 {
        match reg {
            WideReg::BC => self.bc(),
            WideReg::DE => self.de(),
            WideReg::HL => self.hl(),
            WideReg::SP => self.sp,
        }
    }

    pub fn write_wide(&mut self, reg: WideReg, val: u16) {
        match reg {
            WideReg::BC => self.set_bc(val),
            WideReg::DE => self.set_de(val),
            WideReg::HL => self.set_hl(val),
            WideReg::SP => self.sp = val,
        }
    }

    pub fn read_stack_pair(&self, reg: WideRegWithoutSP) -> u16 {
        match reg {
            WideRegWithoutSP::BC => self.bc(),
            WideRegWithoutSP::DE => self.de(),
            WideRegWithoutSP::HL => self.hl(),
            WideRegWithoutSP::AF => self.af(),
        }
    }

    pub fn write_stack_pair(&mut self, reg: WideRegWithoutSP, val: u16) {
        match reg {
            WideRegWithoutSP::BC => self.set_bc(val),
            WideRegWithoutSP::DE => self.set_de(val),
            WideRegWithoutSP::HL => self.set_hl(val),
            WideRegWithoutSP::AF => self.set_af(val),
        }
    }

    /// Pushes a word onto the stack. The high byte lands at `SP - 1` and the low byte at
    /// `SP - 2`, so the word is little-endian in memory.
    pub fn push<M: MemoryLike + ?Sized>(&mut self, mem: &mut M, val: u16) {
        let [hi, lo] = val.to_be_bytes();
        self.sp = self.sp.wrapping_sub(1);
        mem.write_byte(self.sp, hi);
        self.sp = self.sp.wrapping_sub(1);
        mem.write_byte(self.sp, lo);
    }

    /// Pops a word off of the stack, the low byte first.
    pub fn pop<M: MemoryLike + ?Sized>(&mut self, mem: &M) -> u16 {
        let lo = mem.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        let hi = mem.read_byte(self.sp);
        self.sp = self.sp.wrapping_add(1);
        u16::from_be_bytes([hi, lo])
    }
}

impl Index<HalfRegister> for Registers {
    type Output = u8;

    fn index(&self, index: HalfRegister) -> &Self::Output {
        match index {
            HalfRegister::A => &self.a,
            HalfRegister::B => &self.b,
            HalfRegister::C => &self.c,
            HalfRegister::D => &self.d,
            HalfRegister::E => &self.e,
            HalfRegister::H => &self.h,
            HalfRegister::L => &self.l,
        }
    }
}

impl IndexMut<HalfRegister> for Registers {
    fn index_mut(&mut self, index: HalfRegister) -> &mut Self::Output {
        match index {
            HalfRegister::A => &mut self.a,
            HalfRegister::B => &mut self.b,
            HalfRegister::C => &mut self.c,
            HalfRegister::D => &mut self.d,
            HalfRegister::E => &mut self.e,
            HalfRegister::H => &mut self.h,
            HalfRegister::L => &mut self.l,
        }
    }
}
