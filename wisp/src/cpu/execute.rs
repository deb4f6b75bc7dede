//! The semantics of each instruction family.

use super::alu;
use super::check_bit;
use super::Cpu;
use super::CpuState;
use crate::instruction::ArithmeticOp;
use crate::instruction::BitOp;
use crate::instruction::BitOpInner;
use crate::instruction::BitShiftOp;
use crate::instruction::ControlOp;
use crate::instruction::JumpOp;
use crate::instruction::LoadAPointer;
use crate::instruction::LoadOp;
use crate::instruction::RegOrPointer;
use crate::instruction::SomeByte;
use crate::mem::io::DIVIDER;
use crate::mem::MemoryLikeExt;

impl Cpu {
    fn read_byte<M: MemoryLikeExt>(&self, reg: RegOrPointer, mem: &M) -> u8 {
        match reg {
            RegOrPointer::Reg(reg) => self.regs[reg],
            RegOrPointer::Pointer => mem.read_byte(self.regs.hl()),
        }
    }

    fn write_byte<M: MemoryLikeExt>(&mut self, reg: RegOrPointer, mem: &mut M, val: u8) {
        match reg {
            RegOrPointer::Reg(reg) => self.regs[reg] = val,
            RegOrPointer::Pointer => mem.write_byte(self.regs.hl(), val),
        }
    }

    fn some_byte<M: MemoryLikeExt>(&self, byte: SomeByte, mem: &M) -> u8 {
        match byte {
            SomeByte::Referenced(reg) => self.read_byte(reg, mem),
            SomeByte::Direct(val) => val,
        }
    }

    /// Resolves the pointer of the special `A` loads, applying the post-increment or decrement
    /// of HL.
    fn a_pointer(&mut self, ptr: LoadAPointer) -> u16 {
        match ptr {
            LoadAPointer::BC => self.regs.bc(),
            LoadAPointer::DE => self.regs.de(),
            LoadAPointer::Hli => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            LoadAPointer::Hld => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn execute_load_op<M: MemoryLikeExt>(&mut self, op: LoadOp, mem: &mut M) {
        match op {
            LoadOp::Basic { dest, src } => {
                let val = self.read_byte(src, mem);
                self.write_byte(dest, mem, val);
            }
            LoadOp::Direct16(reg, val) => self.regs.write_wide(reg, val),
            LoadOp::Direct(reg, val) => self.write_byte(reg, mem, val),
            LoadOp::LoadIntoA(ptr) => {
                let addr = self.a_pointer(ptr);
                self.regs.a = mem.read_byte(addr);
            }
            LoadOp::StoreFromA(ptr) => {
                let addr = self.a_pointer(ptr);
                mem.write_byte(addr, self.regs.a);
            }
            LoadOp::StoreSP(addr) => {
                let [hi, lo] = self.regs.sp.to_be_bytes();
                mem.write_byte(addr, lo);
                mem.write_byte(addr.wrapping_add(1), hi);
            }
            LoadOp::HLIntoSP => self.regs.sp = self.regs.hl(),
            LoadOp::SPIntoHL(offset) => {
                let val = alu::add_signed_to_sp(self.regs.sp, offset, &mut self.regs.f);
                self.regs.set_hl(val);
            }
            LoadOp::Pop(reg) => {
                let val = self.regs.pop(mem);
                self.regs.write_stack_pair(reg, val);
            }
            LoadOp::Push(reg) => {
                let val = self.regs.read_stack_pair(reg);
                self.regs.push(mem, val);
            }
            LoadOp::StoreHigh(offset) => {
                mem.write_byte(u16::from_be_bytes([0xFF, offset]), self.regs.a)
            }
            LoadOp::LoadHigh(offset) => {
                self.regs.a = mem.read_byte(u16::from_be_bytes([0xFF, offset]))
            }
            LoadOp::StoreC => mem.write_byte(u16::from_be_bytes([0xFF, self.regs.c]), self.regs.a),
            LoadOp::LoadC => self.regs.a = mem.read_byte(u16::from_be_bytes([0xFF, self.regs.c])),
            LoadOp::StoreA { ptr } => mem.write_byte(ptr, self.regs.a),
            LoadOp::LoadA { ptr } => self.regs.a = mem.read_byte(ptr),
        }
    }

    pub(super) fn execute_control_op<M: MemoryLikeExt>(&mut self, op: ControlOp, mem: &mut M) {
        match op {
            ControlOp::Noop => {}
            ControlOp::Halt => self.state = CpuState::Halted,
            ControlOp::Stop(_) => {
                // Any write resets the divider
                mem.write_byte(DIVIDER, 0);
                self.state = CpuState::Stopped;
            }
        }
    }

    fn jump_relative(&mut self, offset: i8) {
        self.regs.pc = self.regs.pc.wrapping_add_signed(offset as i16);
    }

    fn call<M: MemoryLikeExt>(&mut self, addr: u16, mem: &mut M) {
        let ret = self.regs.pc;
        self.regs.push(mem, ret);
        self.regs.pc = addr;
    }

    pub(super) fn execute_jump_op<M: MemoryLikeExt>(&mut self, op: JumpOp, mem: &mut M) {
        let flags = self.regs.f;
        match op {
            JumpOp::ConditionalRelative(cond, offset) => {
                if cond.passed(&flags) {
                    self.jump_relative(offset)
                }
            }
            JumpOp::Relative(offset) => self.jump_relative(offset),
            JumpOp::ConditionalAbsolute(cond, addr) => {
                if cond.passed(&flags) {
                    self.regs.pc = addr
                }
            }
            JumpOp::Absolute(addr) => self.regs.pc = addr,
            JumpOp::JumpToHL => self.regs.pc = self.regs.hl(),
            JumpOp::Call(addr) => self.call(addr, mem),
            JumpOp::ConditionalCall(cond, addr) => {
                if cond.passed(&flags) {
                    self.call(addr, mem)
                }
            }
            JumpOp::Return => self.regs.pc = self.regs.pop(mem),
            JumpOp::ConditionalReturn(cond) => {
                if cond.passed(&flags) {
                    self.regs.pc = self.regs.pop(mem)
                }
            }
            JumpOp::ReturnAndEnable => {
                self.regs.pc = self.regs.pop(mem);
                self.interrupts.set_ime(true);
            }
            JumpOp::Restart(vector) => self.call(vector as u16, mem),
        }
    }

    pub(super) fn execute_arithmetic_op<M: MemoryLikeExt>(
        &mut self,
        op: ArithmeticOp,
        mem: &mut M,
    ) {
        let a = self.regs.a;
        let carry = self.regs.f.carry();
        match op {
            ArithmeticOp::Add(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::add(a, op, false, &mut self.regs.f);
            }
            ArithmeticOp::Adc(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::add(a, op, carry, &mut self.regs.f);
            }
            ArithmeticOp::Sub(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::sub(a, op, false, &mut self.regs.f);
            }
            ArithmeticOp::Sbc(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::sub(a, op, carry, &mut self.regs.f);
            }
            ArithmeticOp::And(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::and(a, op, &mut self.regs.f);
            }
            ArithmeticOp::Xor(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::xor(a, op, &mut self.regs.f);
            }
            ArithmeticOp::Or(byte) => {
                let op = self.some_byte(byte, mem);
                self.regs.a = alu::or(a, op, &mut self.regs.f);
            }
            ArithmeticOp::Cp(byte) => {
                let op = self.some_byte(byte, mem);
                alu::sub(a, op, false, &mut self.regs.f);
            }
            ArithmeticOp::Inc(reg) => {
                let val = self.read_byte(reg, mem);
                let val = alu::inc(val, &mut self.regs.f);
                self.write_byte(reg, mem, val);
            }
            ArithmeticOp::Dec(reg) => {
                let val = self.read_byte(reg, mem);
                let val = alu::dec(val, &mut self.regs.f);
                self.write_byte(reg, mem, val);
            }
            ArithmeticOp::Add16(reg) => {
                let op = self.regs.read_wide(reg);
                let hl = alu::add_wide(self.regs.hl(), op, &mut self.regs.f);
                self.regs.set_hl(hl);
            }
            ArithmeticOp::AddSP(offset) => {
                self.regs.sp = alu::add_signed_to_sp(self.regs.sp, offset, &mut self.regs.f);
            }
            ArithmeticOp::Inc16(reg) => {
                let val = self.regs.read_wide(reg).wrapping_add(1);
                self.regs.write_wide(reg, val);
            }
            ArithmeticOp::Dec16(reg) => {
                let val = self.regs.read_wide(reg).wrapping_sub(1);
                self.regs.write_wide(reg, val);
            }
        }
    }

    pub(super) fn execute_bit_shift_op<M: MemoryLikeExt>(&mut self, op: BitShiftOp, mem: &mut M) {
        let carry = self.regs.f.carry();
        let (reg, shift): (RegOrPointer, fn(u8, bool) -> (u8, bool)) = match op {
            BitShiftOp::Rlca => {
                let (val, c) = alu::rotate_left_circular(self.regs.a);
                return self.accumulator_shift(val, c);
            }
            BitShiftOp::Rrca => {
                let (val, c) = alu::rotate_right_circular(self.regs.a);
                return self.accumulator_shift(val, c);
            }
            BitShiftOp::Rla => {
                let (val, c) = alu::rotate_left_through_carry(self.regs.a, carry);
                return self.accumulator_shift(val, c);
            }
            BitShiftOp::Rra => {
                let (val, c) = alu::rotate_right_through_carry(self.regs.a, carry);
                return self.accumulator_shift(val, c);
            }
            BitShiftOp::Rlc(reg) => (reg, |v, _| alu::rotate_left_circular(v)),
            BitShiftOp::Rrc(reg) => (reg, |v, _| alu::rotate_right_circular(v)),
            BitShiftOp::Rl(reg) => (reg, alu::rotate_left_through_carry),
            BitShiftOp::Rr(reg) => (reg, alu::rotate_right_through_carry),
            BitShiftOp::Sla(reg) => (reg, |v, _| alu::shift_left_arithmetic(v)),
            BitShiftOp::Sra(reg) => (reg, |v, _| alu::shift_right_arithmetic(v)),
            BitShiftOp::Swap(reg) => (reg, |v, _| alu::swap(v)),
            BitShiftOp::Srl(reg) => (reg, |v, _| alu::shift_right_logical(v)),
        };
        let (val, c) = shift(self.read_byte(reg, mem), carry);
        self.regs.f.set_for_byte_shift_op(val == 0, c);
        self.write_byte(reg, mem, val);
    }

    /// The unprefixed rotates always clear the zero flag.
    fn accumulator_shift(&mut self, val: u8, carry: bool) {
        self.regs.a = val;
        self.regs.f.set_for_byte_shift_op(false, carry);
    }

    pub(super) fn execute_bit_op<M: MemoryLikeExt>(&mut self, op: BitOp, mem: &mut M) {
        let BitOp { bit, reg, op } = op;
        let val = self.read_byte(reg, mem);
        match op {
            BitOpInner::Bit => {
                self.regs.f.set_zero(!check_bit(bit, val));
                self.regs.f.set_subtract(false);
                self.regs.f.set_half_carry(true);
            }
            BitOpInner::Res => self.write_byte(reg, mem, val & !(1 << bit)),
            BitOpInner::Set => self.write_byte(reg, mem, val | (1 << bit)),
        }
    }
}
