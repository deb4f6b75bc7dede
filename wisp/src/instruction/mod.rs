//! The decoded form of every instruction. Decoding happens in `crate::lookup`; executing happens
//! on the CPU. Every operation knows its encoded size and its cost in machine cycles.

use derive_more::From;
use derive_more::IsVariant;

use crate::cpu::Flags;

mod arithmetic;
mod bit;
mod bit_shift;
mod control;
mod jump;
mod load;

pub use arithmetic::*;
pub use bit::*;
pub use bit_shift::*;
pub use control::*;
pub use jump::*;
pub use load::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum Instruction {
    #[display("{_0}")]
    Load(LoadOp),
    #[display("{_0}")]
    ControlOp(ControlOp),
    #[display("{_0}")]
    Jump(JumpOp),
    #[display("{_0}")]
    Arithmetic(ArithmeticOp),
    #[display("{_0}")]
    BitShift(BitShiftOp),
    #[display("{_0}")]
    Bit(BitOp),
    /// Decimal Adjust Accumulator.
    #[display("DAA")]
    Daa,
    /// Set Carry.
    #[display("SCF")]
    Scf,
    /// ComPLement accumulator.
    #[display("CPL")]
    Cpl,
    /// CompLement carry flag.
    #[display("CCF")]
    Ccf,
    /// Disable interupts
    #[display("DI")]
    Di,
    /// Enable interupts, one instruction late
    #[display("EI")]
    Ei,
}

impl Instruction {
    /// Returns the number of machine cycles it will take to complete this instruction.
    /// Takes the flags in order to determine if this instruction will pass any conditions.
    pub fn cycles(&self, flags: &Flags) -> u8 {
        match self {
            Instruction::Load(op) => op.cycles(),
            Instruction::ControlOp(op) => op.cycles(),
            Instruction::Jump(op) => op.cycles(flags),
            Instruction::Arithmetic(op) => op.cycles(),
            Instruction::BitShift(op) => op.cycles(),
            Instruction::Bit(op) => op.cycles(),
            Instruction::Daa
            | Instruction::Scf
            | Instruction::Cpl
            | Instruction::Ccf
            | Instruction::Di
            | Instruction::Ei => 1,
        }
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        match self {
            Instruction::Load(op) => op.size(),
            Instruction::ControlOp(op) => op.size(),
            Instruction::Jump(op) => op.size(),
            Instruction::Arithmetic(op) => op.size(),
            Instruction::BitShift(op) => op.size(),
            Instruction::Bit(op) => op.size(),
            Instruction::Daa
            | Instruction::Scf
            | Instruction::Cpl
            | Instruction::Ccf
            | Instruction::Di
            | Instruction::Ei => 1,
        }
    }
}

/// The source operand of the 8-bit ALU operations.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, From, derive_more::Display)]
#[display("{_variant}")]
pub enum SomeByte {
    #[display("{_0}")]
    Referenced(RegOrPointer),
    #[display("0x{_0:0>2X}")]
    Direct(u8),
}

impl SomeByte {
    /// Operands held in a register cost a single cycle. The others need a bus read.
    const fn is_register(&self) -> bool {
        matches!(self, SomeByte::Referenced(RegOrPointer::Reg(_)))
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum WideReg {
    #[display("BC")]
    BC,
    #[display("DE")]
    DE,
    #[display("HL")]
    HL,
    #[display("SP")]
    SP,
}

/// The register pairs usable with `PUSH` and `POP`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum WideRegWithoutSP {
    #[display("BC")]
    BC,
    #[display("DE")]
    DE,
    #[display("HL")]
    HL,
    #[display("AF")]
    AF,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum Condition {
    #[display("Z")]
    Zero,
    #[display("NZ")]
    NotZero,
    #[display("C")]
    Carry,
    #[display("NC")]
    NotCarry,
}

impl Condition {
    pub fn passed(&self, flags: &Flags) -> bool {
        match self {
            Condition::Zero => flags.zero(),
            Condition::NotZero => !flags.zero(),
            Condition::Carry => flags.carry(),
            Condition::NotCarry => !flags.carry(),
        }
    }
}

/// There are special operations for loading into the A register, so it is easier to have a special
/// enum for the unique types of pointers they use.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum LoadAPointer {
    /// Use the BC register
    #[display("(BC)")]
    BC,
    /// Use the DE register
    #[display("(DE)")]
    DE,
    /// Use the HL register and increment after performing the operation
    #[display("(HL+)")]
    Hli,
    /// Use the HL register and decrement after performing the operation
    #[display("(HL-)")]
    Hld,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum HalfRegister {
    #[display("A")]
    A,
    #[display("B")]
    B,
    #[display("C")]
    C,
    #[display("D")]
    D,
    #[display("E")]
    E,
    #[display("H")]
    H,
    #[display("L")]
    L,
}

/// Either an 8-bit register or the byte that HL points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, IsVariant, derive_more::Display)]
#[display("{_variant}")]
pub enum RegOrPointer {
    #[display("{_0}")]
    Reg(HalfRegister),
    #[display("(HL)")]
    Pointer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditional_costs_depend_on_flags() {
        let mut flags = Flags::default();
        let jr = Instruction::Jump(JumpOp::ConditionalRelative(Condition::Zero, 4));
        let call = Instruction::Jump(JumpOp::ConditionalCall(Condition::NotCarry, 0x1234));
        let ret = Instruction::Jump(JumpOp::ConditionalReturn(Condition::Carry));
        assert_eq!(jr.cycles(&flags), 2);
        assert_eq!(call.cycles(&flags), 6);
        assert_eq!(ret.cycles(&flags), 2);
        flags.set_zero(true);
        flags.set_carry(true);
        assert_eq!(jr.cycles(&flags), 3);
        assert_eq!(call.cycles(&flags), 3);
        assert_eq!(ret.cycles(&flags), 5);
    }

    #[test]
    fn disassembly() {
        let ld = Instruction::Load(LoadOp::Direct(RegOrPointer::Reg(HalfRegister::A), 0x42));
        assert_eq!(ld.to_string(), "LD A, 0x42");
        let store = Instruction::Load(LoadOp::StoreA { ptr: 0xC000 });
        assert_eq!(store.to_string(), "LD (0xC000), A");
        let jp = Instruction::Jump(JumpOp::Absolute(0x0100));
        assert_eq!(jp.to_string(), "JP 0x0100");
        let bit = Instruction::Bit(BitOp {
            bit: 7,
            reg: RegOrPointer::Pointer,
            op: BitOpInner::Bit,
        });
        assert_eq!(bit.to_string(), "BIT 7, (HL)");
    }
}
