use super::*;

/// The prefixed ops that test, reset, or set a single bit.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{op} {bit}, {reg}")]
pub struct BitOp {
    pub bit: u8,
    pub reg: RegOrPointer,
    pub op: BitOpInner,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum BitOpInner {
    #[display("BIT")]
    Bit,
    #[display("RES")]
    Res,
    #[display("SET")]
    Set,
}

impl BitOp {
    /// Returns the number of machine cycles it will take to complete this instruction.
    /// Testing a bit in memory does not need to write it back.
    pub fn cycles(&self) -> u8 {
        match (self.op, self.reg) {
            (_, RegOrPointer::Reg(_)) => 2,
            (BitOpInner::Bit, RegOrPointer::Pointer) => 3,
            (_, RegOrPointer::Pointer) => 4,
        }
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        2
    }
}
