use super::*;

/// Rotates and shifts. The four accumulator forms (`RLCA`, `RRCA`, `RLA`, `RRA`) are the only
/// ones that are not prefixed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum BitShiftOp {
    #[display("RLC {_0}")]
    Rlc(RegOrPointer),
    #[display("RLCA")]
    Rlca,
    #[display("RRC {_0}")]
    Rrc(RegOrPointer),
    #[display("RRCA")]
    Rrca,
    #[display("RL {_0}")]
    Rl(RegOrPointer),
    #[display("RLA")]
    Rla,
    #[display("RR {_0}")]
    Rr(RegOrPointer),
    #[display("RRA")]
    Rra,
    #[display("SLA {_0}")]
    Sla(RegOrPointer),
    #[display("SRA {_0}")]
    Sra(RegOrPointer),
    #[display("SWAP {_0}")]
    Swap(RegOrPointer),
    #[display("SRL {_0}")]
    Srl(RegOrPointer),
}

impl BitShiftOp {
    fn target(&self) -> Option<RegOrPointer> {
        match self {
            BitShiftOp::Rlca | BitShiftOp::Rrca | BitShiftOp::Rla | BitShiftOp::Rra => None,
            BitShiftOp::Rlc(reg)
            | BitShiftOp::Rrc(reg)
            | BitShiftOp::Rl(reg)
            | BitShiftOp::Rr(reg)
            | BitShiftOp::Sla(reg)
            | BitShiftOp::Sra(reg)
            | BitShiftOp::Swap(reg)
            | BitShiftOp::Srl(reg) => Some(*reg),
        }
    }

    /// Returns the number of machine cycles it will take to complete this instruction.
    pub fn cycles(&self) -> u8 {
        match self.target() {
            None => 1,
            Some(RegOrPointer::Reg(_)) => 2,
            Some(RegOrPointer::Pointer) => 4,
        }
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        match self {
            BitShiftOp::Rlca | BitShiftOp::Rrca | BitShiftOp::Rla | BitShiftOp::Rra => 1,
            _ => 2,
        }
    }
}
