use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum JumpOp {
    /// Op Codes: 0x20, 0x30, 0x28, 0x38
    #[display("JR {_0}, {_1}")]
    ConditionalRelative(Condition, i8),
    /// Op Code: 0x18
    #[display("JR {_0}")]
    Relative(i8),
    /// Op Codes: 0xC2, 0xD2, 0xCA, 0xDA
    #[display("JP {_0}, 0x{_1:0>4X}")]
    ConditionalAbsolute(Condition, u16),
    /// Op Code: 0xC3
    #[display("JP 0x{_0:0>4X}")]
    Absolute(u16),
    /// Op Code: 0xE9
    #[display("JP HL")]
    JumpToHL,
    /// Op Code: 0xCD
    #[display("CALL 0x{_0:0>4X}")]
    Call(u16),
    /// Op Codes: 0xC4, 0xD4, 0xCC, 0xDC
    #[display("CALL {_0}, 0x{_1:0>4X}")]
    ConditionalCall(Condition, u16),
    /// Op Code: 0xC9
    #[display("RET")]
    Return,
    /// Op Codes: 0xC0, 0xD0, 0xC8, 0xD8
    #[display("RET {_0}")]
    ConditionalReturn(Condition),
    /// Op Code: 0xD9
    /// Return from the subroutine and enable interupts
    #[display("RETI")]
    ReturnAndEnable,
    /// Op Codes: 0xC7, 0xCF, ..., 0xFF
    /// Calls the fixed address held in the op code, one of 0x00, 0x08, ..., 0x38
    #[display("RST 0x{_0:0>2X}")]
    Restart(u8),
}

impl JumpOp {
    /// Returns the number of machine cycles it will take to complete this instruction.
    pub fn cycles(&self, flags: &Flags) -> u8 {
        match self {
            JumpOp::ConditionalRelative(cond, _) => 2 + cond.passed(flags) as u8,
            JumpOp::Relative(_) => 3,
            JumpOp::ConditionalAbsolute(cond, _) => 3 + cond.passed(flags) as u8,
            JumpOp::Absolute(_) => 4,
            JumpOp::JumpToHL => 1,
            JumpOp::Call(_) => 6,
            JumpOp::ConditionalCall(cond, _) => 3 + (3 * cond.passed(flags) as u8),
            JumpOp::Return => 4,
            JumpOp::ConditionalReturn(cond) => 2 + (3 * cond.passed(flags) as u8),
            JumpOp::ReturnAndEnable => 4,
            JumpOp::Restart(_) => 4,
        }
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        match self {
            JumpOp::ConditionalRelative(_, _) => 2,
            JumpOp::Relative(_) => 2,
            JumpOp::ConditionalAbsolute(_, _) => 3,
            JumpOp::Absolute(_) => 3,
            JumpOp::JumpToHL => 1,
            JumpOp::Call(_) => 3,
            JumpOp::ConditionalCall(_, _) => 3,
            JumpOp::Return => 1,
            JumpOp::ConditionalReturn(_) => 1,
            JumpOp::ReturnAndEnable => 1,
            JumpOp::Restart(_) => 1,
        }
    }
}
