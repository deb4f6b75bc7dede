use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum LoadOp {
    /// Used for opcodes in 0x40..0x80 (except 0x76, which is HALT)
    #[display("LD {dest}, {src}")]
    Basic {
        dest: RegOrPointer,
        src: RegOrPointer,
    },
    /// Used for opcodes 0x_1 in the top quarter
    #[display("LD {_0}, 0x{_1:0>4X}")]
    Direct16(WideReg, u16),
    /// Used for opcodes 0x_6 and 0x_E in the top quarter
    #[display("LD {_0}, 0x{_1:0>2X}")]
    Direct(RegOrPointer, u8),
    /// Used for opcodes 0x_A in the top quarter
    #[display("LD A, {_0}")]
    LoadIntoA(LoadAPointer),
    /// Used for opcodes 0x_2 in the top quarter
    #[display("LD {_0}, A")]
    StoreFromA(LoadAPointer),
    /// Opcode: 0x08
    /// Store SP & $FF at address n16 and SP >> 8 at address n16 + 1.
    #[display("LD (0x{_0:0>4X}), SP")]
    StoreSP(u16),
    /// Opcode: 0xF9
    #[display("LD SP, HL")]
    HLIntoSP,
    /// Opcode: 0xF8
    /// Add the signed value e8 to SP and store the result in HL.
    #[display("LD HL, SP{_0:+}")]
    SPIntoHL(i8),
    /// Used for opcodes 0x_1 in the bottom quarter
    #[display("POP {_0}")]
    Pop(WideRegWithoutSP),
    /// Used for opcodes 0x_5 in the bottom quarter
    #[display("PUSH {_0}")]
    Push(WideRegWithoutSP),
    /// Opcode: 0xE0
    #[display("LDH (0xFF{_0:0>2X}), A")]
    StoreHigh(u8),
    /// Opcode: 0xF0
    #[display("LDH A, (0xFF{_0:0>2X})")]
    LoadHigh(u8),
    /// Opcode: 0xE2
    #[display("LD (C), A")]
    StoreC,
    /// Opcode: 0xF2
    #[display("LD A, (C)")]
    LoadC,
    /// Opcode: 0xEA
    #[display("LD (0x{ptr:0>4X}), A")]
    StoreA { ptr: u16 },
    /// Opcode: 0xFA
    #[display("LD A, (0x{ptr:0>4X})")]
    LoadA { ptr: u16 },
}

impl LoadOp {
    /// Returns the number of machine cycles it will take to complete this instruction.
    pub fn cycles(&self) -> u8 {
        match self {
            LoadOp::Basic {
                dest: RegOrPointer::Pointer,
                ..
            }
            | LoadOp::Basic {
                src: RegOrPointer::Pointer,
                ..
            } => 2,
            LoadOp::Basic { .. } => 1,
            LoadOp::Direct16(_, _) => 3,
            LoadOp::Direct(RegOrPointer::Pointer, _) => 3,
            LoadOp::Direct(_, _) => 2,
            LoadOp::LoadIntoA(_) => 2,
            LoadOp::StoreFromA(_) => 2,
            LoadOp::StoreSP(_) => 5,
            LoadOp::HLIntoSP => 2,
            LoadOp::SPIntoHL(_) => 3,
            LoadOp::Pop(_) => 3,
            LoadOp::Push(_) => 4,
            LoadOp::StoreHigh(_) => 3,
            LoadOp::LoadHigh(_) => 3,
            LoadOp::StoreC => 2,
            LoadOp::LoadC => 2,
            LoadOp::StoreA { .. } => 4,
            LoadOp::LoadA { .. } => 4,
        }
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        match self {
            LoadOp::Basic { .. } => 1,
            LoadOp::Direct16(_, _) => 3,
            LoadOp::Direct(_, _) => 2,
            LoadOp::LoadIntoA(_) => 1,
            LoadOp::StoreFromA(_) => 1,
            LoadOp::StoreSP(_) => 3,
            LoadOp::HLIntoSP => 1,
            LoadOp::SPIntoHL(_) => 2,
            LoadOp::Pop(_) => 1,
            LoadOp::Push(_) => 1,
            LoadOp::StoreHigh(_) => 2,
            LoadOp::LoadHigh(_) => 2,
            LoadOp::StoreC => 1,
            LoadOp::LoadC => 1,
            LoadOp::StoreA { .. } => 3,
            LoadOp::LoadA { .. } => 3,
        }
    }
}
