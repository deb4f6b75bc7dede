use super::*;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum ArithmeticOp {
    #[display("ADD A, {_0}")]
    Add(SomeByte),
    #[display("ADD HL, {_0}")]
    Add16(WideReg),
    #[display("ADD SP, {_0}")]
    AddSP(i8),
    #[display("ADC A, {_0}")]
    Adc(SomeByte),
    #[display("SUB {_0}")]
    Sub(SomeByte),
    #[display("SBC A, {_0}")]
    Sbc(SomeByte),
    #[display("AND {_0}")]
    And(SomeByte),
    #[display("XOR {_0}")]
    Xor(SomeByte),
    #[display("OR {_0}")]
    Or(SomeByte),
    #[display("CP {_0}")]
    Cp(SomeByte),
    #[display("INC {_0}")]
    Inc(RegOrPointer),
    #[display("INC {_0}")]
    Inc16(WideReg),
    #[display("DEC {_0}")]
    Dec(RegOrPointer),
    #[display("DEC {_0}")]
    Dec16(WideReg),
}

impl ArithmeticOp {
    /// Returns the number of machine cycles it will take to complete this instruction.
    pub fn cycles(&self) -> u8 {
        match self {
            ArithmeticOp::Add(byte)
            | ArithmeticOp::Adc(byte)
            | ArithmeticOp::Sub(byte)
            | ArithmeticOp::Sbc(byte)
            | ArithmeticOp::And(byte)
            | ArithmeticOp::Xor(byte)
            | ArithmeticOp::Or(byte)
            | ArithmeticOp::Cp(byte) => 2 - byte.is_register() as u8,
            ArithmeticOp::Inc(RegOrPointer::Pointer) | ArithmeticOp::Dec(RegOrPointer::Pointer) => 3,
            ArithmeticOp::Inc(_) | ArithmeticOp::Dec(_) => 1,
            ArithmeticOp::Add16(_) | ArithmeticOp::Inc16(_) | ArithmeticOp::Dec16(_) => 2,
            ArithmeticOp::AddSP(_) => 4,
        }
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        match self {
            ArithmeticOp::Add(SomeByte::Direct(_))
            | ArithmeticOp::Adc(SomeByte::Direct(_))
            | ArithmeticOp::Sub(SomeByte::Direct(_))
            | ArithmeticOp::Sbc(SomeByte::Direct(_))
            | ArithmeticOp::And(SomeByte::Direct(_))
            | ArithmeticOp::Xor(SomeByte::Direct(_))
            | ArithmeticOp::Or(SomeByte::Direct(_))
            | ArithmeticOp::Cp(SomeByte::Direct(_))
            | ArithmeticOp::AddSP(_) => 2,
            _ => 1,
        }
    }
}
