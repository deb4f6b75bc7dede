#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display)]
#[display("{_variant}")]
pub enum ControlOp {
    #[display("HALT")]
    Halt,
    #[display("NOP")]
    Noop,
    /// `STOP` is followed by a padding byte, which is held here.
    #[display("STOP")]
    Stop(u8),
}

impl ControlOp {
    /// Returns the number of machine cycles it will take to complete this instruction.
    pub fn cycles(&self) -> u8 {
        1
    }

    /// Returns the number of bytes it took to encode this instruction
    pub const fn size(&self) -> u8 {
        match self {
            ControlOp::Noop => 1,
            ControlOp::Stop(_) => 2,
            ControlOp::Halt => 1,
        }
    }
}
