use thiserror::Error;

use crate::cpu::Registers;

/// An op code with no defined operation was fetched. Nothing has been mutated when this is
/// returned, but execution can not continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("undefined op code 0x{opcode:0>2X} at 0x{pc:0>4X}")]
pub struct DecodeError {
    pub opcode: u8,
    pub pc: u16,
    /// The state of the CPU when the op code was fetched. This is only missing when the error
    /// comes straight from the decoder.
    pub registers: Option<Registers>,
}

impl DecodeError {
    pub(crate) fn new(opcode: u8, pc: u16) -> Self {
        Self {
            opcode,
            pc,
            registers: None,
        }
    }

    pub(crate) fn with_registers(mut self, registers: Registers) -> Self {
        self.registers = Some(registers);
        self
    }
}

/// The cartridge image was rejected before anything was executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    #[error("cartridge image is {len} bytes, at least 32768 are required")]
    TooSmall { len: usize },
    #[error("header checksum mismatch: the header has 0x{expected:0>2X} but 0x{computed:0>2X} was computed")]
    ChecksumMismatch { expected: u8, computed: u8 },
}

/// Everything that can end an emulation session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),
}
