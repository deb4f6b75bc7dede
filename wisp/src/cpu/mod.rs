use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::error::DecodeError;
use crate::instruction::Instruction;
use crate::interrupt::InterruptController;
use crate::lookup::parse_instruction;
use crate::mem::MemoryLikeExt;

mod alu;
mod execute;
mod registers;

pub use registers::*;


#[derive(
    Debug, Default, Hash, Clone, PartialEq, Eq, derive_more::Display, Serialize, Deserialize,
)]
#[display("CPU {{ {regs} {interrupts} State={state} }}")]
pub struct Cpu {
    pub regs: Registers,
    pub interrupts: InterruptController,
    /// Once the CPU has halted or stopped, it can continue to be stepped, but nothing is fetched
    /// until an interrupt is pending.
    pub state: CpuState,
}

#[derive(
    Debug,
    Default,
    Hash,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::IsVariant,
    Serialize,
    Deserialize,
)]
pub enum CpuState {
    #[default]
    Running,
    Halted,
    Stopped,
}

impl Cpu {
    /// Constructs a CPU in its power-on state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches to the highest priority pending interrupt, if the IME allows it.
    pub fn check_and_dispatch<M: MemoryLikeExt>(&mut self, mem: &mut M) -> bool {
        self.interrupts.check_and_dispatch(&mut self.regs, mem)
    }

    /// Advances the CPU by one unit of work and returns the machine cycles it took. This is one
    /// of: a single idle cycle while halted or stopped, an interrupt dispatch, or one
    /// instruction.
    ///
    /// An undefined op code is reported before anything is mutated, including waking up.
    pub fn step<M: MemoryLikeExt>(&mut self, mem: &mut M) -> Result<u8, DecodeError> {
        let waking = !self.state.is_running();
        if waking && InterruptController::pending(mem) == 0 {
            return Ok(1);
        }
        if self.check_and_dispatch(mem) {
            if waking {
                self.wake();
            }
            return Ok(InterruptController::DISPATCH_CYCLES);
        }
        let instr = parse_instruction(&*mem, self.regs.pc)
            .map_err(|err| err.with_registers(self.regs))?;
        if waking {
            self.wake();
        }
        let enable = self.interrupts.take_scheduled();
        // Conditional costs depend on the flags before the instruction runs
        let cycles = instr.cycles(&self.regs.f);
        self.regs.pc = self.regs.pc.wrapping_add(instr.size() as u16);
        self.execute(instr, mem);
        if enable && instr != Instruction::Di {
            self.interrupts.set_ime(true);
        }
        Ok(cycles)
    }

    fn wake(&mut self) {
        debug!("Waking up from {}", self.state);
        self.state = CpuState::Running;
    }

    /// Performs an already decoded instruction. The PC must already point past it.
    pub fn execute<M: MemoryLikeExt>(&mut self, instr: Instruction, mem: &mut M) {
        match instr {
            Instruction::Load(op) => self.execute_load_op(op, mem),
            Instruction::ControlOp(op) => self.execute_control_op(op, mem),
            Instruction::Jump(op) => self.execute_jump_op(op, mem),
            Instruction::Arithmetic(op) => self.execute_arithmetic_op(op, mem),
            Instruction::BitShift(op) => self.execute_bit_shift_op(op, mem),
            Instruction::Bit(op) => self.execute_bit_op(op, mem),
            Instruction::Daa => self.regs.a = alu::to_bcd(self.regs.a, &mut self.regs.f),
            Instruction::Scf => {
                self.regs.f.set_subtract(false);
                self.regs.f.set_half_carry(false);
                self.regs.f.set_carry(true);
            }
            Instruction::Cpl => {
                self.regs.a = !self.regs.a;
                self.regs.f.set_subtract(true);
                self.regs.f.set_half_carry(true);
            }
            Instruction::Ccf => {
                let carry = self.regs.f.carry();
                self.regs.f.set_subtract(false);
                self.regs.f.set_half_carry(false);
                self.regs.f.set_carry(!carry);
            }
            Instruction::Di => self.interrupts.disable(),
            Instruction::Ei => self.interrupts.schedule_enable(),
        }
    }
}
