//! The decode tables. Each table has an entry for every byte value. An entry reads whatever
//! immediate bytes its instruction carries and returns the decoded instruction, or `None` for the
//! handful of op codes that the CPU does not define.

use array_concat::concat_arrays;

use crate::error::DecodeError;
use crate::instruction::*;
use crate::mem::MemoryLike;

type OpArray<const N: usize> = [fn(&dyn MemoryLike, u16) -> Option<Instruction>; N];

/// Decodes the instruction that starts at `pc`. This only reads from memory.
pub fn parse_instruction(mem: &dyn MemoryLike, pc: u16) -> Result<Instruction, DecodeError> {
    let op = mem.read_byte(pc);
    OP_LOOKUP[op as usize](mem, pc).ok_or(DecodeError::new(op, pc))
}

fn parse_prefixed_instruction(mem: &dyn MemoryLike, pc: u16) -> Option<Instruction> {
    PREFIXED_OP_LOOKUP[mem.read_byte(pc) as usize](mem, pc)
}

fn undefined_op(_: &dyn MemoryLike, _: u16) -> Option<Instruction> {
    None
}

fn immediate(mem: &dyn MemoryLike, pc: u16) -> u8 {
    mem.read_byte(pc.wrapping_add(1))
}

fn immediate_wide(mem: &dyn MemoryLike, pc: u16) -> u16 {
    u16::from_le_bytes([
        mem.read_byte(pc.wrapping_add(1)),
        mem.read_byte(pc.wrapping_add(2)),
    ])
}

enum InnerRegOrPointer {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
    Pointer,
}

impl InnerRegOrPointer {
    const fn convert(self) -> RegOrPointer {
        match self {
            InnerRegOrPointer::A => RegOrPointer::Reg(HalfRegister::A),
            InnerRegOrPointer::B => RegOrPointer::Reg(HalfRegister::B),
            InnerRegOrPointer::C => RegOrPointer::Reg(HalfRegister::C),
            InnerRegOrPointer::D => RegOrPointer::Reg(HalfRegister::D),
            InnerRegOrPointer::E => RegOrPointer::Reg(HalfRegister::E),
            InnerRegOrPointer::H => RegOrPointer::Reg(HalfRegister::H),
            InnerRegOrPointer::L => RegOrPointer::Reg(HalfRegister::L),
            InnerRegOrPointer::Pointer => RegOrPointer::Pointer,
        }
    }
}

macro_rules! define_op {
    () => {
        undefined_op
    };
    (DAA) => {
        |_, _| Some(Instruction::Daa)
    };
    (SCF) => {
        |_, _| Some(Instruction::Scf)
    };
    (CPL) => {
        |_, _| Some(Instruction::Cpl)
    };
    (CCF) => {
        |_, _| Some(Instruction::Ccf)
    };
    (DI) => {
        |_, _| Some(Instruction::Di)
    };
    (EI) => {
        |_, _| Some(Instruction::Ei)
    };
    (NOOP) => {
        |_, _| Some(Instruction::ControlOp(ControlOp::Noop))
    };
    (STOP) => {
        |data, pc| Some(Instruction::ControlOp(ControlOp::Stop(immediate(data, pc))))
    };
    (JR) => {
        |data, pc| Some(Instruction::Jump(JumpOp::Relative(immediate(data, pc) as i8)))
    };
    (JR, $r: ident) => {
        |data, pc| {
            Some(Instruction::Jump(JumpOp::ConditionalRelative(
                Condition::$r,
                immediate(data, pc) as i8,
            )))
        }
    };
    (JP) => {
        |data, pc| Some(Instruction::Jump(JumpOp::Absolute(immediate_wide(data, pc))))
    };
    (JP, HL) => {
        |_, _| Some(Instruction::Jump(JumpOp::JumpToHL))
    };
    (JP, $r: ident) => {
        |data, pc| {
            Some(Instruction::Jump(JumpOp::ConditionalAbsolute(
                Condition::$r,
                immediate_wide(data, pc),
            )))
        }
    };
    (CALL) => {
        |data, pc| Some(Instruction::Jump(JumpOp::Call(immediate_wide(data, pc))))
    };
    (CALL, $r: ident) => {
        |data, pc| {
            Some(Instruction::Jump(JumpOp::ConditionalCall(
                Condition::$r,
                immediate_wide(data, pc),
            )))
        }
    };
    (RET) => {
        |_, _| Some(Instruction::Jump(JumpOp::Return))
    };
    (RETI) => {
        |_, _| Some(Instruction::Jump(JumpOp::ReturnAndEnable))
    };
    (RET, $r: ident) => {
        |_, _| Some(Instruction::Jump(JumpOp::ConditionalReturn(Condition::$r)))
    };
    (RST, $v: literal) => {
        |_, _| Some(Instruction::Jump(JumpOp::Restart($v)))
    };
    (PREFIX) => {
        |mem, pc| parse_prefixed_instruction(mem, pc.wrapping_add(1))
    };
    (ADD, SP) => {
        |data, pc| Some(Instruction::Arithmetic(ArithmeticOp::AddSP(immediate(data, pc) as i8)))
    };
    (ADD16, $r: ident) => {
        |_, _| Some(Instruction::Arithmetic(ArithmeticOp::Add16(WideReg::$r)))
    };
    (INC, $r: ident) => {
        |_, _| Some(Instruction::Arithmetic(ArithmeticOp::Inc(InnerRegOrPointer::$r.convert())))
    };
    (INC16, $r: ident) => {
        |_, _| Some(Instruction::Arithmetic(ArithmeticOp::Inc16(WideReg::$r)))
    };
    (DEC, $r: ident) => {
        |_, _| Some(Instruction::Arithmetic(ArithmeticOp::Dec(InnerRegOrPointer::$r.convert())))
    };
    (DEC16, $r: ident) => {
        |_, _| Some(Instruction::Arithmetic(ArithmeticOp::Dec16(WideReg::$r)))
    };
    // The eight accumulator ops come in a register form (one per column of the third quarter)
    // and an immediate form (in the bottom quarter).
    (ALU, $op: ident) => {
        |data, pc| {
            Some(Instruction::Arithmetic(ArithmeticOp::$op(SomeByte::Direct(immediate(
                data, pc,
            )))))
        }
    };
    (ALU, $op: ident, $r: ident) => {
        |_, _| {
            Some(Instruction::Arithmetic(ArithmeticOp::$op(
                InnerRegOrPointer::$r.convert().into(),
            )))
        }
    };
    (LD, Pointer, Pointer,) => {
        |_, _| Some(Instruction::ControlOp(ControlOp::Halt))
    };
    (LD, $r1: ident, $r2: ident,) => {
        |_, _| {
            Some(Instruction::Load(LoadOp::Basic {
                dest: InnerRegOrPointer::$r1.convert(),
                src: InnerRegOrPointer::$r2.convert(),
            }))
        }
    };
    (LD, HL, SP) => {
        |data, pc| Some(Instruction::Load(LoadOp::SPIntoHL(immediate(data, pc) as i8)))
    };
    (LD, SP, HL) => {
        |_, _| Some(Instruction::Load(LoadOp::HLIntoSP))
    };
    (LD, A, $r: ident) => {
        |_, _| Some(Instruction::Load(LoadOp::LoadIntoA(LoadAPointer::$r)))
    };
    (LD, $r: ident, A) => {
        |_, _| Some(Instruction::Load(LoadOp::StoreFromA(LoadAPointer::$r)))
    };
    (LD, $r: ident) => {
        |data, pc| {
            Some(Instruction::Load(LoadOp::Direct(
                InnerRegOrPointer::$r.convert(),
                immediate(data, pc),
            )))
        }
    };
    (LD16, $r: ident) => {
        |data, pc| {
            Some(Instruction::Load(LoadOp::Direct16(
                WideReg::$r,
                immediate_wide(data, pc),
            )))
        }
    };
    (StoreSP) => {
        |data, pc| Some(Instruction::Load(LoadOp::StoreSP(immediate_wide(data, pc))))
    };
    (StoreA) => {
        |data, pc| {
            Some(Instruction::Load(LoadOp::StoreA {
                ptr: immediate_wide(data, pc),
            }))
        }
    };
    (LoadA) => {
        |data, pc| {
            Some(Instruction::Load(LoadOp::LoadA {
                ptr: immediate_wide(data, pc),
            }))
        }
    };
    (StoreHigh) => {
        |data, pc| Some(Instruction::Load(LoadOp::StoreHigh(immediate(data, pc))))
    };
    (LoadHigh) => {
        |data, pc| Some(Instruction::Load(LoadOp::LoadHigh(immediate(data, pc))))
    };
    (StoreC) => {
        |_, _| Some(Instruction::Load(LoadOp::StoreC))
    };
    (LoadC) => {
        |_, _| Some(Instruction::Load(LoadOp::LoadC))
    };
    (POP, $r: ident) => {
        |_, _| Some(Instruction::Load(LoadOp::Pop(WideRegWithoutSP::$r)))
    };
    (PUSH, $r: ident) => {
        |_, _| Some(Instruction::Load(LoadOp::Push(WideRegWithoutSP::$r)))
    };
    (RLCA) => {
        |_, _| Some(Instruction::BitShift(BitShiftOp::Rlca))
    };
    (RLA) => {
        |_, _| Some(Instruction::BitShift(BitShiftOp::Rla))
    };
    (RRCA) => {
        |_, _| Some(Instruction::BitShift(BitShiftOp::Rrca))
    };
    (RRA) => {
        |_, _| Some(Instruction::BitShift(BitShiftOp::Rra))
    };
    /* --- Prefixed op definitions --- */
    (SHIFT, $op: ident, $r: ident) => {
        |_, _| Some(Instruction::BitShift(BitShiftOp::$op(InnerRegOrPointer::$r.convert())))
    };
    ($op: ident, $b: literal, $r: ident) => {
        |_, _| {
            Some(Instruction::Bit(BitOp {
                bit: $b,
                reg: InnerRegOrPointer::$r.convert(),
                op: BitOpInner::$op,
            }))
        }
    };
}

macro_rules! define_op_chunk {
    (LD) => {{
        const OPS: OpArray<0x40> = concat_arrays!(
            define_op_chunk!(LD, B),
            define_op_chunk!(LD, C),
            define_op_chunk!(LD, D),
            define_op_chunk!(LD, E),
            define_op_chunk!(LD, H),
            define_op_chunk!(LD, L),
            define_op_chunk!(LD, Pointer),
            define_op_chunk!(LD, A)
        );
        OPS
    }};
    (LD, $r: ident) => {{
        const OPS: OpArray<8> = [
            define_op!(LD, $r, B,),
            define_op!(LD, $r, C,),
            define_op!(LD, $r, D,),
            define_op!(LD, $r, E,),
            define_op!(LD, $r, H,),
            define_op!(LD, $r, L,),
            define_op!(LD, $r, Pointer,),
            define_op!(LD, $r, A,),
        ];
        OPS
    }};
    ($x: ident, NUM) => {{
        const OPS: OpArray<0x40> = concat_arrays!(
            define_op_chunk!($x, 0,),
            define_op_chunk!($x, 1,),
            define_op_chunk!($x, 2,),
            define_op_chunk!($x, 3,),
            define_op_chunk!($x, 4,),
            define_op_chunk!($x, 5,),
            define_op_chunk!($x, 6,),
            define_op_chunk!($x, 7,)
        );
        OPS
    }};
    ($x: ident, $i: literal,) => {{
        const OPS: OpArray<0x08> = [
            define_op!($x, $i, B),
            define_op!($x, $i, C),
            define_op!($x, $i, D),
            define_op!($x, $i, E),
            define_op!($x, $i, H),
            define_op!($x, $i, L),
            define_op!($x, $i, Pointer),
            define_op!($x, $i, A),
        ];
        OPS
    }};
    ($kind: ident, $x: ident) => {{
        const OPS: OpArray<8> = [
            define_op!($kind, $x, B),
            define_op!($kind, $x, C),
            define_op!($kind, $x, D),
            define_op!($kind, $x, E),
            define_op!($kind, $x, H),
            define_op!($kind, $x, L),
            define_op!($kind, $x, Pointer),
            define_op!($kind, $x, A),
        ];
        OPS
    }};
}

macro_rules! define_op_lookup_table {
    () => {
        concat_arrays!(
            define_op_lookup_table!(CHUNK_ONE),
            define_op_lookup_table!(CHUNK_TWO),
            define_op_lookup_table!(CHUNK_THREE),
            define_op_lookup_table!(CHUNK_FOUR)
        )
    };
    (PREFIXED) => {
        concat_arrays!(
            define_op_chunk!(SHIFT, Rlc),
            define_op_chunk!(SHIFT, Rrc),
            define_op_chunk!(SHIFT, Rl),
            define_op_chunk!(SHIFT, Rr),
            define_op_chunk!(SHIFT, Sla),
            define_op_chunk!(SHIFT, Sra),
            define_op_chunk!(SHIFT, Swap),
            define_op_chunk!(SHIFT, Srl),
            define_op_chunk!(Bit, NUM),
            define_op_chunk!(Res, NUM),
            define_op_chunk!(Set, NUM)
        )
    };
    // The top and bottom quarters of the table are irregular. They are written out as sixteen
    // columns of four (0x_0 through 0x_F), then transposed into rows.
    (CHUNK_ONE) => {{
        const TO_TRANSPOSED: [OpArray<4>; 0x10] = [
            [
                define_op!(NOOP),
                define_op!(STOP),
                define_op!(JR, NotZero),
                define_op!(JR, NotCarry),
            ],
            [
                define_op!(LD16, BC),
                define_op!(LD16, DE),
                define_op!(LD16, HL),
                define_op!(LD16, SP),
            ],
            [
                define_op!(LD, BC, A),
                define_op!(LD, DE, A),
                define_op!(LD, Hli, A),
                define_op!(LD, Hld, A),
            ],
            [
                define_op!(INC16, BC),
                define_op!(INC16, DE),
                define_op!(INC16, HL),
                define_op!(INC16, SP),
            ],
            [
                define_op!(INC, B),
                define_op!(INC, D),
                define_op!(INC, H),
                define_op!(INC, Pointer),
            ],
            [
                define_op!(DEC, B),
                define_op!(DEC, D),
                define_op!(DEC, H),
                define_op!(DEC, Pointer),
            ],
            [
                define_op!(LD, B),
                define_op!(LD, D),
                define_op!(LD, H),
                define_op!(LD, Pointer),
            ],
            [
                define_op!(RLCA),
                define_op!(RLA),
                define_op!(DAA),
                define_op!(SCF),
            ],
            [
                define_op!(StoreSP),
                define_op!(JR),
                define_op!(JR, Zero),
                define_op!(JR, Carry),
            ],
            [
                define_op!(ADD16, BC),
                define_op!(ADD16, DE),
                define_op!(ADD16, HL),
                define_op!(ADD16, SP),
            ],
            [
                define_op!(LD, A, BC),
                define_op!(LD, A, DE),
                define_op!(LD, A, Hli),
                define_op!(LD, A, Hld),
            ],
            [
                define_op!(DEC16, BC),
                define_op!(DEC16, DE),
                define_op!(DEC16, HL),
                define_op!(DEC16, SP),
            ],
            [
                define_op!(INC, C),
                define_op!(INC, E),
                define_op!(INC, L),
                define_op!(INC, A),
            ],
            [
                define_op!(DEC, C),
                define_op!(DEC, E),
                define_op!(DEC, L),
                define_op!(DEC, A),
            ],
            [
                define_op!(LD, C),
                define_op!(LD, E),
                define_op!(LD, L),
                define_op!(LD, A),
            ],
            [
                define_op!(RRCA),
                define_op!(RRA),
                define_op!(CPL),
                define_op!(CCF),
            ],
        ];
        const TRANSPOSED: [OpArray<16>; 4] = transpose!(TO_TRANSPOSED);
        const CHUNK: OpArray<0x40> =
            concat_arrays!(TRANSPOSED[0], TRANSPOSED[1], TRANSPOSED[2], TRANSPOSED[3]);
        CHUNK
    }};
    (CHUNK_TWO) => {
        define_op_chunk!(LD)
    };
    (CHUNK_THREE) => {{
        const CHUNK: OpArray<0x40> = concat_arrays!(
            define_op_chunk!(ALU, Add),
            define_op_chunk!(ALU, Adc),
            define_op_chunk!(ALU, Sub),
            define_op_chunk!(ALU, Sbc),
            define_op_chunk!(ALU, And),
            define_op_chunk!(ALU, Xor),
            define_op_chunk!(ALU, Or),
            define_op_chunk!(ALU, Cp)
        );
        CHUNK
    }};
    (CHUNK_FOUR) => {{
        const TO_TRANSPOSED: [OpArray<4>; 0x10] = [
            [
                define_op!(RET, NotZero),
                define_op!(RET, NotCarry),
                define_op!(StoreHigh),
                define_op!(LoadHigh),
            ],
            [
                define_op!(POP, BC),
                define_op!(POP, DE),
                define_op!(POP, HL),
                define_op!(POP, AF),
            ],
            [
                define_op!(JP, NotZero),
                define_op!(JP, NotCarry),
                define_op!(StoreC),
                define_op!(LoadC),
            ],
            [
                define_op!(JP),
                define_op!(), // 0xD3
                define_op!(), // 0xE3
                define_op!(DI),
            ],
            [
                define_op!(CALL, NotZero),
                define_op!(CALL, NotCarry),
                define_op!(), // 0xE4
                define_op!(), // 0xF4
            ],
            [
                define_op!(PUSH, BC),
                define_op!(PUSH, DE),
                define_op!(PUSH, HL),
                define_op!(PUSH, AF),
            ],
            [
                define_op!(ALU, Add),
                define_op!(ALU, Sub),
                define_op!(ALU, And),
                define_op!(ALU, Or),
            ],
            [
                define_op!(RST, 0x00),
                define_op!(RST, 0x10),
                define_op!(RST, 0x20),
                define_op!(RST, 0x30),
            ],
            [
                define_op!(RET, Zero),
                define_op!(RET, Carry),
                define_op!(ADD, SP),
                define_op!(LD, HL, SP),
            ],
            [
                define_op!(RET),
                define_op!(RETI),
                define_op!(JP, HL),
                define_op!(LD, SP, HL),
            ],
            [
                define_op!(JP, Zero),
                define_op!(JP, Carry),
                define_op!(StoreA),
                define_op!(LoadA),
            ],
            [
                define_op!(PREFIX),
                define_op!(), // 0xDB
                define_op!(), // 0xEB
                define_op!(EI),
            ],
            [
                define_op!(CALL, Zero),
                define_op!(CALL, Carry),
                define_op!(), // 0xEC
                define_op!(), // 0xFC
            ],
            [
                define_op!(CALL),
                define_op!(), // 0xDD
                define_op!(), // 0xED
                define_op!(), // 0xFD
            ],
            [
                define_op!(ALU, Adc),
                define_op!(ALU, Sbc),
                define_op!(ALU, Xor),
                define_op!(ALU, Cp),
            ],
            [
                define_op!(RST, 0x08),
                define_op!(RST, 0x18),
                define_op!(RST, 0x28),
                define_op!(RST, 0x38),
            ],
        ];
        const TRANSPOSED: [OpArray<16>; 4] = transpose!(TO_TRANSPOSED);
        const CHUNK: OpArray<0x40> =
            concat_arrays!(TRANSPOSED[0], TRANSPOSED[1], TRANSPOSED[2], TRANSPOSED[3]);
        CHUNK
    }};
}

macro_rules! transpose {
    ($arr: ident) => {{
        const TRANSPOSED: [OpArray<16>; 4] = [
            transpose!($arr, 0),
            transpose!($arr, 1),
            transpose!($arr, 2),
            transpose!($arr, 3),
        ];
        TRANSPOSED
    }};
    ($arr: ident, $i: literal) => {{
        const INNER: OpArray<16> = [
            $arr[0][$i],
            $arr[1][$i],
            $arr[2][$i],
            $arr[3][$i],
            $arr[4][$i],
            $arr[5][$i],
            $arr[6][$i],
            $arr[7][$i],
            $arr[8][$i],
            $arr[9][$i],
            $arr[10][$i],
            $arr[11][$i],
            $arr[12][$i],
            $arr[13][$i],
            $arr[14][$i],
            $arr[15][$i],
        ];
        INNER
    }};
}

// array_concat emits a cfg that rustc does not know about
#[allow(unexpected_cfgs)]
static OP_LOOKUP: OpArray<0x100> = define_op_lookup_table!();
#[allow(unexpected_cfgs)]
static PREFIXED_OP_LOOKUP: OpArray<0x100> = define_op_lookup_table!(PREFIXED);
