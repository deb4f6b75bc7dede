use wisp::cpu::CpuState;
use wisp::interrupt::Interrupt;
use wisp::mem::io::INTERRUPT_ENABLE;
use wisp::mem::io::INTERRUPT_FLAGS;
use wisp::mem::io::OAM_START;
use wisp::mem::MemoryLike;
use wisp::ppu::PpuMode;
use wisp::ppu::CYCLES_PER_FRAME;
use wisp::Gameboy;

mod common;

use common::rom_with_program;

#[test_log::test]
fn store_then_loop() {
    // LD A, 0x42; LD (0xC000), A; JP 0x0100
    let rom = rom_with_program(&[0x3E, 0x42, 0xEA, 0x00, 0xC0, 0xC3, 0x00, 0x01]);
    let mut gb = Gameboy::new(&rom).unwrap();
    assert_eq!(gb.header().title.as_str(), "TEST");
    for _ in 0..10 {
        for _ in 0..3 {
            gb.step().unwrap();
        }
        assert_eq!(gb.cpu.regs.pc, 0x0100);
    }
    assert_eq!(gb.mem.read_byte(0xC000), 0x42);
    assert_eq!(gb.cycles(), 10 * (2 + 4 + 4));
    let trail: Vec<_> = gb.recent_pcs().collect();
    assert_eq!(trail.len(), 30);
    assert_eq!(&trail[27..], &[0x0100, 0x0102, 0x0105]);
}

#[test]
fn oam_dma_from_vram() {
    // LD A, 0x80; LDH (0x46), A; JR -2
    let rom = rom_with_program(&[0x3E, 0x80, 0xE0, 0x46, 0x18, 0xFE]);
    let mut gb = Gameboy::new(&rom).unwrap();
    for i in 0..0xA0u16 {
        gb.mem.write_byte(0x8000 + i, (i as u8).wrapping_mul(3));
    }
    gb.step().unwrap();
    gb.step().unwrap();
    for i in 0..0xA0u16 {
        assert_eq!(
            gb.mem.read_byte(OAM_START + i),
            gb.mem.read_byte(0x8000 + i)
        );
    }
}

#[test]
fn direct_timer_dispatch() {
    let rom = rom_with_program(&[0x00]);
    let mut gb = Gameboy::new(&rom).unwrap();
    gb.cpu.interrupts.set_ime(true);
    gb.mem.write_byte(INTERRUPT_FLAGS, Interrupt::Timer.mask());
    gb.mem.write_byte(INTERRUPT_ENABLE, Interrupt::Timer.mask());
    assert!(gb.cpu.check_and_dispatch(&mut gb.mem));
    assert_eq!(gb.cpu.regs.pc, 0x0050);
    assert!(!gb.cpu.interrupts.ime());
    assert_eq!(gb.mem.interrupt_flags() & Interrupt::Timer.mask(), 0);
}

#[test_log::test]
fn timer_overflow_interrupts_program() {
    let rom = rom_with_program(&[
        0x3E, 0x05, // LD A, 0x05
        0xE0, 0x07, // LDH (TAC), A
        0x3E, 0x04, // LD A, 0x04
        0xE0, 0xFF, // LDH (IE), A
        0xFB, // EI
        0x18, 0xFE, // JR -2
    ]);
    let mut gb = Gameboy::new(&rom).unwrap();
    let mut steps = 0;
    while gb.cpu.regs.pc != 0x0050 {
        gb.step().unwrap();
        steps += 1;
        assert!(steps < 1000, "the timer never fired");
    }
    assert!(!gb.cpu.interrupts.ime());
    assert_eq!(gb.mem.interrupt_flags() & Interrupt::Timer.mask(), 0);
    // 256 increments at one every 4 cycles
    assert!(gb.cycles() >= 1024);
    assert_eq!(gb.cpu.regs.pop(&gb.mem), 0x0109);
}

#[test]
fn undefined_op_code_ends_session() {
    let rom = rom_with_program(&[0x00, 0xFD]);
    let mut gb = Gameboy::new(&rom).unwrap();
    gb.step().unwrap();
    let err = gb.step().unwrap_err();
    assert_eq!(err.opcode, 0xFD);
    assert_eq!(err.pc, 0x0101);
    assert_eq!(err.registers.map(|regs| regs.pc), Some(0x0101));
    assert_eq!(err.to_string(), "undefined op code 0xFD at 0x0101");
}

#[test]
fn frames_are_evenly_spaced() {
    // JR -2
    let rom = rom_with_program(&[0x18, 0xFE]);
    let mut gb = Gameboy::new(&rom).unwrap();
    let first_vblank = 144 * 114;
    gb.next_frame().unwrap();
    assert_eq!(gb.ppu.mode(), PpuMode::VBlank);
    assert!((first_vblank..first_vblank + 3).contains(&gb.cycles()));
    gb.next_frame().unwrap();
    let second_vblank = first_vblank + CYCLES_PER_FRAME as u64;
    assert!((second_vblank..second_vblank + 3).contains(&gb.cycles()));
}

#[test]
fn halt_until_vblank() {
    let rom = rom_with_program(&[
        0x3E, 0x01, // LD A, 0x01
        0xE0, 0xFF, // LDH (IE), A
        0x76, // HALT
        0x3C, // INC A
    ]);
    let mut gb = Gameboy::new(&rom).unwrap();
    gb.next_frame().unwrap();
    assert_eq!(gb.cpu.state, CpuState::Halted);
    assert_eq!(gb.cpu.regs.pc, 0x0105);
    gb.step().unwrap();
    assert_eq!(gb.cpu.state, CpuState::Running);
    assert_eq!(gb.cpu.regs.a, 0x02);
}

#[test]
fn runs_are_deterministic() {
    // LD HL, 0xC000; INC (HL); JR -3
    let rom = rom_with_program(&[0x21, 0x00, 0xC0, 0x34, 0x18, 0xFD]);
    let run = || {
        let mut gb = Gameboy::new(&rom).unwrap();
        (0..3).for_each(|_| gb.next_frame().unwrap());
        postcard::to_allocvec(&gb).unwrap()
    };
    assert_eq!(run(), run());
}
