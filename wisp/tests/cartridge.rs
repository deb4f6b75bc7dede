use wisp::mem::MemoryLike;
use wisp::CartridgeError;
use wisp::Config;
use wisp::Gameboy;

mod common;

use common::rom_with_program;

#[test]
fn rejects_corrupt_header() {
    let mut rom = rom_with_program(&[0x00]);
    rom[0x134] = b'X';
    let err = Gameboy::new(&rom).unwrap_err();
    assert!(matches!(err, CartridgeError::ChecksumMismatch { .. }), "{err}");
}

#[test]
fn rejects_truncated_image() {
    let rom = rom_with_program(&[0x00]);
    let err = Gameboy::new(&rom[..0x4000]).unwrap_err();
    assert_eq!(err, CartridgeError::TooSmall { len: 0x4000 });
}

#[test]
fn session_errors_convert() {
    fn load(rom: &[u8]) -> Result<Gameboy, wisp::Error> {
        Ok(Gameboy::new(rom)?)
    }
    let err = load(&[0; 16]).unwrap_err();
    assert!(matches!(
        err,
        wisp::Error::Cartridge(CartridgeError::TooSmall { len: 16 })
    ));
}

#[test_log::test]
fn config_reaches_the_bus() {
    // LD (0x2000), A; JR -2
    let rom = rom_with_program(&[0xEA, 0x00, 0x20, 0x18, 0xFE]);
    let config = Config {
        trace_instructions: true,
        report_rom_writes: false,
    };
    let mut gb = Gameboy::with_config(&rom, config.clone()).unwrap();
    assert_eq!(gb.config(), &config);
    for _ in 0..4 {
        gb.step().unwrap();
    }
    // ROM writes are dropped regardless of reporting
    assert_eq!(gb.mem.read_byte(0x2000), 0x00);
}
