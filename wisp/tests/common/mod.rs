#![allow(dead_code)]

use wisp::rom::CartridgeHeader;

pub const ENTRY_POINT: usize = 0x0100;

/// Builds a 32KB image with the program at the entry point and a valid header checksum.
pub fn rom_with_program(program: &[u8]) -> Vec<u8> {
    // Keep clear of the title and the rest of the header
    assert!(ENTRY_POINT + program.len() <= 0x134, "program overlaps the header");
    let mut rom = vec![0; 0x8000];
    rom[ENTRY_POINT..ENTRY_POINT + program.len()].copy_from_slice(program);
    rom[0x134..0x138].copy_from_slice(b"TEST");
    rom[0x14D] = CartridgeHeader::compute_checksum(&rom);
    rom
}
