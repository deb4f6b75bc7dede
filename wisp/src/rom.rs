use heapless::String as InlineString;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::error::CartridgeError;
use crate::mem::ROM_LEN;

/// A validated cartridge image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    header: CartridgeHeader,
    data: Box<[u8]>,
}

impl Cartridge {
    /// Checks the size and header checksum of the image. Nothing is executed if this fails.
    pub fn new(rom: &[u8]) -> Result<Self, CartridgeError> {
        if rom.len() < ROM_LEN {
            return Err(CartridgeError::TooSmall { len: rom.len() });
        }
        let header = CartridgeHeader::extract_from_rom(rom);
        let computed = CartridgeHeader::compute_checksum(rom);
        if computed != header.header_checksum {
            return Err(CartridgeError::ChecksumMismatch {
                expected: header.header_checksum,
                computed,
            });
        }
        if rom.len() > ROM_LEN {
            warn!(
                "Cartridge image is {} bytes, only the first {ROM_LEN} are mapped",
                rom.len()
            );
        }
        info!(
            "Loaded cartridge {:?} (type 0x{:0>2X})",
            header.title, header.cartridge_type
        );
        Ok(Self {
            header,
            data: rom.into(),
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The parts of the cartridge header, between `0x100` and `0x14F`, that the core looks at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartridgeHeader {
    /// The memory region between `0x134` and `0x142`, up to the first NUL.
    pub title: InlineString<15>,
    /// The byte at `0x143` is `0x80` or `0xC0`.
    pub cgb: bool,
    /// The byte at `0x146` is `0x03`.
    pub sgb: bool,
    /// The byte at `0x147`, which names the memory bank controller.
    pub cartridge_type: u8,
    /// The byte at `0x14D`. On start, the header is checksummed and the result must match this
    /// value or the boot up will fail.
    pub header_checksum: u8,
}

impl CartridgeHeader {
    pub const START_ADDR: usize = 0x100;
    pub const END_ADDR: usize = 0x14F;
    pub const LENGTH: usize = Self::END_ADDR - Self::START_ADDR + 1;

    /// Reads the header fields. The image must be at least as long as the header.
    pub fn extract_from_rom(rom: &[u8]) -> Self {
        let title = rom[0x134..=0x142]
            .iter()
            .take_while(|b| **b != 0)
            .map(|b| if b.is_ascii() { *b as char } else { '?' })
            .collect();
        Self {
            title,
            cgb: matches!(rom[0x143], 0x80 | 0xC0),
            sgb: rom[0x146] == 0x03,
            cartridge_type: rom[0x147],
            header_checksum: rom[0x14D],
        }
    }

    /// The checksum over `0x134..=0x14C`.
    pub fn compute_checksum(rom: &[u8]) -> u8 {
        rom[0x134..0x14D]
            .iter()
            .fold(0u8, |digest, b| digest.wrapping_sub(*b).wrapping_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(title: &[u8]) -> Vec<u8> {
        let mut rom = vec![0; ROM_LEN];
        rom[0x134..0x134 + title.len()].copy_from_slice(title);
        rom[0x143] = 0x80;
        rom[0x146] = 0x03;
        rom[0x147] = 0x01;
        rom[0x14D] = CartridgeHeader::compute_checksum(&rom);
        rom
    }

    #[test]
    fn header_fields() {
        let cart = Cartridge::new(&image(b"WISP")).unwrap();
        let header = cart.header();
        assert_eq!(header.title.as_str(), "WISP");
        assert!(header.cgb);
        assert!(header.sgb);
        assert_eq!(header.cartridge_type, 0x01);
        assert_eq!(cart.data().len(), ROM_LEN);
    }

    #[test]
    fn full_length_title() {
        let cart = Cartridge::new(&image(b"ABCDEFGHIJKLMNO")).unwrap();
        assert_eq!(cart.header().title.as_str(), "ABCDEFGHIJKLMNO");
    }

    #[test]
    fn checksum_of_empty_header() {
        // 25 bytes of zero, each subtracting one
        let rom = vec![0; ROM_LEN];
        assert_eq!(CartridgeHeader::compute_checksum(&rom), 0u8.wrapping_sub(25));
    }

    #[test]
    fn rejects_small_images() {
        let rom = vec![0; ROM_LEN - 1];
        assert_eq!(
            Cartridge::new(&rom),
            Err(CartridgeError::TooSmall { len: ROM_LEN - 1 })
        );
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut rom = image(b"WISP");
        let expected = rom[0x14D].wrapping_add(1);
        rom[0x14D] = expected;
        assert_eq!(
            Cartridge::new(&rom),
            Err(CartridgeError::ChecksumMismatch {
                expected,
                computed: expected.wrapping_sub(1),
            })
        );
    }

    #[test]
    fn accepts_large_images() {
        let mut rom = image(b"BIG");
        rom.resize(ROM_LEN * 4, 0xFF);
        let cart = Cartridge::new(&rom).unwrap();
        assert_eq!(cart.data().len(), ROM_LEN * 4);
    }
}
