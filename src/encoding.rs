//! Numeric field helpers shared by the ZIP and ID3 encoders.

use flate2::Crc;

use crate::error::{Error, Result};

/// Largest value a 4-byte syncsafe integer can carry (28 value bits).
pub const SYNCSAFE_MAX: u32 = (1 << 28) - 1;

/// Encode `value` as a 4-byte syncsafe integer, most significant 7 bits first.
///
/// Callers that cannot guarantee the range check against [`SYNCSAFE_MAX`]
/// first; release builds drop the bits above the 28th.
pub fn encode_syncsafe(value: u32) -> [u8; 4] {
    debug_assert!(
        value <= SYNCSAFE_MAX,
        "{value} does not fit a syncsafe integer"
    );
    let mut out = [0u8; 4];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = ((value >> (7 * (3 - i))) & 0x7F) as u8;
    }
    out
}

/// Decode a 4-byte syncsafe integer. The top bit of each byte is ignored.
pub fn decode_syncsafe(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | (b & 0x7F) as u32)
}

/// CRC-32 (IEEE 802.3) of `data`, as stored in ZIP headers.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

/// Narrow a length to a 16-bit ZIP field, failing instead of truncating.
pub fn to_u16(value: usize, field: &str) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| Error::ArchiveTooLarge(format!("{} {} exceeds 65535", field, value)))
}

/// Narrow a length or offset to a 32-bit ZIP field, failing instead of truncating.
pub fn to_u32(value: usize, field: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::ArchiveTooLarge(format!("{} {} exceeds 4 GiB", field, value)))
}
