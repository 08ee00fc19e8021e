//! The 10-byte ID3v2 tag header.

use crate::encoding::{SYNCSAFE_MAX, decode_syncsafe, encode_syncsafe};
use crate::error::{Error, Result};

/// Magic bytes opening every ID3v2 tag.
pub const TAG_MAGIC: &[u8] = b"ID3";

/// Tag header length; the declared size excludes these bytes.
pub const HEADER_SIZE: usize = 10;

/// Header flag: unsynchronisation applied to the whole tag.
pub const FLAG_UNSYNCHRONISATION: u8 = 0x80;

/// Header flag: an extended header follows.
pub const FLAG_EXTENDED_HEADER: u8 = 0x40;

/// Parsed or to-be-written ID3v2 tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub major_version: u8,
    pub revision: u8,
    pub flags: u8,
    /// Size of everything after the header, decoded from syncsafe form.
    pub size: u32,
}

impl TagHeader {
    /// Header for an ID3v2.3.0 tag whose frames occupy `frames_len` bytes.
    pub fn v2_3(frames_len: usize) -> Result<Self> {
        let size = u32::try_from(frames_len)
            .ok()
            .filter(|s| *s <= SYNCSAFE_MAX)
            .ok_or(Error::TagTooLarge(frames_len))?;

        Ok(Self {
            major_version: 3,
            revision: 0,
            flags: 0,
            size,
        })
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..3].copy_from_slice(TAG_MAGIC);
        out[3] = self.major_version;
        out[4] = self.revision;
        out[5] = self.flags;
        out[6..10].copy_from_slice(&encode_syncsafe(self.size));
        out
    }

    /// Parse the header at the start of `data`.
    ///
    /// Returns `Ok(None)` when `data` does not begin with `ID3`. A buffer
    /// that starts with the magic but cannot hold the full header, or whose
    /// declared size runs past the end, is a [`Error::MalformedInputTag`].
    pub fn parse(data: &[u8]) -> Result<Option<Self>> {
        if !data.starts_with(TAG_MAGIC) {
            return Ok(None);
        }
        if data.len() < HEADER_SIZE {
            return Err(Error::MalformedInputTag {
                declared: HEADER_SIZE,
                available: data.len(),
            });
        }

        let header = Self {
            major_version: data[3],
            revision: data[4],
            flags: data[5],
            size: decode_syncsafe([data[6], data[7], data[8], data[9]]),
        };

        if header.tag_len() > data.len() {
            return Err(Error::MalformedInputTag {
                declared: header.tag_len(),
                available: data.len(),
            });
        }

        Ok(Some(header))
    }

    /// Total bytes the tag occupies, header included.
    pub fn tag_len(&self) -> usize {
        HEADER_SIZE + self.size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_v2_3() {
        let header = TagHeader::v2_3(300).unwrap();
        assert_eq!(
            header.encode(),
            [0x49, 0x44, 0x33, 0x03, 0x00, 0x00, 0x00, 0x00, 0x02, 0x2C]
        );
    }

    #[test]
    fn test_rejects_oversized_tag() {
        assert!(TagHeader::v2_3(SYNCSAFE_MAX as usize).is_ok());
        assert!(matches!(
            TagHeader::v2_3(SYNCSAFE_MAX as usize + 1),
            Err(Error::TagTooLarge(_))
        ));
    }

    #[test]
    fn test_parse_round_trip() {
        let mut data = TagHeader::v2_3(4).unwrap().encode().to_vec();
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(b"\xFF\xFB");

        let header = TagHeader::parse(&data).unwrap().unwrap();
        assert_eq!(header.major_version, 3);
        assert_eq!(header.size, 4);
        assert_eq!(header.tag_len(), 14);
    }

    #[test]
    fn test_parse_untagged() {
        assert_eq!(TagHeader::parse(b"\xFF\xFB\x90\x00").unwrap(), None);
        assert_eq!(TagHeader::parse(b"").unwrap(), None);
    }

    #[test]
    fn test_parse_truncated_header() {
        assert!(matches!(
            TagHeader::parse(b"ID3\x03\x00"),
            Err(Error::MalformedInputTag {
                declared: 10,
                available: 5
            })
        ));
    }

    #[test]
    fn test_parse_size_past_end() {
        let data = TagHeader::v2_3(100).unwrap().encode();
        assert!(matches!(
            TagHeader::parse(&data),
            Err(Error::MalformedInputTag {
                declared: 110,
                available: 10
            })
        ));
    }
}
