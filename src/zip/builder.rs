//! Stored (uncompressed) ZIP archive writer.
//!
//! The archive is emitted in three regions:
//! 1. Local file header + raw payload for each entry, in input order
//! 2. Central Directory, one record per entry, in the same order
//! 3. End of Central Directory trailer
//!
//! Every central record carries the byte offset at which its local header
//! starts; the builder tracks that offset as it appends each block, so the
//! values are exact by construction.

use crate::encoding::{to_u16, to_u32};
use crate::error::Result;

use super::structures::{EndOfCentralDirectory, FileHeader};

/// A named payload to place in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Builds stored ZIP archives from in-memory entries.
///
/// The builder holds no state between calls; [`ArchiveBuilder::build`] can be
/// called concurrently from any number of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Encode `entries` as a ZIP archive.
    ///
    /// Names are written as given: duplicates and empty names pass through.
    /// An empty slice yields a 22-byte archive holding only the trailer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArchiveTooLarge`](crate::Error::ArchiveTooLarge) when
    /// the entry count, a name, a payload or an offset exceeds what the
    /// classic (non-ZIP64) format can record.
    pub fn build(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
        let entry_count = to_u16(entries.len(), "entry count")?;

        let headers = entries
            .iter()
            .map(|e| FileHeader::stored(&e.name, &e.data))
            .collect::<Result<Vec<_>>>()?;

        let local_size: usize = headers
            .iter()
            .zip(entries)
            .map(|(h, e)| h.local_len() + e.data.len())
            .sum();
        let central_size: usize = headers.iter().map(FileHeader::central_len).sum();

        let mut out =
            Vec::with_capacity(local_size + central_size + EndOfCentralDirectory::SIZE);
        let mut central = Vec::with_capacity(central_size);

        for (header, entry) in headers.iter().zip(entries) {
            let offset = to_u32(out.len(), "local header offset")?;
            tracing::trace!(name = %entry.name, offset, size = entry.data.len(), "adding entry");

            header.write_local(&mut out)?;
            out.extend_from_slice(&entry.data);
            header.write_central(offset, &mut central)?;
        }

        let cd_offset = to_u32(out.len(), "central directory offset")?;
        let cd_size = to_u32(central.len(), "central directory size")?;
        out.extend_from_slice(&central);

        EndOfCentralDirectory::new(entry_count, cd_size, cd_offset).write_to(&mut out)?;

        tracing::debug!(
            entries = entries.len(),
            cd_offset,
            cd_size,
            total = out.len(),
            "built archive"
        );

        Ok(out)
    }
}

/// Shorthand for [`ArchiveBuilder::build`].
pub fn build_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    ArchiveBuilder::new().build(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::structures::{CDFH_SIGNATURE, LFH_SIGNATURE};
    use proptest::prelude::*;

    fn u16_at(buf: &[u8], pos: usize) -> u16 {
        u16::from_le_bytes([buf[pos], buf[pos + 1]])
    }

    fn u32_at(buf: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
    }

    /// Walk the central directory by hand and return each record's offset.
    fn central_offsets(buf: &[u8]) -> Vec<u32> {
        let eocd = buf.len() - EndOfCentralDirectory::SIZE;
        let count = u16_at(buf, eocd + 10) as usize;
        let mut pos = u32_at(buf, eocd + 16) as usize;
        let mut offsets = Vec::new();
        for _ in 0..count {
            assert_eq!(&buf[pos..pos + 4], CDFH_SIGNATURE);
            let name_len = u16_at(buf, pos + 28) as usize;
            let extra_len = u16_at(buf, pos + 30) as usize;
            let comment_len = u16_at(buf, pos + 32) as usize;
            offsets.push(u32_at(buf, pos + 42));
            pos += 46 + name_len + extra_len + comment_len;
        }
        offsets
    }

    #[test]
    fn test_empty_archive_is_bare_trailer() {
        let out = build_archive(&[]).unwrap();
        assert_eq!(out.len(), EndOfCentralDirectory::SIZE);
        let eocd = EndOfCentralDirectory::from_bytes(&out).unwrap();
        assert_eq!(eocd.total_entries, 0);
        assert_eq!(eocd.cd_size, 0);
        assert_eq!(eocd.cd_offset, 0);
    }

    #[test]
    fn test_two_entry_offsets() {
        let out = build_archive(&[
            ArchiveEntry::new("a.txt", "hi"),
            ArchiveEntry::new("b.txt", "bye"),
        ])
        .unwrap();

        let eocd =
            EndOfCentralDirectory::from_bytes(&out[out.len() - EndOfCentralDirectory::SIZE..])
                .unwrap();
        assert_eq!(eocd.disk_entries, 2);
        assert_eq!(eocd.total_entries, 2);
        // 30-byte fixed header + "a.txt" + "hi"
        assert_eq!(central_offsets(&out), vec![0, 37]);
        // second block: 30 + 5 + 3
        assert_eq!(eocd.cd_offset, 37 + 38);
        assert_eq!(eocd.cd_size as usize, 2 * (46 + 5));
        assert_eq!(&out[37..41], LFH_SIGNATURE);
        assert_eq!(&out[67..70], b"bye");
    }

    #[test]
    fn test_payload_written_verbatim() {
        let payload: Vec<u8> = (0..=255u8).collect();
        let out = build_archive(&[ArchiveEntry::new("bin", payload.clone())]).unwrap();
        assert_eq!(&out[33..33 + 256], payload.as_slice());
        assert_eq!(u32_at(&out, 14), crate::encoding::crc32(&payload));
    }

    #[test]
    fn test_duplicate_and_empty_names_pass_through() {
        let out = build_archive(&[
            ArchiveEntry::new("same", "1"),
            ArchiveEntry::new("same", "2"),
            ArchiveEntry::new("", "3"),
        ])
        .unwrap();
        assert_eq!(central_offsets(&out), vec![0, 35, 70]);
    }

    #[test]
    fn test_builder_is_reusable() {
        let builder = ArchiveBuilder::new();
        let entries = vec![ArchiveEntry::new("x", "y")];
        assert_eq!(builder.build(&entries).unwrap(), builder.build(&entries).unwrap());
    }

    proptest! {
        #[test]
        fn offsets_land_on_local_headers(
            entries in proptest::collection::vec(
                ("[a-z0-9_.]{0,12}", proptest::collection::vec(any::<u8>(), 0..64)),
                0..12,
            )
        ) {
            let entries: Vec<_> = entries
                .into_iter()
                .map(|(name, data)| ArchiveEntry::new(name, data))
                .collect();
            let out = build_archive(&entries).unwrap();
            let offsets = central_offsets(&out);

            prop_assert_eq!(offsets.len(), entries.len());
            for (offset, entry) in offsets.iter().zip(&entries) {
                let pos = *offset as usize;
                prop_assert_eq!(&out[pos..pos + 4], LFH_SIGNATURE);
                let name_len = u16_at(&out, pos + 26) as usize;
                prop_assert_eq!(&out[pos + 30..pos + 30 + name_len], entry.name.as_bytes());
            }
        }
    }
}
