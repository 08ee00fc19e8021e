//! In-memory ZIP archive reader.
//!
//! Used to list and verify archives, including the ones this crate writes.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. Read the Central Directory to get metadata for all files
//! 3. For extraction, follow each entry's offset to its Local File Header
//!
//! Only STORED entries can be read back; ZIP64 archives are rejected.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::encoding::crc32;
use crate::error::{Error, Result};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// Reader over a fully materialized ZIP archive.
///
/// ## Example
///
/// ```
/// use podpack::{build_archive, ArchiveEntry, ArchiveReader};
///
/// let zip = build_archive(&[ArchiveEntry::new("notes.txt", "hello")]).unwrap();
/// let reader = ArchiveReader::new(&zip).unwrap();
/// let entry = &reader.entries()[0];
/// assert_eq!(entry.file_name, "notes.txt");
/// assert_eq!(reader.read(entry).unwrap(), b"hello");
/// ```
pub struct ArchiveReader<'a> {
    data: &'a [u8],
    entries: Vec<ZipFileEntry>,
}

impl<'a> ArchiveReader<'a> {
    /// Parse the trailer and the Central Directory of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if no valid EOCD can be found or a
    /// directory record is truncated or points past the end of the buffer.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let (eocd, eocd_offset) = find_eocd(data)?;

        if eocd.is_zip64() {
            return Err(Error::invalid_archive("ZIP64 archives are not supported"));
        }

        let cd_offset = eocd.cd_offset as usize;
        let cd_end = cd_offset + eocd.cd_size as usize;
        if cd_end > eocd_offset {
            return Err(Error::invalid_archive(format!(
                "central directory {}..{} overlaps the trailer at {}",
                cd_offset, cd_end, eocd_offset
            )));
        }

        let mut cursor = Cursor::new(&data[cd_offset..cd_end]);
        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        for _ in 0..eocd.total_entries {
            entries.push(parse_cdfh(&mut cursor)?);
        }

        Ok(Self { data, entries })
    }

    /// Entries in Central Directory order.
    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    /// Offset of the first payload byte for `entry`.
    ///
    /// The Local File Header has variable-length fields (filename,
    /// extra field) that may differ from the Central Directory entry, so the
    /// header itself is read to find where the data begins.
    pub fn data_offset(&self, entry: &ZipFileEntry) -> Result<usize> {
        let lfh_offset = entry.lfh_offset as usize;
        let lfh = self
            .data
            .get(lfh_offset..lfh_offset + LFH_SIZE)
            .ok_or_else(|| {
                Error::invalid_archive(format!(
                    "local header for {} at {} is past the end",
                    entry.file_name, lfh_offset
                ))
            })?;

        if &lfh[0..4] != LFH_SIGNATURE {
            return Err(Error::invalid_archive(format!(
                "no local header signature at {} for {}",
                lfh_offset, entry.file_name
            )));
        }

        let mut cursor = Cursor::new(&lfh[26..]);
        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        Ok(lfh_offset + LFH_SIZE + file_name_length + extra_field_length)
    }

    /// Borrow the stored payload of `entry`.
    pub fn read(&self, entry: &ZipFileEntry) -> Result<&'a [u8]> {
        if entry.compression_method != CompressionMethod::Stored {
            return Err(Error::UnsupportedCompression(
                entry.compression_method.as_u16(),
            ));
        }

        let start = self.data_offset(entry)?;
        let end = start + entry.uncompressed_size as usize;
        self.data.get(start..end).ok_or_else(|| {
            Error::invalid_archive(format!("payload of {} runs past the end", entry.file_name))
        })
    }

    /// Read every entry and check its CRC-32.
    ///
    /// A recorded CRC of zero on a non-empty payload is treated as "not
    /// recorded"; some writers leave the field blank for stored entries.
    pub fn verify(&self) -> Result<()> {
        for entry in &self.entries {
            let payload = self.read(entry)?;
            let actual = crc32(payload);
            if entry.crc32 != 0 && entry.crc32 != actual {
                return Err(Error::ChecksumMismatch {
                    name: entry.file_name.clone(),
                    expected: entry.crc32,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Locate the End of Central Directory record.
///
/// Returns the parsed record and its offset in `data`.
fn find_eocd(data: &[u8]) -> Result<(EndOfCentralDirectory, usize)> {
    if data.len() < EndOfCentralDirectory::SIZE {
        return Err(Error::invalid_archive("too short for a ZIP trailer"));
    }

    // Common case: no archive comment, trailer is the last 22 bytes.
    let offset = data.len() - EndOfCentralDirectory::SIZE;
    let tail = &data[offset..];
    if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && tail[20..22] == [0, 0] {
        return Ok((EndOfCentralDirectory::from_bytes(tail)?, offset));
    }

    // Search backwards for a record whose comment length matches the
    // bytes remaining after it.
    let search_start = data
        .len()
        .saturating_sub(MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE);
    for i in (search_start..=offset).rev() {
        if &data[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
            let comment_len = u16::from_le_bytes([data[i + 20], data[i + 21]]) as usize;
            if comment_len == data.len() - i - EndOfCentralDirectory::SIZE {
                let eocd =
                    EndOfCentralDirectory::from_bytes(&data[i..i + EndOfCentralDirectory::SIZE])?;
                return Ok((eocd, i));
            }
        }
    }

    Err(Error::invalid_archive("no End of Central Directory record"))
}

/// Parse one Central Directory File Header.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
    let truncated = |_: std::io::Error| Error::invalid_archive("truncated Central Directory");

    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig).map_err(truncated)?;
    if sig != CDFH_SIGNATURE {
        return Err(Error::invalid_archive(
            "bad Central Directory File Header signature",
        ));
    }

    let mut fixed = [0u8; CDFH_MIN_SIZE - 4];
    cursor.read_exact(&mut fixed).map_err(truncated)?;
    let mut fields = Cursor::new(&fixed[..]);

    let _version_made_by = fields.read_u16::<LittleEndian>()?;
    let _version_needed = fields.read_u16::<LittleEndian>()?;
    let flags = fields.read_u16::<LittleEndian>()?;
    let compression_method = fields.read_u16::<LittleEndian>()?;
    let _last_mod_time = fields.read_u16::<LittleEndian>()?;
    let _last_mod_date = fields.read_u16::<LittleEndian>()?;
    let crc32 = fields.read_u32::<LittleEndian>()?;
    let compressed_size = fields.read_u32::<LittleEndian>()? as u64;
    let uncompressed_size = fields.read_u32::<LittleEndian>()? as u64;
    let file_name_length = fields.read_u16::<LittleEndian>()?;
    let extra_field_length = fields.read_u16::<LittleEndian>()?;
    let file_comment_length = fields.read_u16::<LittleEndian>()?;
    let _disk_number_start = fields.read_u16::<LittleEndian>()?;
    let _internal_attrs = fields.read_u16::<LittleEndian>()?;
    let _external_attrs = fields.read_u32::<LittleEndian>()?;
    let lfh_offset = fields.read_u32::<LittleEndian>()? as u64;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes).map_err(truncated)?;
    // Lossy: non-UTF-8 names from foreign archives still list.
    let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

    // Extra field and comment are not used.
    let skip = extra_field_length as u64 + file_comment_length as u64;
    let end = cursor.position() + skip;
    if end > cursor.get_ref().len() as u64 {
        return Err(Error::invalid_archive("truncated Central Directory"));
    }
    cursor.set_position(end);

    Ok(ZipFileEntry {
        file_name,
        flags,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size,
        uncompressed_size,
        crc32,
        lfh_offset,
    })
}
