//! Stored ZIP archive encoding and reading.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`builder`]: Encodes named in-memory payloads into one archive buffer
//! - [`reader`]: Parses an archive buffer back into entries, for listing and verification
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and file data for each file
//! 2. Central Directory with metadata and the header offset of every file
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - STORED (no compression) method, with real CRC-32 values
//! - UTF-8 file names (general purpose flag bit 11)
//!
//! ## Limitations
//!
//! - No compression when writing, no decompression when reading
//! - No ZIP64: at most 65535 entries and 4 GiB per size or offset field
//! - No encryption or multi-disk archives

mod builder;
mod reader;
mod structures;

pub use builder::{ArchiveBuilder, ArchiveEntry, build_archive};
pub use reader::ArchiveReader;
pub use structures::*;
