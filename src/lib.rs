//! # podpack
//!
//! Binary packaging and metadata embedding for podcast episode delivery.
//!
//! This library turns fully materialized byte buffers into delivery formats
//! without any compression or tagging library underneath: every header field
//! is written by hand, in the byte order its format demands.
//!
//! ## Features
//!
//! - Build stored (uncompressed) ZIP archives from named payloads, with
//!   real CRC-32 values and exact central-directory offsets
//! - Read those archives back for listing and CRC verification
//! - Embed ID3v2.3 tags into MP3 streams, replacing any existing leading tag
//! - Read a leading ID3 tag back into frames and metadata
//! - Map `[INTRO]`/`[HOOK]`/... section markers in a script onto an episode's
//!   duration for chapter lists
//!
//! Each operation is a pure function of its inputs: no I/O, no shared state,
//! safe to call from any number of threads at once.
//!
//! ## Example
//!
//! ```
//! use podpack::{build_archive, embed, ArchiveEntry, Id3Metadata};
//!
//! let meta = Id3Metadata {
//!     title: Some("EP1".into()),
//!     artist: Some("Show".into()),
//!     ..Default::default()
//! };
//! let mp3 = embed(b"\xFF\xFB\x90\x00", &meta).unwrap();
//!
//! let zip = build_archive(&[
//!     ArchiveEntry::new("ep1.mp3", mp3),
//!     ArchiveEntry::new("episodes.csv", "title\nEP1\n"),
//! ])
//! .unwrap();
//! assert_eq!(&zip[..4], b"PK\x03\x04");
//! ```

pub mod cli;
pub mod encoding;
pub mod error;
pub mod id3;
pub mod io;
pub mod timestamps;
pub mod zip;

pub use cli::Cli;
pub use error::{Error, Result};
pub use id3::{Id3Metadata, Id3Tag, embed, encode_tag, read_tag, strip_existing_tag};
pub use io::{HttpSource, LocalSource, Source};
pub use timestamps::{TimestampMarker, chapter_list, comment_text, extract};
pub use zip::{ArchiveBuilder, ArchiveEntry, ArchiveReader, ZipFileEntry, build_archive};
