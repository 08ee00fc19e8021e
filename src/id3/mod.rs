//! ID3v2.3 tag encoding, embedding and reading.
//!
//! ## Tag Layout
//!
//! ```text
//! "ID3" | major 3 | revision 0 | flags 0 | syncsafe size (4) | frames...
//! ```
//!
//! The syncsafe size counts frame bytes only, not the 10-byte header. Each
//! frame is written with encoding marker 3 (UTF-8).
//!
//! - [`header`]: the 10-byte tag header
//! - [`frame`]: text and comment frames
//! - [`metadata`]: the caller-facing field record
//! - [`embedder`]: strip an existing tag and prefix a new one
//! - [`reader`]: parse a leading tag back into frames

pub mod embedder;
pub mod frame;
pub mod header;
pub mod metadata;
pub mod reader;

pub use embedder::{embed, encode_tag, strip_existing_tag};
pub use frame::Frame;
pub use header::TagHeader;
pub use metadata::Id3Metadata;
pub use reader::{Id3Tag, read_tag};
