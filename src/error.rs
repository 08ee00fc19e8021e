//! Error types for the packaging and tagging engine.
//!
//! The encoders are built to accept anything structurally processable, so
//! most variants here belong to the readers. The one hard failure on the
//! write path is a pre-existing tag whose declared size runs past the end of
//! the audio buffer.

/// Error type for podpack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A leading ID3 tag declares more bytes than the buffer holds.
    #[error("Malformed input tag: declares {declared} bytes but only {available} are available")]
    MalformedInputTag { declared: usize, available: usize },

    /// The frame region does not fit a 28-bit syncsafe size.
    #[error("ID3 tag too large: {0} bytes of frames")]
    TagTooLarge(usize),

    /// A field of the classic ZIP format would overflow.
    #[error("Archive too large: {0}")]
    ArchiveTooLarge(String),

    /// The bytes are not a readable ZIP archive.
    #[error("Invalid ZIP archive: {0}")]
    InvalidArchive(String),

    /// An entry uses a compression method other than STORED.
    #[error("Unsupported compression method: {0} (only STORED/uncompressed is supported)")]
    UnsupportedCompression(u16),

    /// An entry's payload does not match its recorded CRC-32.
    #[error("CRC-32 mismatch for {name}: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    /// A leading ID3 tag could not be parsed.
    #[error("Invalid ID3 tag: {0}")]
    InvalidTag(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new InvalidArchive error.
    pub fn invalid_archive<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArchive(msg.into())
    }

    /// Create a new InvalidTag error.
    pub fn invalid_tag<S: Into<String>>(msg: S) -> Self {
        Self::InvalidTag(msg.into())
    }
}

/// Result type alias using the crate Error type.
pub type Result<T> = std::result::Result<T, Error>;
