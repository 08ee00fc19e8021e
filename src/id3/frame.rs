//! ID3v2.3 frame encoding and decoding.
//!
//! Every frame is a 10-byte header followed by its body:
//!
//! ```text
//! +---------+-----------------+---------+------------------+
//! | ID (4)  | body size (4)   | flags 2 | body (size)      |
//! +---------+-----------------+---------+------------------+
//! ```
//!
//! The frame size is a plain big-endian integer, unlike the syncsafe size in
//! the tag header.

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};

/// Frame header length.
pub const FRAME_HEADER_SIZE: usize = 10;

/// Text encoding marker for UTF-8 bodies.
///
/// Formally an ID3v2.4 addition; written into v2.3 tags because the players
/// these files are delivered to accept it.
pub const TEXT_ENCODING_UTF8: u8 = 3;

/// COMM language used when none is configured.
pub const DEFAULT_LANGUAGE: [u8; 3] = *b"spa";

pub const TITLE: [u8; 4] = *b"TIT2";
pub const ARTIST: [u8; 4] = *b"TPE1";
pub const ALBUM: [u8; 4] = *b"TALB";
pub const YEAR: [u8; 4] = *b"TYER";
pub const TRACK: [u8; 4] = *b"TRCK";
pub const GENRE: [u8; 4] = *b"TCON";
pub const LENGTH: [u8; 4] = *b"TLEN";
pub const COMMENT: [u8; 4] = *b"COMM";

/// One frame of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A `T***` text information frame.
    Text { id: [u8; 4], text: String },
    /// A `COMM` frame.
    Comment {
        language: [u8; 3],
        description: String,
        text: String,
    },
    /// Any frame this crate does not interpret; body kept verbatim.
    Other { id: [u8; 4], body: Vec<u8> },
}

impl Frame {
    pub fn text(id: [u8; 4], text: impl Into<String>) -> Self {
        Frame::Text {
            id,
            text: text.into(),
        }
    }

    /// Comment frame with an empty short description.
    pub fn comment(language: [u8; 3], text: impl Into<String>) -> Self {
        Frame::Comment {
            language,
            description: String::new(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> [u8; 4] {
        match self {
            Frame::Text { id, .. } | Frame::Other { id, .. } => *id,
            Frame::Comment { .. } => COMMENT,
        }
    }

    /// Frame ID as text, for display.
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id()).into_owned()
    }

    fn body(&self) -> Vec<u8> {
        match self {
            Frame::Text { text, .. } => {
                let mut body = Vec::with_capacity(1 + text.len());
                body.push(TEXT_ENCODING_UTF8);
                body.extend_from_slice(text.as_bytes());
                body
            }
            Frame::Comment {
                language,
                description,
                text,
            } => {
                let mut body = Vec::with_capacity(5 + description.len() + text.len());
                body.push(TEXT_ENCODING_UTF8);
                body.extend_from_slice(language);
                body.extend_from_slice(description.as_bytes());
                body.push(0);
                body.extend_from_slice(text.as_bytes());
                body
            }
            Frame::Other { body, .. } => body.clone(),
        }
    }

    /// Append the encoded frame, header included, to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let body = self.body();
        let size = u32::try_from(body.len()).map_err(|_| Error::TagTooLarge(body.len()))?;

        out.extend_from_slice(&self.id());
        out.write_u32::<BigEndian>(size)?;
        out.write_u16::<BigEndian>(0)?; // flags
        out.extend_from_slice(&body);
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Interpret a frame body read from a tag.
    pub fn decode(id: [u8; 4], body: &[u8]) -> Result<Self> {
        if id == COMMENT {
            return decode_comment(body);
        }
        if id[0] == b'T' && &id != b"TXXX" {
            let (&encoding, text) = body
                .split_first()
                .ok_or_else(|| Error::invalid_tag(format!("empty {} frame", id_label(id))))?;
            return Ok(Frame::Text {
                id,
                text: decode_text(encoding, text)?,
            });
        }
        Ok(Frame::Other {
            id,
            body: body.to_vec(),
        })
    }
}

/// Normalize a caller-supplied language to a 3-byte ISO-639-2 code.
///
/// Anything that is not exactly three ASCII letters falls back to
/// [`DEFAULT_LANGUAGE`].
pub fn language_code(language: &str) -> [u8; 3] {
    match language.as_bytes() {
        [a, b, c] if language.chars().all(|ch| ch.is_ascii_alphabetic()) => [
            a.to_ascii_lowercase(),
            b.to_ascii_lowercase(),
            c.to_ascii_lowercase(),
        ],
        _ => {
            tracing::warn!(language, "invalid comment language, using default");
            DEFAULT_LANGUAGE
        }
    }
}

fn id_label(id: [u8; 4]) -> String {
    String::from_utf8_lossy(&id).into_owned()
}

fn decode_comment(body: &[u8]) -> Result<Frame> {
    if body.len() < 4 {
        return Err(Error::invalid_tag("COMM frame shorter than its fixed fields"));
    }
    let encoding = body[0];
    let language = [body[1], body[2], body[3]];
    let rest = &body[4..];

    let (description, text) = split_terminated(encoding, rest);
    Ok(Frame::Comment {
        language,
        description: decode_text(encoding, description)?,
        text: decode_text(encoding, text)?,
    })
}

/// Split at the first string terminator: one NUL byte, or an aligned NUL
/// pair for the UTF-16 encodings.
fn split_terminated(encoding: u8, data: &[u8]) -> (&[u8], &[u8]) {
    match encoding {
        1 | 2 => {
            let pos = data
                .chunks_exact(2)
                .position(|pair| pair == [0, 0])
                .map(|i| i * 2);
            match pos {
                Some(p) => (&data[..p], &data[p + 2..]),
                None => (data, &data[data.len()..]),
            }
        }
        _ => match data.iter().position(|&b| b == 0) {
            Some(p) => (&data[..p], &data[p + 1..]),
            None => (data, &data[data.len()..]),
        },
    }
}

/// Decode text in one of the four ID3 encodings, dropping trailing NULs.
fn decode_text(encoding: u8, data: &[u8]) -> Result<String> {
    let text: String = match encoding {
        // ISO-8859-1 maps byte-for-byte onto the first 256 code points.
        0 => data.iter().map(|&b| b as char).collect(),
        1 | 2 => {
            let (big_endian, data) = match data {
                [0xFE, 0xFF, rest @ ..] => (true, rest),
                [0xFF, 0xFE, rest @ ..] => (false, rest),
                // v2.4 UTF-16BE has no BOM.
                _ => (encoding == 2, data),
            };
            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|p| {
                    if big_endian {
                        u16::from_be_bytes([p[0], p[1]])
                    } else {
                        u16::from_le_bytes([p[0], p[1]])
                    }
                })
                .collect();
            String::from_utf16_lossy(&units)
        }
        3 => String::from_utf8_lossy(data).into_owned(),
        other => {
            return Err(Error::invalid_tag(format!(
                "unknown text encoding {}",
                other
            )));
        }
    };
    Ok(text.trim_end_matches('\0').to_string())
}
