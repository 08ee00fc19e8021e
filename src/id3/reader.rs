//! Reading a leading ID3v2 tag back into frames.
//!
//! Supports the v2.3 layout this crate writes and v2.4 (syncsafe frame
//! sizes). Unsynchronised tags and v2.2 are rejected.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;

use crate::encoding::decode_syncsafe;
use crate::error::{Error, Result};

use super::frame::{self, FRAME_HEADER_SIZE, Frame};
use super::header::{FLAG_EXTENDED_HEADER, FLAG_UNSYNCHRONISATION, HEADER_SIZE, TagHeader};
use super::metadata::Id3Metadata;

/// A parsed tag: its header and the frames in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Tag {
    pub header: TagHeader,
    pub frames: Vec<Frame>,
}

impl Id3Tag {
    /// Map the frames this crate writes back into metadata.
    ///
    /// When a frame ID repeats, the first occurrence wins.
    pub fn metadata(&self) -> Id3Metadata {
        let mut meta = Id3Metadata::default();
        for f in &self.frames {
            match f {
                Frame::Text { id, text } => {
                    let slot = match *id {
                        frame::TITLE => &mut meta.title,
                        frame::ARTIST => &mut meta.artist,
                        frame::ALBUM => &mut meta.album,
                        frame::YEAR => &mut meta.year,
                        frame::TRACK => &mut meta.track_number,
                        frame::GENRE => &mut meta.genre,
                        frame::LENGTH => {
                            if meta.duration_ms.is_none() {
                                meta.duration_ms = text.trim().parse().ok();
                            }
                            continue;
                        }
                        _ => continue,
                    };
                    if slot.is_none() {
                        *slot = Some(text.clone());
                    }
                }
                Frame::Comment { language, text, .. } => {
                    if meta.comment.is_none() {
                        meta.comment = Some(text.clone());
                        meta.comment_language =
                            Some(String::from_utf8_lossy(language).into_owned());
                    }
                }
                Frame::Other { .. } => {}
            }
        }
        meta
    }
}

/// Parse the ID3v2 tag at the start of `audio`, if there is one.
pub fn read_tag(audio: &[u8]) -> Result<Option<Id3Tag>> {
    let Some(header) = TagHeader::parse(audio)? else {
        return Ok(None);
    };

    if !matches!(header.major_version, 3 | 4) {
        return Err(Error::invalid_tag(format!(
            "ID3v2.{} is not supported",
            header.major_version
        )));
    }
    if header.flags & FLAG_UNSYNCHRONISATION != 0 {
        return Err(Error::invalid_tag("unsynchronised tags are not supported"));
    }

    let body = &audio[HEADER_SIZE..header.tag_len()];
    let mut pos = 0;

    if header.flags & FLAG_EXTENDED_HEADER != 0 {
        pos = extended_header_len(&header, body)?;
    }

    let mut frames = Vec::new();
    while pos + FRAME_HEADER_SIZE <= body.len() {
        let id = [body[pos], body[pos + 1], body[pos + 2], body[pos + 3]];
        // Padding starts where a frame ID would have a zero byte.
        if id[0] == 0 {
            break;
        }

        let raw_size = [body[pos + 4], body[pos + 5], body[pos + 6], body[pos + 7]];
        let size = match header.major_version {
            4 => decode_syncsafe(raw_size),
            _ => u32::from_be_bytes(raw_size),
        };

        let start = pos + FRAME_HEADER_SIZE;
        let end = start + size as usize;
        if end > body.len() {
            return Err(Error::invalid_tag(format!(
                "frame {} at {} runs past the end of the tag",
                String::from_utf8_lossy(&id),
                pos
            )));
        }

        frames.push(Frame::decode(id, &body[start..end])?);
        pos = end;
    }

    Ok(Some(Id3Tag { header, frames }))
}

/// Bytes taken by the extended header, size field included.
fn extended_header_len(header: &TagHeader, body: &[u8]) -> Result<usize> {
    let mut cursor = Cursor::new(body);
    let size = cursor
        .read_u32::<BigEndian>()
        .map_err(|_| Error::invalid_tag("truncated extended header"))?;

    // v2.3 excludes the size field from the size; v2.4 includes it and
    // stores it syncsafe.
    let len = match header.major_version {
        4 => decode_syncsafe(size.to_be_bytes()) as usize,
        _ => size as usize + 4,
    };

    if len > body.len() {
        return Err(Error::invalid_tag("extended header runs past the end of the tag"));
    }
    Ok(len)
}
