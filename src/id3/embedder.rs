//! Prefixing MP3 streams with an ID3v2.3 tag.

use crate::error::Result;

use super::header::TagHeader;
use super::metadata::Id3Metadata;

/// Return the audio that follows a leading ID3v2 tag, or all of `audio`
/// when there is no tag.
///
/// # Errors
///
/// [`Error::MalformedInputTag`](crate::Error::MalformedInputTag) when the tag
/// header is cut short or declares more bytes than `audio` holds.
pub fn strip_existing_tag(audio: &[u8]) -> Result<&[u8]> {
    match TagHeader::parse(audio)? {
        Some(header) => {
            tracing::debug!(
                version = header.major_version,
                tag_len = header.tag_len(),
                "stripping existing ID3 tag"
            );
            Ok(&audio[header.tag_len()..])
        }
        None => Ok(audio),
    }
}

/// Encode `metadata` as a complete ID3v2.3 tag, header included.
///
/// Metadata with no fields set still yields a valid 10-byte tag.
pub fn encode_tag(metadata: &Id3Metadata) -> Result<Vec<u8>> {
    let mut frames = Vec::new();
    for frame in metadata.frames() {
        frame.write_to(&mut frames)?;
    }

    let header = TagHeader::v2_3(frames.len())?;

    let mut tag = Vec::with_capacity(header.tag_len());
    tag.extend_from_slice(&header.encode());
    tag.extend_from_slice(&frames);
    Ok(tag)
}

/// Replace any leading tag on `audio` with one built from `metadata`.
///
/// ```
/// use podpack::{embed, Id3Metadata};
///
/// let meta = Id3Metadata { title: Some("EP1".into()), ..Default::default() };
/// let tagged = embed(b"\xFF\xFB\x90\x00", &meta).unwrap();
/// assert_eq!(&tagged[..6], b"ID3\x03\x00\x00");
/// assert_eq!(&tagged[10..14], b"TIT2");
/// ```
pub fn embed(audio: &[u8], metadata: &Id3Metadata) -> Result<Vec<u8>> {
    let stream = strip_existing_tag(audio)?;
    let tag = encode_tag(metadata)?;

    tracing::debug!(
        tag_len = tag.len(),
        audio_len = stream.len(),
        "embedding ID3v2.3 tag"
    );

    let mut out = Vec::with_capacity(tag.len() + stream.len());
    out.extend_from_slice(&tag);
    out.extend_from_slice(stream);
    Ok(out)
}
