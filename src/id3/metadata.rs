use serde::{Deserialize, Serialize};

use super::frame::{self, Frame};

/// Episode metadata to embed as ID3 frames.
///
/// Every field is optional; an absent field simply has no frame. Text fields
/// are written as given, so `year` and `track_number` are not checked for
/// being numeric.
///
/// Deserializes from the camelCase JSON the dashboard stores:
///
/// ```
/// let meta: podpack::Id3Metadata =
///     serde_json::from_str(r#"{"title": "EP1", "trackNumber": "1", "durationMs": 61000}"#)
///         .unwrap();
/// assert_eq!(meta.track_number.as_deref(), Some("1"));
/// assert_eq!(meta.duration_ms, Some(61000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Id3Metadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub track_number: Option<String>,
    pub genre: Option<String>,
    pub comment: Option<String>,
    /// ISO-639-2 code for the comment frame; `spa` when unset.
    pub comment_language: Option<String>,
    pub duration_ms: Option<u64>,
}

impl Id3Metadata {
    /// Frames for every present field, in tag order.
    pub fn frames(&self) -> Vec<Frame> {
        let text_fields = [
            (frame::TITLE, &self.title),
            (frame::ARTIST, &self.artist),
            (frame::ALBUM, &self.album),
            (frame::YEAR, &self.year),
            (frame::TRACK, &self.track_number),
            (frame::GENRE, &self.genre),
        ];

        let mut frames: Vec<Frame> = text_fields
            .into_iter()
            .filter_map(|(id, value)| value.as_ref().map(|v| Frame::text(id, v.as_str())))
            .collect();

        if let Some(comment) = &self.comment {
            let language = self
                .comment_language
                .as_deref()
                .map(frame::language_code)
                .unwrap_or(frame::DEFAULT_LANGUAGE);
            frames.push(Frame::comment(language, comment.as_str()));
        }

        if let Some(ms) = self.duration_ms {
            frames.push(Frame::text(frame::LENGTH, ms.to_string()));
        }

        frames
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    /// Fill every unset field of `self` from `fallback`.
    pub fn or(self, fallback: Id3Metadata) -> Id3Metadata {
        Id3Metadata {
            title: self.title.or(fallback.title),
            artist: self.artist.or(fallback.artist),
            album: self.album.or(fallback.album),
            year: self.year.or(fallback.year),
            track_number: self.track_number.or(fallback.track_number),
            genre: self.genre.or(fallback.genre),
            comment: self.comment.or(fallback.comment),
            comment_language: self.comment_language.or(fallback.comment_language),
            duration_ms: self.duration_ms.or(fallback.duration_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_follow_field_order() {
        let meta = Id3Metadata {
            title: Some("EP1".into()),
            genre: Some("Podcast".into()),
            comment: Some("notes".into()),
            duration_ms: Some(1500),
            ..Default::default()
        };
        let ids: Vec<_> = meta.frames().iter().map(Frame::id_str).collect();
        assert_eq!(ids, vec!["TIT2", "TCON", "COMM", "TLEN"]);
        assert_eq!(meta.frames()[3], Frame::text(frame::LENGTH, "1500"));
    }

    #[test]
    fn test_empty_metadata_has_no_frames() {
        assert!(Id3Metadata::default().is_empty());
    }

    #[test]
    fn test_comment_language() {
        let meta = Id3Metadata {
            comment: Some("hi".into()),
            comment_language: Some("ENG".into()),
            ..Default::default()
        };
        assert_eq!(meta.frames()[0], Frame::comment(*b"eng", "hi"));

        let meta = Id3Metadata {
            comment: Some("hola".into()),
            ..Default::default()
        };
        assert_eq!(meta.frames()[0], Frame::comment(*b"spa", "hola"));
    }

    #[test]
    fn test_or_prefers_self() {
        let flags = Id3Metadata {
            title: Some("Override".into()),
            ..Default::default()
        };
        let file = Id3Metadata {
            title: Some("From file".into()),
            artist: Some("Show".into()),
            ..Default::default()
        };
        let merged = flags.or(file);
        assert_eq!(merged.title.as_deref(), Some("Override"));
        assert_eq!(merged.artist.as_deref(), Some("Show"));
    }

    #[test]
    fn test_deserialize_ignores_missing_fields() {
        let meta: Id3Metadata = serde_json::from_str(r#"{"artist": "Show"}"#).unwrap();
        assert_eq!(meta.artist.as_deref(), Some("Show"));
        assert_eq!(meta.title, None);
    }
}
