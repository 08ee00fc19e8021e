//! Chapter-style time codes from a bracket-annotated script.
//!
//! A script marks its sections with `[INTRO]`, `[HOOK]`, `[CONTENIDO]` and
//! so on. Narration speed is assumed constant, so a marker's position in the
//! text maps linearly onto the episode's duration.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Section labels recognized inside square brackets, Spanish and English.
pub const SECTION_LABELS: &[&str] = &[
    "INTRO",
    "HOOK",
    "CONTENIDO",
    "CONTENT",
    "VALOR",
    "VALUE",
    "CIERRE",
    "OUTRO",
];

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)\[({})\]", SECTION_LABELS.join("|"));
    Regex::new(&pattern).expect("section marker pattern is valid")
});

/// One section marker placed on the episode timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampMarker {
    /// Upper-cased label, e.g. `CONTENIDO`.
    pub label: String,
    /// Character offset of the marker divided by the script length.
    pub fractional_position: f64,
    pub time_ms: u64,
    /// `M:SS`, seconds zero-padded.
    pub time_formatted: String,
}

/// Locate section markers in `script` and map them onto a duration.
///
/// Positions are measured in characters, not bytes, so accented narration
/// does not skew the timeline. Unknown bracket labels are skipped; a script
/// without markers yields an empty list.
///
/// ```
/// let markers = podpack::extract("[INTRO] hola [outro] adios", 60.0);
/// assert_eq!(markers.len(), 2);
/// assert_eq!(markers[0].time_formatted, "0:00");
/// assert_eq!(markers[1].label, "OUTRO");
/// ```
pub fn extract(script: &str, total_duration_seconds: f64) -> Vec<TimestampMarker> {
    let total_chars = script.chars().count();
    if total_chars == 0 {
        return Vec::new();
    }

    let duration_ms = if total_duration_seconds.is_finite() && total_duration_seconds > 0.0 {
        total_duration_seconds * 1000.0
    } else {
        0.0
    };

    let mut markers = Vec::new();
    // Byte offsets from the regex are converted to character offsets by
    // counting forward from the previous match.
    let mut chars_before = 0;
    let mut last_byte = 0;

    for caps in MARKER_RE.captures_iter(script) {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        chars_before += script[last_byte..whole.start()].chars().count();
        last_byte = whole.start();

        let fractional_position = chars_before as f64 / total_chars as f64;
        // Rounding must not carry a late marker past the end of the episode.
        let time_ms = ((fractional_position * duration_ms).round() as u64)
            .min(duration_ms.floor() as u64);

        markers.push(TimestampMarker {
            label: label.as_str().to_uppercase(),
            fractional_position,
            time_ms,
            time_formatted: format_time(time_ms),
        });
    }

    tracing::trace!(count = markers.len(), total_chars, "extracted section markers");
    markers
}

/// Format milliseconds as `M:SS`, truncating to whole seconds.
pub fn format_time(time_ms: u64) -> String {
    let total_seconds = time_ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Human-readable chapter list, one `M:SS LABEL` line per marker.
pub fn chapter_list(markers: &[TimestampMarker]) -> String {
    markers
        .iter()
        .map(|m| format!("{} {}\n", m.time_formatted, m.label))
        .collect()
}

/// Single-line summary suitable for an ID3 comment frame.
pub fn comment_text(markers: &[TimestampMarker]) -> String {
    markers
        .iter()
        .map(|m| format!("{} {}", m.label, m.time_formatted))
        .collect::<Vec<_>>()
        .join(" | ")
}
