//! Input sources for the command-line front end.
//!
//! The core encoders only ever see byte buffers. This module is how the CLI
//! fills them: from a local path or an HTTP(S) URL, read whole.

mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalSource;

use anyhow::Result;
use async_trait::async_trait;

/// A named input that can be read fully into memory.
#[async_trait]
pub trait Source: Send + Sync {
    /// Read the whole input.
    async fn read_all(&self) -> Result<Vec<u8>>;

    /// Base name of the input, used as the default archive entry name.
    fn file_name(&self) -> String;

    /// Path or URL, for messages.
    fn location(&self) -> &str;

    /// Bytes fetched over the network so far; zero for local inputs.
    fn transferred_bytes(&self) -> u64 {
        0
    }
}

pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick the source kind for `location`.
pub fn open(location: &str) -> Result<Box<dyn Source>> {
    if is_http_url(location) {
        Ok(Box::new(HttpSource::new(location.to_string())?))
    } else {
        Ok(Box::new(LocalSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://cdn.example.com/ep1.mp3"));
        assert!(is_http_url("http://localhost:8080/ep1.mp3"));
        assert!(!is_http_url("episodes/ep1.mp3"));
        assert!(!is_http_url("ftp://example.com/ep1.mp3"));
    }

    #[test]
    fn test_local_source_transfers_nothing() {
        let source = open("episodes/ep1.mp3").unwrap();
        assert_eq!(source.location(), "episodes/ep1.mp3");
        assert_eq!(source.transferred_bytes(), 0);
    }

    #[test]
    fn test_open_picks_source_kind() {
        assert_eq!(open("a/b/ep1.mp3").unwrap().file_name(), "ep1.mp3");
        assert_eq!(
            open("https://cdn.example.com/audio/ep2.mp3?sig=abc")
                .unwrap()
                .file_name(),
            "ep2.mp3"
        );
    }
}
