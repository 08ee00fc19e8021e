use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::id3::Id3Metadata;

#[derive(Parser, Debug)]
#[command(name = "podpack")]
#[command(version)]
#[command(about = "Package podcast episodes into ZIP archives and tag MP3s with ID3v2.3", long_about = None)]
#[command(after_help = "Examples:\n  \
  podpack pack -o batch.zip ep1.mp3 ep2.mp3 notes.csv   bundle files, stored\n  \
  podpack tag ep1.mp3 -o out.mp3 --title \"EP1\" --artist Show\n  \
  podpack chapters script.txt --duration-secs 312      print time codes")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bundle files or URLs into a stored ZIP archive
    Pack {
        /// Output archive, or - for stdout
        #[arg(short, long, value_name = "FILE")]
        output: String,

        /// Entry names, in input order (default: input base names)
        #[arg(short, long = "name", value_name = "NAME")]
        names: Vec<String>,

        /// Refuse batches larger than this
        #[arg(long, default_value_t = 20)]
        max_entries: usize,

        /// Files or http(s) URLs to include
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<String>,
    },

    /// List the entries of a ZIP archive
    List {
        /// Archive path or http(s) URL
        #[arg(value_name = "ARCHIVE")]
        archive: String,

        /// Check every entry's CRC-32
        #[arg(long)]
        verify: bool,
    },

    /// Replace an MP3's ID3 tag with new metadata
    Tag {
        /// MP3 path or http(s) URL
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output MP3, or - for stdout
        #[arg(short, long, value_name = "FILE")]
        output: String,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Remove a leading ID3v2 tag
    Strip {
        /// MP3 path or http(s) URL
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output MP3, or - for stdout
        #[arg(short, long, value_name = "FILE")]
        output: String,
    },

    /// Show the frames of an MP3's leading ID3 tag
    Inspect {
        /// MP3 path or http(s) URL
        #[arg(value_name = "INPUT")]
        input: String,

        /// Print the decoded metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print chapter time codes for a bracket-annotated script
    Chapters {
        /// Script text file
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Episode length in seconds
        #[arg(long, value_name = "SECONDS")]
        duration_secs: f64,

        /// Print markers as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct MetadataArgs {
    /// JSON metadata record; flags below override its fields
    #[arg(long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    #[arg(long)]
    pub album: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long = "track", value_name = "TRACK")]
    pub track_number: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,

    /// ISO-639-2 code for the comment (default: spa)
    #[arg(long, value_name = "CODE")]
    pub comment_language: Option<String>,

    #[arg(long, value_name = "MS")]
    pub duration_ms: Option<u64>,

    /// Script whose section markers become the comment
    #[arg(long, value_name = "FILE", requires = "duration_secs")]
    pub script: Option<PathBuf>,

    /// Episode length in seconds, for --script
    #[arg(long, value_name = "SECONDS")]
    pub duration_secs: Option<f64>,
}

impl MetadataArgs {
    /// Metadata given directly as flags.
    pub fn to_metadata(&self) -> Id3Metadata {
        Id3Metadata {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            year: self.year.clone(),
            track_number: self.track_number.clone(),
            genre: self.genre.clone(),
            comment: self.comment.clone(),
            comment_language: self.comment_language.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

pub fn is_stdout(output: &str) -> bool {
    output == "-"
}
