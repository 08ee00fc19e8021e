//! Main entry point for the podpack CLI application.
//!
//! The binary is the caller of the library's pure encoders: it reads inputs
//! from disk or HTTP, hands the bytes to the core and writes the resulting
//! buffers out.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use podpack::cli::{Commands, MetadataArgs, is_stdout};
use podpack::id3::Frame;
use podpack::{
    ArchiveEntry, ArchiveReader, Cli, Id3Metadata, build_archive, chapter_list, comment_text,
    embed, extract, io, read_tag, strip_existing_tag,
};

/// Application entry point.
///
/// Initializes logging on stderr, so archive or audio bytes written to
/// stdout stay clean, then dispatches to the subcommand handler.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "podpack=debug" } else { "podpack=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Pack {
            output,
            names,
            max_entries,
            inputs,
        } => pack(&output, &names, max_entries, &inputs).await,
        Commands::List { archive, verify } => list(&archive, verify).await,
        Commands::Tag {
            input,
            output,
            metadata,
        } => tag(&input, &output, &metadata).await,
        Commands::Strip { input, output } => strip(&input, &output).await,
        Commands::Inspect { input, json } => inspect(&input, json).await,
        Commands::Chapters {
            script,
            duration_secs,
            json,
        } => chapters(&script, duration_secs, json).await,
    }
}

/// Bundle inputs into one stored ZIP archive.
///
/// The batch size is checked before anything is read, so an oversized
/// request fails without fetching a single input.
///
/// # Arguments
///
/// * `output` - Destination path, or `-` for stdout
/// * `names` - Entry names overriding the inputs' base names, in order
/// * `max_entries` - Largest batch accepted
/// * `inputs` - Local paths or http(s) URLs
async fn pack(output: &str, names: &[String], max_entries: usize, inputs: &[String]) -> Result<()> {
    if inputs.len() > max_entries {
        bail!(
            "{} inputs exceed the batch limit of {} (use --max-entries to raise it)",
            inputs.len(),
            max_entries
        );
    }
    if names.len() > inputs.len() {
        bail!("{} names given for {} inputs", names.len(), inputs.len());
    }

    let mut entries = Vec::with_capacity(inputs.len());
    let mut downloaded = 0u64;
    for (i, location) in inputs.iter().enumerate() {
        let source = io::open(location)?;
        let data = source.read_all().await?;
        downloaded += source.transferred_bytes();
        let name = names
            .get(i)
            .cloned()
            .unwrap_or_else(|| source.file_name());
        entries.push(ArchiveEntry::new(name, data));
    }
    log_downloaded(downloaded);

    let archive = build_archive(&entries)?;
    tracing::info!(
        "Packed {} entries into {} ({})",
        entries.len(),
        output,
        format_size(archive.len() as u64)
    );

    write_output(output, &archive).await
}

/// List archive entries in a table, optionally checking CRCs.
async fn list(location: &str, verify: bool) -> Result<()> {
    let source = io::open(location)?;
    let data = source.read_all().await?;
    let reader = ArchiveReader::new(&data)
        .with_context(|| format!("Cannot read {}", source.location()))?;

    println!("{:>10}  {:>10}  {:>8}  Name", "Length", "Offset", "CRC-32");
    println!("{}", "-".repeat(50));

    let mut total = 0u64;
    for entry in reader.entries() {
        println!(
            "{:>10}  {:>10}  {:08x}  {}",
            entry.uncompressed_size, entry.lfh_offset, entry.crc32, entry.file_name
        );
        total += entry.uncompressed_size;
    }

    println!("{}", "-".repeat(50));
    println!("{:>10}  {:>10}  {:>8}  {} files", total, "", "", reader.entries().len());

    if verify {
        reader.verify()?;
        println!("All entries OK");
    }

    Ok(())
}

/// Replace the input's ID3 tag with metadata from flags, JSON and script.
async fn tag(input: &str, output: &str, args: &MetadataArgs) -> Result<()> {
    let metadata = load_metadata(args).await?;
    if metadata.is_empty() {
        tracing::warn!("No metadata given, writing a tag without frames");
    }

    let source = io::open(input)?;
    let audio = source.read_all().await?;
    log_downloaded(source.transferred_bytes());

    let tagged = embed(&audio, &metadata)
        .with_context(|| format!("Cannot tag {}", source.location()))?;
    tracing::info!(
        "Tagged {} with {} frames ({})",
        output,
        metadata.frames().len(),
        format_size(tagged.len() as u64)
    );

    write_output(output, &tagged).await
}

/// Write the input's audio without its leading ID3 tag.
async fn strip(input: &str, output: &str) -> Result<()> {
    let source = io::open(input)?;
    let audio = source.read_all().await?;
    let stream = strip_existing_tag(&audio)
        .with_context(|| format!("Cannot strip {}", source.location()))?;

    if stream.len() == audio.len() {
        tracing::info!("{} has no ID3v2 tag", source.location());
    } else {
        tracing::info!("Removed {} tag bytes", audio.len() - stream.len());
    }

    write_output(output, stream).await
}

/// Print the frames of the input's leading tag.
async fn inspect(input: &str, json: bool) -> Result<()> {
    let source = io::open(input)?;
    let audio = source.read_all().await?;
    let Some(tag) =
        read_tag(&audio).with_context(|| format!("Cannot read tag of {}", source.location()))?
    else {
        println!("No ID3v2 tag");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tag.metadata())?);
        return Ok(());
    }

    println!(
        "ID3v2.{}.{}, {} bytes",
        tag.header.major_version,
        tag.header.revision,
        tag.header.tag_len()
    );
    for frame in &tag.frames {
        match frame {
            Frame::Text { text, .. } => println!("{}  {}", frame.id_str(), text),
            Frame::Comment { language, text, .. } => println!(
                "{}  [{}] {}",
                frame.id_str(),
                String::from_utf8_lossy(language),
                text
            ),
            Frame::Other { body, .. } => {
                println!("{}  <{}>", frame.id_str(), format_size(body.len() as u64))
            }
        }
    }

    Ok(())
}

/// Print chapter time codes for a script.
async fn chapters(script: &Path, duration_secs: f64, json: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(script)
        .await
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let markers = extract(&text, duration_secs);

    if json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
    } else if markers.is_empty() {
        tracing::info!("No section markers in {}", script.display());
    } else {
        print!("{}", chapter_list(&markers));
    }

    Ok(())
}

/// Assemble metadata: flags first, then the JSON file, then the script.
///
/// A script only fills the comment and duration when neither was given
/// explicitly.
async fn load_metadata(args: &MetadataArgs) -> Result<Id3Metadata> {
    let mut metadata = args.to_metadata();

    if let Some(path) = &args.metadata {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let from_file: Id3Metadata = serde_json::from_str(&json)
            .with_context(|| format!("Invalid metadata JSON in {}", path.display()))?;
        metadata = metadata.or(from_file);
    }

    if let (Some(path), Some(seconds)) = (&args.script, args.duration_secs) {
        let script = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let markers = extract(&script, seconds);
        tracing::debug!("Found {} section markers in {}", markers.len(), path.display());

        if metadata.comment.is_none() && !markers.is_empty() {
            metadata.comment = Some(comment_text(&markers));
        }
        if metadata.duration_ms.is_none() && seconds.is_finite() && seconds > 0.0 {
            metadata.duration_ms = Some((seconds * 1000.0).round() as u64);
        }
    }

    Ok(metadata)
}

/// Write `data` to `output`, or to stdout for `-`.
///
/// Parent directories are created as needed.
async fn write_output(output: &str, data: &[u8]) -> Result<()> {
    if is_stdout(output) {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(data).await?;
        stdout.flush().await?;
        return Ok(());
    }

    let path = Path::new(output);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("Failed to write {}", output))?;
    Ok(())
}

/// Report network traffic, if any input came over HTTP.
fn log_downloaded(bytes: u64) {
    if bytes > 0 {
        tracing::info!("Downloaded {} from the network", format_size(bytes));
    }
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
