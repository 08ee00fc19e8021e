//! CLI end-to-end tests
//!
//! Tests for the podpack command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

use podpack::{ArchiveReader, read_tag};

const MP3: &[u8] = b"\xFF\xFB\x90\x64\x00\x00\x00\x00frames";

/// Get a command for the podpack binary
#[allow(deprecated)]
fn podpack_cmd() -> Command {
    Command::cargo_bin("podpack").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    podpack_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    podpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("podpack"));
}

#[test]
fn test_pack_then_list() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "hi").unwrap();
    fs::write(&b, "bye").unwrap();
    let zip = dir.path().join("out/batch.zip");

    podpack_cmd()
        .args(["pack", "-o"])
        .arg(&zip)
        .arg(&a)
        .arg(&b)
        .assert()
        .success();

    let data = fs::read(&zip).unwrap();
    let reader = ArchiveReader::new(&data).unwrap();
    let names: Vec<_> = reader.entries().iter().map(|e| e.file_name.clone()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);

    podpack_cmd()
        .args(["list", "--verify"])
        .arg(&zip)
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("37"))
        .stdout(predicate::str::contains("All entries OK"));
}

#[test]
fn test_pack_to_stdout_with_names() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "hi").unwrap();

    let output = podpack_cmd()
        .args(["pack", "-o", "-", "-n", "renamed.txt"])
        .arg(&a)
        .output()
        .unwrap();
    assert!(output.status.success());

    let reader = ArchiveReader::new(&output.stdout).unwrap();
    assert_eq!(reader.entries()[0].file_name, "renamed.txt");
}

#[test]
fn test_pack_rejects_oversized_batch() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "hi").unwrap();

    podpack_cmd()
        .args(["pack", "-o", "-", "--max-entries", "1"])
        .arg(&a)
        .arg(&a)
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch limit"));
}

#[test]
fn test_tag_with_json_and_flags() {
    let dir = tempdir().unwrap();
    let mp3 = dir.path().join("ep1.mp3");
    let meta = dir.path().join("meta.json");
    let out = dir.path().join("tagged.mp3");
    fs::write(&mp3, MP3).unwrap();
    fs::write(
        &meta,
        r#"{"title": "From JSON", "artist": "Show", "trackNumber": "1"}"#,
    )
    .unwrap();

    podpack_cmd()
        .args(["tag", "--title", "EP1", "--metadata"])
        .arg(&meta)
        .arg(&mp3)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let tagged = fs::read(&out).unwrap();
    assert_eq!(&tagged[..6], b"ID3\x03\x00\x00");
    let tag = read_tag(&tagged).unwrap().unwrap().metadata();
    assert_eq!(tag.title.as_deref(), Some("EP1"));
    assert_eq!(tag.artist.as_deref(), Some("Show"));
    assert_eq!(tag.track_number.as_deref(), Some("1"));
    assert!(tagged.ends_with(MP3));
}

#[test]
fn test_tag_with_script_comment() {
    let dir = tempdir().unwrap();
    let mp3 = dir.path().join("ep1.mp3");
    let script = dir.path().join("script.txt");
    let out = dir.path().join("tagged.mp3");
    fs::write(&mp3, MP3).unwrap();
    fs::write(&script, "[INTRO] hola [OUTRO] adios!!").unwrap();

    podpack_cmd()
        .args(["tag", "--duration-secs", "120", "--script"])
        .arg(&script)
        .arg(&mp3)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let tag = read_tag(&fs::read(&out).unwrap()).unwrap().unwrap().metadata();
    assert_eq!(tag.comment.as_deref(), Some("INTRO 0:00 | OUTRO 0:55"));
    assert_eq!(tag.duration_ms, Some(120_000));
}

#[test]
fn test_strip_and_inspect() {
    let dir = tempdir().unwrap();
    let mp3 = dir.path().join("ep1.mp3");
    let tagged = dir.path().join("tagged.mp3");
    let stripped = dir.path().join("stripped.mp3");
    fs::write(&mp3, MP3).unwrap();

    podpack_cmd()
        .args(["tag", "--genre", "Podcast", "--comment", "notas"])
        .arg(&mp3)
        .arg("-o")
        .arg(&tagged)
        .assert()
        .success();

    podpack_cmd()
        .arg("inspect")
        .arg(&tagged)
        .assert()
        .success()
        .stdout(predicate::str::contains("ID3v2.3.0"))
        .stdout(predicate::str::contains("TCON  Podcast"))
        .stdout(predicate::str::contains("COMM  [spa] notas"));

    podpack_cmd()
        .arg("strip")
        .arg(&tagged)
        .arg("-o")
        .arg(&stripped)
        .assert()
        .success();
    assert_eq!(fs::read(&stripped).unwrap(), MP3);

    podpack_cmd()
        .arg("inspect")
        .arg(&stripped)
        .assert()
        .success()
        .stdout(predicate::str::contains("No ID3v2 tag"));
}

#[test]
fn test_tag_malformed_input_fails() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("bad.mp3");
    fs::write(&bad, b"ID3\x03\x00\x00\x00\x00\x01\x00short").unwrap();

    podpack_cmd()
        .args(["tag", "--title", "x", "-o", "-"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed input tag"));
}

#[test]
fn test_tag_without_metadata_warns() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("ep.mp3");
    let output = dir.path().join("tagged.mp3");
    fs::write(&input, MP3).unwrap();

    podpack_cmd()
        .args(["tag", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("No metadata given"));

    let tagged = fs::read(&output).unwrap();
    assert_eq!(&tagged[..10], b"ID3\x03\x00\x00\x00\x00\x00\x00");
    assert_eq!(&tagged[10..], MP3);
}

#[test]
fn test_chapters_command() {
    let dir = tempdir().unwrap();
    let script = dir.path().join("script.txt");
    fs::write(&script, "[INTRO] abcdef [OUTRO] ghijklm").unwrap();

    podpack_cmd()
        .arg("chapters")
        .arg(&script)
        .args(["--duration-secs", "120"])
        .assert()
        .success()
        .stdout("0:00 INTRO\n1:00 OUTRO\n");

    podpack_cmd()
        .arg("chapters")
        .arg(&script)
        .args(["--duration-secs", "120", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"timeMs\": 60000"))
        .stdout(predicate::str::contains("\"timeFormatted\": \"1:00\""));
}
