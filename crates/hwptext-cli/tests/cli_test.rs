//! Process-level tests for the `hwptext` binary.

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;

fn hwptext() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hwptext"));
    command.env_remove("RUST_LOG");
    command
}

fn hwpx_doc(text: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
    writer.start_file("Contents/section0.xml", SimpleFileOptions::default()).unwrap();
    write!(writer, "<hs:sec><hp:p><hp:t>{text}</hp:t></hp:p></hs:sec>").unwrap();
    writer.finish().unwrap();
    file
}

#[test]
fn test_extract_prints_text_and_strategy_line() {
    let doc = hwpx_doc("명령줄 추출 시험");

    let output = hwptext().arg("extract").arg(doc.path()).output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "명령줄 추출 시험");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Decoded using hwpx path."));
}

#[test]
fn test_extract_json_output() {
    let doc = hwpx_doc("JSON 출력 시험");

    let output = hwptext()
        .args(["extract", "--format", "json"])
        .arg(doc.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["content"], "JSON 출력 시험");
    assert_eq!(value["strategy"], "hwpx");
    assert_eq!(value["label"], "hwpx");
}

#[test]
fn test_extract_failure_exits_nonzero() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"not a document").unwrap();

    let output = hwptext().arg("extract").arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no partial output on failure");
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_decode_reports_codec() {
    let mut file = NamedTempFile::new().unwrap();
    let bytes: Vec<u8> = "1. 한글 (A)".encode_utf16().flat_map(u16::to_le_bytes).collect();
    file.write_all(&bytes).unwrap();

    let output = hwptext().arg("decode").arg(file.path()).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1. 한글 (A)");
    assert!(String::from_utf8_lossy(&output.stderr).contains("utf-16-le"));
}
