use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn askdoc_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("askdoc");
    path
}

fn setup_test_env(config_content: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(
        root.join("sentences.txt"),
        "The cat sat. The dog ran. The bird flew.",
    )
    .unwrap();

    let config_path = config_dir.join("askdoc.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_askdoc(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = askdoc_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run askdoc binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_chunk_partitions_document() {
    let (tmp, config_path) = setup_test_env(
        r#"[chunking]
chunk_size = 12
stride = 12
"#,
    );
    let file = tmp.path().join("sentences.txt");

    let (stdout, stderr, success) = run_askdoc(&config_path, &["chunk", file.to_str().unwrap()]);
    assert!(success, "chunk failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("chunks: 4"), "unexpected output: {}", stdout);
    assert!(stdout.contains("The cat sat."));
    assert!(stdout.contains("lew."));
}

#[test]
fn test_chunk_reports_gapped_default_window() {
    // Without a config file the original 300/512 gapped window applies;
    // a 40-character document fits in a single chunk either way.
    let (tmp, _) = setup_test_env("");
    let file = tmp.path().join("sentences.txt");
    let missing_config = tmp.path().join("does-not-exist.toml");

    let (stdout, _, success) = run_askdoc(&missing_config, &["chunk", file.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("chunks: 1"));
    assert!(stdout.contains("chunk_size=300, stride=512"));
}

#[test]
fn test_ask_requires_embedding_provider() {
    let (tmp, config_path) = setup_test_env("");
    let file = tmp.path().join("sentences.txt");

    let (stdout, stderr, success) = run_askdoc(
        &config_path,
        &["ask", file.to_str().unwrap(), "what did the dog do?"],
    );
    assert!(!success, "ask should fail without an embedding provider: {}", stdout);
    assert!(
        stderr.contains("disabled"),
        "expected disabled-provider error, got: {}",
        stderr
    );
}

#[test]
fn test_invalid_chunk_size_rejected() {
    let (tmp, config_path) = setup_test_env(
        r#"[chunking]
chunk_size = 0
"#,
    );
    let file = tmp.path().join("sentences.txt");

    let (_, stderr, success) = run_askdoc(&config_path, &["chunk", file.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("chunk_size"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_embedding_provider_rejected() {
    let (tmp, config_path) = setup_test_env(
        r#"[embedding]
provider = "sentence-transformers"
model = "all-MiniLM-L6-v2"
dims = 384
"#,
    );
    let file = tmp.path().join("sentences.txt");

    let (_, stderr, success) = run_askdoc(&config_path, &["chunk", file.to_str().unwrap()]);
    assert!(!success);
    assert!(
        stderr.contains("Unknown embedding provider"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_unsupported_extension_rejected() {
    let (tmp, config_path) = setup_test_env("");
    let file = tmp.path().join("archive.zip");
    fs::write(&file, b"PK\x03\x04").unwrap();

    let (_, stderr, success) = run_askdoc(&config_path, &["chunk", file.to_str().unwrap()]);
    assert!(!success);
    assert!(
        stderr.contains("unsupported") || stderr.contains("unrecognized"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_invalid_pdf_rejected() {
    let (tmp, config_path) = setup_test_env("");
    let file = tmp.path().join("broken.pdf");
    fs::write(&file, b"not a pdf at all").unwrap();

    let (_, stderr, success) = run_askdoc(&config_path, &["chunk", file.to_str().unwrap()]);
    assert!(!success);
    assert!(
        stderr.contains("extract") || stderr.contains("PDF"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_empty_document_has_no_chunks() {
    let (tmp, config_path) = setup_test_env("");
    let file = tmp.path().join("empty.txt");
    fs::write(&file, "").unwrap();

    let (stdout, _, success) = run_askdoc(&config_path, &["chunk", file.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("chunks: 0"), "stdout: {}", stdout);
}
