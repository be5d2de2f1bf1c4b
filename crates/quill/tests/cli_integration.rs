//! Integration tests that run the quill binary

use std::path::Path;
use std::process::Command;

fn quill_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quill"));
    // Keep the working directory's config out of the way.
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn fixtures_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn core_fixtures_dir() -> &'static Path {
    Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../quill-core/tests/fixtures"
    ))
}

#[test]
fn test_render_to_stdout() {
    let output = quill_bin()
        .arg("render")
        .arg("--no-highlight")
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stdout.contains(r##"<a href="#getting-started""##));
    assert!(stdout.contains(r#"id="usage""#));
    assert!(stdout.contains(r#"id="usage-2""#));
    assert!(stdout.contains("<pre><code class=\"language-sh\">dotnet add package Thoth.Json\n</code></pre>"));

    // Progress goes to stderr (note: output contains ANSI codes)
    assert!(stderr.contains("Rendering"), "Should log progress: {}", stderr);
    assert!(!stdout.contains("Rendering"));
}

#[test]
fn test_render_json() {
    let output = quill_bin()
        .arg("render")
        .arg("--no-highlight")
        .arg("-f")
        .arg("json")
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    assert!(output.status.success(), "Command should succeed");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert!(value["file"].as_str().unwrap().ends_with("guide.md"));
    assert!(value["html"].as_str().unwrap().contains("<h1>"));

    let slugs: Vec<&str> = value["headings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["getting-started", "usage", "usage-2"]);
}

#[test]
fn test_config_controls_anchors() {
    let output = quill_bin()
        .arg("render")
        .arg("--no-highlight")
        .arg("-c")
        .arg(fixtures_dir().join("config.yaml"))
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    assert!(output.status.success(), "Command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    // min_level 2 leaves the title alone.
    assert!(stdout.contains("<h1>Getting started</h1>"));
    assert!(stdout.contains(r#"<span class="header-anchor" id="usage"></span>¶</a>"#));
}

#[test]
fn test_malformed_config_fails() {
    let output = quill_bin()
        .arg("render")
        .arg("-c")
        .arg(fixtures_dir().join("broken.yaml"))
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    assert!(!output.status.success(), "Command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.yaml"), "Should name the config: {}", stderr);
}

#[test]
fn test_unknown_format_fails() {
    let output = quill_bin()
        .arg("render")
        .arg("-f")
        .arg("pdf")
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    // Rejected while parsing arguments, before any file is read.
    assert_eq!(output.status.code(), Some(2), "Should be a usage error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pdf"), "Should name the format: {}", stderr);
    assert!(stderr.contains("html") && stderr.contains("json"), "{}", stderr);
    assert!(!stderr.contains("Rendering"), "{}", stderr);
}

#[test]
fn test_missing_input_fails() {
    let output = quill_bin()
        .arg("render")
        .arg(fixtures_dir().join("does-not-exist.md"))
        .output()
        .expect("Failed to run quill");

    assert!(!output.status.success(), "Command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.md"), "{}", stderr);
}

#[test]
fn test_multiple_files_into_directory() {
    let temp = tempfile::tempdir().unwrap();
    let out_dir = temp.path().join("site");

    let output = quill_bin()
        .arg("render")
        .arg("--no-highlight")
        .arg("-o")
        .arg(&out_dir)
        .arg(core_fixtures_dir().join("decoders.md"))
        .arg(core_fixtures_dir().join("encoders.md"))
        .output()
        .expect("Failed to run quill");

    assert!(output.status.success(), "Command should succeed");
    assert!(output.stdout.is_empty());

    let decoders = std::fs::read_to_string(out_dir.join("decoders.html")).unwrap();
    let encoders = std::fs::read_to_string(out_dir.join("encoders.html")).unwrap();

    // Each file gets its own registry.
    assert!(decoders.contains(r#"id="object-decoders-2""#));
    assert!(encoders.contains(r#"id="encoders""#));
    assert!(!encoders.contains(r#"id="encoders-2""#));
}

#[test]
fn test_single_file_output() {
    let temp = tempfile::tempdir().unwrap();
    let out_file = temp.path().join("guide.html");

    let output = quill_bin()
        .arg("render")
        .arg("--no-highlight")
        .arg("--output")
        .arg(&out_file)
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    assert!(output.status.success(), "Command should succeed");
    let html = std::fs::read_to_string(&out_file).unwrap();
    assert!(html.contains(r#"id="getting-started""#));
}

#[test]
fn test_fsharp_blocks_highlighted() {
    let output = quill_bin()
        .arg("render")
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");
    let plain = quill_bin()
        .arg("render")
        .arg("--no-highlight")
        .arg(fixtures_dir().join("guide.md"))
        .output()
        .expect("Failed to run quill");

    assert!(output.status.success(), "Command should succeed");
    let highlighted = String::from_utf8_lossy(&output.stdout);
    let plain = String::from_utf8_lossy(&plain.stdout);

    assert_ne!(highlighted, plain);
    // Only the fsharp block changes.
    assert!(highlighted.contains("<pre><code class=\"language-sh\">dotnet add package Thoth.Json\n</code></pre>"));
    assert!(highlighted.contains("<pre><code class=\"language-fsharp\">"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("highlighting failed"), "{}", stderr);
}
