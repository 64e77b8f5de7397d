// ABOUTME: Smoke tests for the scour CLI binary.
// ABOUTME: Exercises file mode, output formats, and argument validation.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const ARTICLE: &str = r#"
    <html><head><title>A tale of two harbors | Example Times</title></head>
    <body>
        <div class="story">
            <p>The first harbor silted up slowly, over decades, while its rival dredged, invested, and grew without pause.</p>
            <p>By the time anyone noticed the difference, the ships had already voted, with their keels, for the deeper water.</p>
            <p>What remained was a museum town, pretty and quiet, trading on the memory of the trade it lost.</p>
        </div>
    </body></html>
"#;

fn write_article() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("a temp file");
    file.write_all(ARTICLE.as_bytes()).expect("written");
    file
}

#[test]
fn test_file_mode_prints_article_html() {
    let file = write_article();
    Command::cargo_bin("scour")
        .expect("binary built")
        .arg("--file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<div id="article">"#))
        .stdout(predicate::str::contains("deeper water"));
}

#[test]
fn test_json_format_includes_title_and_confidence() {
    let file = write_article();
    Command::cargo_bin("scour")
        .expect("binary built")
        .arg("--file")
        .arg(file.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"confidence\""))
        .stdout(predicate::str::contains("A tale of two harbors"));
}

#[test]
fn test_full_format_wraps_a_standalone_page() {
    let file = write_article();
    Command::cargo_bin("scour")
        .expect("binary built")
        .arg("--file")
        .arg(file.path())
        .arg("--format")
        .arg("full")
        .assert()
        .success()
        .stdout(predicate::str::contains("articleTitle"))
        .stdout(predicate::str::contains("<style"));
}

#[test]
fn test_output_file_is_written() {
    let file = write_article();
    let out_dir = tempfile::tempdir().expect("a temp dir");
    let out_path = out_dir.path().join("article.html");

    Command::cargo_bin("scour")
        .expect("binary built")
        .arg("--file")
        .arg(file.path())
        .arg("-o")
        .arg(&out_path)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out_path).expect("output written");
    assert!(written.contains(r#"<div id="article">"#));
}

#[test]
fn test_missing_input_fails() {
    Command::cargo_bin("scour")
        .expect("binary built")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
