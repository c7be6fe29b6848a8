//! Tests for the `domproc` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn xml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_text_command() {
    let file = xml_file("<doc>\n  <kop>Title</kop>\n  <p>Hello <b>world</b></p>\n</doc>");

    Command::cargo_bin("domproc")
        .unwrap()
        .args(["text", "--skip", "kop"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("Hello world\n"));
}

#[test]
fn test_tree_command() {
    let file = xml_file(r#"<doc><meta/><p class="x">a <span>b</span></p><nadruk>c</nadruk></doc>"#);

    Command::cargo_bin("domproc")
        .unwrap()
        .args([
            "tree", "--drop", "meta", "--unwrap", "span", "--rename", "nadruk=em",
        ])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "<doc><p class=\"x\">a b</p><em>c</em></doc>\n",
        ));
}

#[test]
fn test_invalid_xml_fails() {
    let file = xml_file("<doc><p></doc>");

    Command::cargo_bin("domproc")
        .unwrap()
        .arg("text")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("XML parsing failed"));
}

#[test]
fn test_invalid_rename_fails() {
    let file = xml_file("<doc/>");

    Command::cargo_bin("domproc")
        .unwrap()
        .args(["tree", "--rename", "nadruk"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rename"));
}

#[test]
fn test_missing_file_fails() {
    Command::cargo_bin("domproc")
        .unwrap()
        .args(["text", "does-not-exist.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}
