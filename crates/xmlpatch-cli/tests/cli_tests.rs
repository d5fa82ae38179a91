#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Manifest name="manifest">
    <TargetEndpoints>
        <VersionInfo resourceName="old"/>
    </TargetEndpoints>
</Manifest>
"#;

fn xmlpatch() -> Command {
    Command::cargo_bin("xmlpatch").unwrap()
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn dry_run_prints_patched_document() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("manifest.xml");
    write(&input, MANIFEST);

    xmlpatch()
        .arg(&input)
        .args(["--path", "TargetEndpoints/VersionInfo"])
        .args(["--set-attr", "resourceName=new default"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<Manifest name="manifest"><TargetEndpoints><VersionInfo resourceName="new default"/></TargetEndpoints></Manifest>"#,
        ))
        .stderr(predicate::str::contains("Old attribute: 'old'"))
        .stderr(predicate::str::contains("File was saved at").not());

    // dry run leaves the input alone
    assert_eq!(fs::read_to_string(&input).unwrap(), MANIFEST);
}

#[test]
fn get_attr_prints_current_value() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("manifest.xml");
    write(&input, MANIFEST);

    xmlpatch()
        .arg(&input)
        .args(["--path", "TargetEndpoints/VersionInfo"])
        .args(["--get-attr", "resourceName"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest.xml: old"));
}

#[test]
fn output_dir_mirrors_directory_layout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("apiproxy");
    write(&input.join("manifest.xml"), MANIFEST);
    write(
        &input.join("proxies").join("default.xml"),
        "<ProxyEndpoint><TargetEndpoints><VersionInfo/></TargetEndpoints></ProxyEndpoint>",
    );
    let out = dir.path().join("out");

    xmlpatch()
        .arg(&input)
        .args(["--path", "TargetEndpoints/VersionInfo"])
        .args(["--set-attr", "resourceName=v2"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("File was saved at"));

    let patched = fs::read_to_string(out.join("proxies").join("default.xml")).unwrap();
    assert_eq!(
        patched,
        r#"<ProxyEndpoint><TargetEndpoints><VersionInfo resourceName="v2"/></TargetEndpoints></ProxyEndpoint>"#
    );
    assert!(out.join("manifest.xml").exists());
}

#[test]
fn in_place_with_expanded_empty_elements() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.xml");
    write(&input, "<a><b/></a>");

    xmlpatch()
        .arg(&input)
        .args(["--path", "b", "--set-text", "x & y", "--in-place", "--expand-empty"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&input).unwrap(), "<a><b>x &amp; y</b></a>");
}

#[test]
fn malformed_document_fails_without_stopping_batch() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    write(&input.join("a.xml"), "<a><b></a>");
    write(&input.join("b.xml"), "<a><b/></a>");
    let out = dir.path().join("out");

    xmlpatch()
        .arg(&input)
        .args(["--path", "b", "--set-attr", "k=v"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("mismatched closing tag"))
        .stderr(predicate::str::contains("1 of 2 document(s) failed"));

    assert!(!out.join("a.xml").exists());
    assert_eq!(
        fs::read_to_string(out.join("b.xml")).unwrap(),
        r#"<a><b k="v"/></a>"#
    );
}

#[test]
fn missing_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.xml");
    write(&input, "<a/>");

    xmlpatch()
        .arg(&input)
        .args(["--path", "nope", "--set-attr", "k=v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no element at path /nope"));
}

#[test]
fn nothing_to_do_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.xml");
    write(&input, "<a/>");

    xmlpatch()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to do"));
}

#[test]
fn missing_input_file_is_an_error() {
    xmlpatch()
        .arg("does-not-exist.xml")
        .args(["--set-attr", "k=v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
}

#[test]
fn non_utf8_file_does_not_stop_directory_run() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    write(&input.join("a.xml"), "<a><b/></a>");
    fs::write(input.join("b.xml"), b"<a>caf\xe9</a>").unwrap();
    write(&input.join("c.xml"), "<a><b/></a>");
    let out = dir.path().join("out");

    xmlpatch()
        .arg(&input)
        .args(["--path", "b", "--set-attr", "k=v"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid utf-8"))
        .stderr(predicate::str::contains("1 of 3 document(s) failed"));

    assert!(out.join("a.xml").exists());
    assert!(!out.join("b.xml").exists());
    assert!(out.join("c.xml").exists());
}
