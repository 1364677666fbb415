use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn string_resolver_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("string-resolver"))
}

fn write_document(dir: &Path, file: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

fn write_fixture_content(dir: &Path, ios_value: &str, android_value: &str) {
    write_document(
        dir,
        "ios.json",
        &format!(
            r#"{{"title":"Test iOS Entry","platform":"ios","lang":"en","entries":[
                {{"type":"string","key":"simpleString","values":[{{"value":"{}"}}]}}]}}"#,
            ios_value
        ),
    );
    write_document(
        dir,
        "android.json",
        &format!(
            r#"{{"title":"Test Android Entry","platform":"android","lang":"en","entries":[
                {{"type":"string","key":"simpleString","values":[{{"value":"{}"}}]}}]}}"#,
            android_value
        ),
    );
    write_document(
        dir,
        "shared.json",
        r#"{"title":"Test Cross Platform Entry","platform":"all","lang":"en","entries":[
            {"type":"string","key":"universalString","values":[{"value":"This is cross platform"}]}]}"#,
    );
}

#[test]
fn test_diff_reports_platform_changes() {
    let temp_dir = TempDir::new().unwrap();
    let before = temp_dir.path().join("before");
    let after = temp_dir.path().join("after");
    write_fixture_content(&before, "This is iOS", "This is Android");
    write_fixture_content(&after, "This is iOS v2", "This is Android v2");

    let output = string_resolver_cmd()
        .args([
            "diff",
            before.to_str().unwrap(),
            after.to_str().unwrap(),
            "--platform",
            "android",
            "--version",
            "0.0.1",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let diff: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        diff,
        serde_json::json!({ "simpleString": { "en": "This is Android v2" } })
    );
}

#[test]
fn test_diff_without_changes_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let before = temp_dir.path().join("before");
    let after = temp_dir.path().join("after");
    write_fixture_content(&before, "Same iOS", "Same Android");
    write_fixture_content(&after, "Same iOS", "Same Android");

    let output = string_resolver_cmd()
        .args(["diff", before.to_str().unwrap(), after.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let diff: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(diff, serde_json::json!({}));
}

#[test]
fn test_diff_rejects_invalid_version() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture_content(temp_dir.path(), "a", "b");

    let output = string_resolver_cmd()
        .args([
            "diff",
            temp_dir.path().to_str().unwrap(),
            temp_dir.path().to_str().unwrap(),
            "--version",
            "latest",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Version must be a valid semver pattern"));
}

#[test]
fn test_build_writes_culture_tables() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture_content(&temp_dir.path().join("content"), "This is iOS", "This is Android");
    write_document(
        &temp_dir.path().join("content"),
        "shared_au.json",
        r#"{"title":"AU","lang":"en-AU","entries":[
            {"type":"string","key":"universalString","values":[{"value":"G'day cross platform"}]}]}"#,
    );
    let config = temp_dir.path().join("strings.toml");
    fs::write(
        &config,
        "cultures = [\"en\", \"en-AU\"]\n\n[content]\npath = \"content\"\n\n[output]\nstrings = \"out\"\ncode = \"gen/accessors.json\"\n",
    )
    .unwrap();

    let output = string_resolver_cmd()
        .args([
            "build",
            "--config",
            config.to_str().unwrap(),
            "--ios",
            "--version",
            "1.2.3",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let base: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("out/Base.json")).unwrap())
            .unwrap();
    assert_eq!(base["culture"], "en");
    assert_eq!(base["isBase"], true);
    let rows = base["rows"].as_array().unwrap();
    assert_eq!(rows[0]["key"], "simpleString");
    assert_eq!(rows[0]["value"], "This is iOS");
    assert_eq!(rows[1]["key"], "universalString");

    let au: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("out/en-AU.json")).unwrap())
            .unwrap();
    let au_rows = au["rows"].as_array().unwrap();
    assert_eq!(au_rows[0]["value"], "This is iOS");
    assert_eq!(au_rows[1]["value"], "G'day cross platform");

    let accessors: Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("gen/accessors.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(accessors.as_array().unwrap().len(), 2);
}

#[test]
fn test_build_requires_platform() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture_content(&temp_dir.path().join("content"), "a", "b");
    let config = temp_dir.path().join("strings.toml");
    fs::write(&config, "cultures = [\"en\"]\n[content]\npath = \"content\"\n").unwrap();

    let output = string_resolver_cmd()
        .args(["build", "--config", config.to_str().unwrap(), "--version", "1.0.0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--ios or --android"));
}

#[test]
fn test_build_fails_on_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let content = temp_dir.path().join("content");
    write_document(
        &content,
        "home.json",
        r#"{"title":"Home","lang":"en","entries":[{"type":"string","key":"title","values":[{"value":"Home"}]}]}"#,
    );
    write_document(
        &content,
        "profile.json",
        r#"{"title":"Profile","lang":"en","entries":[{"type":"string","key":"title","values":[{"value":"Profile"}]}]}"#,
    );
    let config = temp_dir.path().join("strings.toml");
    fs::write(
        &config,
        "cultures = [\"en\"]\nplatform = \"android\"\nversion = \"1.0.0\"\n[content]\npath = \"content\"\n",
    )
    .unwrap();

    let output = string_resolver_cmd()
        .args(["build", "--config", config.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Conflicting key title"));
    assert!(stderr.contains("Home") && stderr.contains("Profile"));
}

#[test]
fn test_build_prints_tables_without_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    write_fixture_content(&temp_dir.path().join("content"), "iOS", "Android");
    let config = temp_dir.path().join("strings.toml");
    fs::write(&config, "cultures = [\"en\"]\n[content]\npath = \"content\"\n").unwrap();

    let output = string_resolver_cmd()
        .args([
            "build",
            "--config",
            config.to_str().unwrap(),
            "--android",
            "--version",
            "1.0.0",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let tables: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tables[0]["rows"][0]["value"], "Android");
}
