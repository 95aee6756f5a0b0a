mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use common::{MockApi, FAKE_IMAGE};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn tiny_squeeze() -> Command {
    let mut cmd = Command::cargo_bin("tiny-squeeze").unwrap();
    cmd.env_remove("TINIFY_API_KEY").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    tiny_squeeze().arg("--help").assert().success();
}

#[test]
fn test_subcommand_help() {
    for sub in ["shrink", "resize", "batch"] {
        tiny_squeeze().args([sub, "--help"]).assert().success();
    }
}

#[test]
fn test_shrink_missing_args() {
    tiny_squeeze().arg("shrink").assert().failure();
}

#[test]
fn test_resize_requires_method() {
    tiny_squeeze()
        .args(["--api-key", "abc", "resize", "in.jpg", "out.jpg"])
        .assert()
        .failure();
}

#[test]
fn test_missing_api_key() {
    tiny_squeeze()
        .args(["shrink", "photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TINIFY_API_KEY"));
}

#[test]
fn test_shrink_nonexistent_file() {
    tiny_squeeze()
        .env("TINIFY_API_KEY", "abc")
        .args(["shrink", "nonexistent.jpg", "out.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to shrink"));
}

#[test]
fn test_incomplete_store_options_rejected() {
    tiny_squeeze()
        .env("TINIFY_API_KEY", "abc")
        .args(["shrink", "in.png", "out.png", "--store-key-id", "AKIA"])
        .assert()
        .failure();
}

#[test]
fn test_shrink_against_mock_service() {
    let api = MockApi::start();
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("photo.png");
    input.write_binary(FAKE_IMAGE).unwrap();
    let output = temp.child("photo.min.png");

    api.mount(
        Mock::given(method("POST"))
            .and(path("/shrink"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "input": { "size": 2000, "type": "image/png" },
                "output": { "url": api.url("/output/abc"), "size": 500, "type": "image/png" }
            }))),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(path("/output/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"tiny".to_vec())),
    );

    tiny_squeeze()
        .env("TINIFY_API_KEY", "abc")
        .args(["--endpoint", &api.url("/shrink"), "shrink"])
        .arg(input.path())
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("75.0%"));

    output.assert(predicate::path::exists());
    output.assert("tiny");
}

#[test]
fn test_shrink_without_output_url_does_not_claim_save() {
    let api = MockApi::start();
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("photo.png");
    input.write_binary(FAKE_IMAGE).unwrap();
    let output = temp.child("out.png");

    api.mount(
        Mock::given(method("POST"))
            .and(path("/shrink"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "input": { "size": 2000, "type": "image/png" }
            }))),
    );

    tiny_squeeze()
        .env("TINIFY_API_KEY", "abc")
        .args(["--endpoint", &api.url("/shrink"), "shrink"])
        .arg(input.path())
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to").not())
        .stderr(predicate::str::contains("no output URL"));

    output.assert(predicate::path::missing());
}

#[test]
fn test_shrink_reports_service_error() {
    let api = MockApi::start();
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("photo.png");
    input.write_binary(FAKE_IMAGE).unwrap();

    api.mount(
        Mock::given(method("POST"))
            .and(path("/shrink"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": "TooManyRequests",
                "message": "Your monthly limit has been exceeded"
            }))),
    );

    tiny_squeeze()
        .env("TINIFY_API_KEY", "abc")
        .args(["--endpoint", &api.url("/shrink"), "shrink"])
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("monthly limit"));
}

#[test]
fn test_batch_empty_directory() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out");

    tiny_squeeze()
        .env("TINIFY_API_KEY", "abc")
        .args(["batch"])
        .arg(temp.path())
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No image files found"));
}
