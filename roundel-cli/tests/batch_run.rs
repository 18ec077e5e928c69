//! End-to-end batch runs against the compiled binary.

use std::fs;
use std::path::Path;
use std::process::Command;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::tempdir;

fn write_solid(path: &Path, width: u32, height: u32, px: [u8; 4]) {
    RgbaImage::from_pixel(width, height, Rgba(px))
        .save(path)
        .expect("save synthetic image");
}

// JPEG encoding rejects RGBA buffers.
fn write_solid_rgb(path: &Path, width: u32, height: u32, px: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(px))
        .save(path)
        .expect("save synthetic image");
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_roundel-cli"))
        .args(args)
        .output()
        .expect("execute roundel-cli")
}

#[test]
fn corrupt_file_fails_without_aborting_the_batch() {
    let dir = tempdir().expect("tempdir");
    let input_dir = dir.path().join("images");
    let output_dir = dir.path().join("results");
    fs::create_dir_all(&input_dir).expect("input dir");

    let template = dir.path().join("template.png");
    write_solid(&template, 200, 200, [15, 15, 15, 255]);
    write_solid(&input_dir.join("valid.png"), 120, 90, [230, 120, 50, 255]);
    fs::write(input_dir.join("corrupt.png"), b"definitely not a png").expect("corrupt file");

    let report = dir.path().join("report.json");
    let output = run_cli(&[
        "--input",
        input_dir.to_str().unwrap(),
        "--output",
        output_dir.to_str().unwrap(),
        "--template",
        template.to_str().unwrap(),
        "--profile",
        "flush",
        "--json",
        report.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "per-file failures must not abort the batch: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output_dir.join("valid_card.png").exists());
    assert!(!output_dir.join("corrupt_card.png").exists());

    let report_json = fs::read_to_string(&report).expect("report written");
    assert!(report_json.contains("\"status\": \"composited\""));
    assert!(report_json.contains("\"status\": \"failed\""));
}

#[test]
fn strict_profile_skips_non_square_inputs() {
    let dir = tempdir().expect("tempdir");
    let input_dir = dir.path().join("images");
    let output_dir = dir.path().join("results");
    fs::create_dir_all(&input_dir).expect("input dir");

    let template = dir.path().join("template.png");
    write_solid(&template, 200, 200, [15, 15, 15, 255]);
    write_solid(&input_dir.join("square.png"), 80, 80, [230, 120, 50, 255]);
    write_solid(&input_dir.join("wide.png"), 120, 90, [50, 120, 230, 255]);

    let output = run_cli(&[
        "--input",
        input_dir.to_str().unwrap(),
        "--output",
        output_dir.to_str().unwrap(),
        "--template",
        template.to_str().unwrap(),
        "--profile",
        "strict",
    ]);

    assert!(output.status.success());
    assert!(output_dir.join("square_card.png").exists());
    assert!(
        !output_dir.join("wide_card.png").exists(),
        "strict profile must skip non-square inputs"
    );

    let card = image::open(output_dir.join("square_card.png"))
        .expect("decode card")
        .to_rgba8();
    assert_eq!(card.dimensions(), (200, 200));
}

#[test]
fn missing_template_is_fatal() {
    let dir = tempdir().expect("tempdir");
    let input_dir = dir.path().join("images");
    fs::create_dir_all(&input_dir).expect("input dir");
    write_solid(&input_dir.join("a.png"), 64, 64, [1, 2, 3, 255]);

    let output = run_cli(&[
        "--input",
        input_dir.to_str().unwrap(),
        "--template",
        dir.path().join("missing.png").to_str().unwrap(),
        "--output",
        dir.path().join("results").to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(
        !dir.path().join("results").exists(),
        "nothing is processed when the template is missing"
    );
}

#[test]
fn missing_input_directory_is_fatal() {
    let dir = tempdir().expect("tempdir");
    let template = dir.path().join("template.png");
    write_solid(&template, 64, 64, [1, 2, 3, 255]);

    let output = run_cli(&[
        "--input",
        dir.path().join("nope").to_str().unwrap(),
        "--template",
        template.to_str().unwrap(),
        "--output",
        dir.path().join("results").to_str().unwrap(),
    ]);

    assert!(!output.status.success());
}

#[test]
fn portrait_profile_without_model_still_produces_cards() {
    let dir = tempdir().expect("tempdir");
    let input_dir = dir.path().join("images");
    let output_dir = dir.path().join("results");
    fs::create_dir_all(&input_dir).expect("input dir");

    let template = dir.path().join("template.png");
    write_solid(&template, 300, 300, [15, 15, 15, 255]);
    write_solid_rgb(&input_dir.join("tall.jpeg"), 90, 160, [200, 60, 60]);

    let output = run_cli(&[
        "--input",
        input_dir.to_str().unwrap(),
        "--output",
        output_dir.to_str().unwrap(),
        "--template",
        template.to_str().unwrap(),
        "--profile",
        "portrait",
    ]);

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output_dir.join("tall_card.png").exists());
}
