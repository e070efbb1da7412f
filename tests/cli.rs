extern crate assert_cmd;
extern crate image;
extern crate mandeltiles;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use mandeltiles::{render, Framebuffer, ImageParams, Palette, RenderConfig};
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn mandeltiles() -> Command {
    Command::cargo_bin("mandeltiles").unwrap()
}

#[test]
fn renders_a_png_and_reports_each_thread() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("tiles.png");
    mandeltiles()
        .args(&["-s", "32x24", "-i", "50", "-t", "2", "--tile", "8x8", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Thread-< 0 > started."))
        .stdout(predicate::str::contains("Thread-< 1 > stopped."));

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.len() > PNG_SIGNATURE.len());
    assert_eq!(&bytes[..8], &PNG_SIGNATURE[..]);
}

#[test]
fn written_image_matches_the_library_render() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("rows.png");
    mandeltiles()
        .args(&[
            "-q", "-m", "rows", "-s", "40x30", "-i", "80", "-t", "3", "-p", "smooth", "-r",
            "-1.5:0.5:-1:1", "-o",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Thread-").not());

    let params = ImageParams::new(RenderConfig {
        width: 40,
        height: 30,
        x_min: -1.5,
        x_max: 0.5,
        y_min: -1.0,
        y_max: 1.0,
        iterations: 80,
        threads: 1,
        tiled: false,
        palette: Palette::Smooth,
        ..RenderConfig::default()
    })
    .unwrap();
    let mut expected = Framebuffer::new(40, 30);
    render(&params, &mut expected);

    let written = image::open(&out).unwrap().to_rgb();
    assert_eq!(written.dimensions(), (40, 30));
    assert_eq!(written.into_raw(), expected.into_bytes());
}

#[test]
fn refuses_tiles_that_do_not_divide_the_image() {
    let dir = tempdir().unwrap();
    mandeltiles()
        .args(&["-s", "30x30", "--tile", "8x8", "-o"])
        .arg(dir.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not evenly divide"));
    assert!(!dir.path().join("never.png").exists());
}

#[test]
fn refuses_an_inverted_viewport() {
    let dir = tempdir().unwrap();
    mandeltiles()
        .args(&["-s", "16x16", "-r", "2:-2:-2:2", "-o"])
        .arg(dir.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not to the left of"));
}

#[test]
fn refuses_unparsable_sizes() {
    mandeltiles()
        .args(&["-s", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}
