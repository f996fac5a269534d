//! Smoke tests spawning the built `imfx` binary.

use std::{path::PathBuf, process::Command};

fn fixture_png(dir: &std::path::Path, name: &str, w: u32, h: u32, px: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

fn smoke_dir() -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_writes_png_to_stdout() {
    let dir = smoke_dir();
    let img = fixture_png(&dir, "in_a.png", 8, 8, [10, 20, 30, 255]);

    let out = Command::new(env!("CARGO_BIN_EXE_imfx"))
        .arg("0.ft(4x4)")
        .arg(&img)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let decoded = image::load_from_memory(&out.stdout).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 4));
}

#[test]
fn cli_illegal_expression_exits_1_with_empty_stdout() {
    let dir = smoke_dir();
    let img = fixture_png(&dir, "in_b.png", 4, 4, [0, 0, 0, 255]);

    let out = Command::new(env!("CARGO_BIN_EXE_imfx"))
        .arg("ft(100x100)")
        .arg(&img)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(
        String::from_utf8_lossy(&out.stderr).contains("illegal expression"),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn cli_out_of_range_image_index_exits_1() {
    let dir = smoke_dir();
    let img = fixture_png(&dir, "in_c.png", 4, 4, [0, 0, 0, 255]);

    let out = Command::new(env!("CARGO_BIN_EXE_imfx"))
        .arg("1")
        .arg(&img)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn cli_missing_image_arguments_exits_1() {
    let out = Command::new(env!("CARGO_BIN_EXE_imfx"))
        .arg("0")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(
        String::from_utf8_lossy(&out.stderr).contains("usage error"),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn cli_bare_image_ref_step_selects_that_image() {
    let dir = smoke_dir();
    let first = fixture_png(&dir, "in_d0.png", 8, 8, [255, 0, 0, 255]);
    let second = fixture_png(&dir, "in_d1.png", 3, 5, [0, 255, 0, 255]);

    let out = Command::new(env!("CARGO_BIN_EXE_imfx"))
        .arg("0.1")
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let decoded = image::load_from_memory(&out.stdout).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 5));
}

#[test]
fn cli_unreadable_image_exits_1_with_empty_stdout() {
    let dir = smoke_dir();
    let missing = dir.join("does_not_exist.png");

    let out = Command::new(env!("CARGO_BIN_EXE_imfx"))
        .arg("0")
        .arg(&missing)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}
