use std::path::PathBuf;

fn find_test_font() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("FONT_FILE") {
        let p = PathBuf::from(p);
        if p.exists() {
            return Some(p);
        }
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_titlecard")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "titlecard.exe"
            } else {
                "titlecard"
            });
            p
        })
}

#[test]
fn cli_still_writes_png() {
    let Some(font) = find_test_font() else {
        eprintln!("skipping: no usable test font found");
        return;
    };

    let dir = PathBuf::from("target").join("cli_smoke");
    let _ = std::fs::remove_dir_all(&dir);

    let status = std::process::Command::new(bin_path())
        .args(["still", "--text", "Hi", "--width", "96", "--height", "64"])
        .args(["--font-size", "24", "--out-dir"])
        .arg(&dir)
        .arg("--font-file")
        .arg(&font)
        .status()
        .unwrap();
    assert!(status.success());

    let wrote_png = std::fs::read_dir(&dir).unwrap().filter_map(Result::ok).any(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with("card_") && name.ends_with(".png")
    });
    assert!(wrote_png);
}

#[test]
fn cli_rejects_missing_text() {
    let status = std::process::Command::new(bin_path())
        .args(["still", "--out-dir", "target/cli_smoke_missing"])
        .status()
        .unwrap();
    assert!(!status.success());
}
