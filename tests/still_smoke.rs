use std::path::PathBuf;

use titlecard::{CardRequest, RenderConfig, render_still_card};

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

#[test]
fn still_card_smoke_with_unique_names() {
    let Some(font) = find_test_font() else {
        eprintln!("skipping: no usable test font found");
        return;
    };

    let dir = PathBuf::from("target").join("still_smoke");
    let _ = std::fs::remove_dir_all(&dir);

    let mut req = CardRequest::new("Hello still card");
    req.width = 320;
    req.height = 120;
    req.font_size = 24;
    req.font_file = Some(font);
    let cfg = RenderConfig::new(&dir, "unused-default.ttf");

    let a = render_still_card(&req, &cfg).unwrap();
    assert!(a.path.exists());
    assert!(a.file_name.starts_with("card_") && a.file_name.ends_with(".png"));
    assert_eq!(a.total_frames, 1);

    let img = image::open(&a.path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (320, 120));
    // Some glyph ink made it onto the canvas.
    assert!(img.pixels().any(|p| p.0 != req.bg));

    let b = render_still_card(&req, &cfg).unwrap();
    assert_ne!(a.file_name, b.file_name);
}

#[test]
fn long_text_wraps_instead_of_overflowing() {
    let Some(font) = find_test_font() else {
        eprintln!("skipping: no usable test font found");
        return;
    };

    let dir = PathBuf::from("target").join("still_smoke_wrap");
    let _ = std::fs::remove_dir_all(&dir);

    // Narrow canvas, long text: must render without error and keep the
    // left/right padding columns clear of glyph ink.
    let mut req = CardRequest::new("The quick brown fox jumps over the lazy dog");
    req.width = 240;
    req.height = 480;
    req.font_size = 32;
    req.font_file = Some(font);
    req.shadow = [0, 0, 0, 0];
    let cfg = RenderConfig::new(&dir, "unused-default.ttf");

    let card = render_still_card(&req, &cfg).unwrap();
    let img = image::open(&card.path).unwrap().to_rgba8();

    let bg = req.bg;
    for y in 0..img.height() {
        for x in 0..8 {
            assert_eq!(img.get_pixel(x, y).0, bg, "left margin at ({x},{y})");
            let rx = img.width() - 1 - x;
            assert_eq!(img.get_pixel(rx, y).0, bg, "right margin at ({rx},{y})");
        }
    }
}
