use anomaly_patches::image::io::save_rgb_png;
use anomaly_patches::image::PixelImage;
use std::ops::Range;
use std::path::Path;

/// Fully lit RGB scene with a mild checker texture, never below intensity 40.
pub fn lit_scene(width: usize, height: usize, cell: usize) -> PixelImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = PixelImage::new(width, height, 3);
    for y in 0..height {
        for x in 0..width {
            let v = if ((x / cell) + (y / cell)) & 1 == 0 { 40 } else { 200 };
            img.set_color(x, y, [v, v, v]);
        }
    }
    img
}

/// Black image with a single lit rectangle, as an anomaly-only exemplar.
pub fn exemplar(width: usize, height: usize, rows: Range<usize>, cols: Range<usize>) -> PixelImage {
    let mut img = PixelImage::new(width, height, 3);
    for y in rows {
        for x in cols.clone() {
            img.set_color(x, y, [230, 30, 30]);
        }
    }
    img
}

pub fn write_png(dir: &Path, name: &str, image: &PixelImage) {
    save_rgb_png(image, &dir.join(name)).expect("failed to write synthetic image");
}
