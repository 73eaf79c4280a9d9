mod common;

use anomaly_patches::image::PixelImage;
use anomaly_patches::reference::trace_mask;
use anomaly_patches::{ImageCatalog, ReferenceSet};
use common::synthetic_image::{exemplar, write_png};

/// Exemplar with a lit blob, a diagonal tail, and sub-threshold noise.
fn noisy_exemplar() -> PixelImage {
    let mut img = exemplar(64, 48, 10..20, 12..30);
    for i in 0..10 {
        img.set_color(30 + i, 20 + i, [90, 90, 90]);
    }
    for y in 0..48 {
        for x in 0..64 {
            if img.color(x, y)[0] == 0 && (x * 7 + y * 3) % 5 == 0 {
                img.set_color(x, y, [5, 4, 3]);
            }
        }
    }
    img
}

#[test]
fn mask_never_marks_background_pixels() {
    let img = noisy_exemplar();
    let mask = trace_mask(&img, 5);
    for y in 0..img.h {
        for x in 0..img.w {
            assert_eq!(
                mask.is_set(x, y),
                img.is_foreground(x, y, 5),
                "pixel ({x}, {y})"
            );
        }
    }
    assert_eq!(mask.count_ones(), 10 * 18 + 10);
}

#[test]
fn mask_covers_very_large_region() {
    let img = exemplar(512, 512, 0..512, 0..512);
    let mask = trace_mask(&img, 5);
    assert_eq!(mask.count_ones(), 512 * 512);
}

#[test]
fn exemplar_on_disk_traces_like_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "cam_Tires_t42_anomaly_only_view.png", &noisy_exemplar());
    write_png(dir.path(), "cam_Tires_t42.png", &noisy_exemplar());

    let catalog = ImageCatalog::from_dir(dir.path()).unwrap();
    let refs = ReferenceSet::build(dir.path(), &catalog, 5);
    let mask = refs.require("t42").unwrap();
    assert_eq!((mask.w, mask.h), (64, 48));
    assert_eq!(mask.count_ones(), 190);
}
