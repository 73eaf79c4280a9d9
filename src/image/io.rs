//! I/O helpers for color images, masks and JSON.
//!
//! - `load_image`: read a PNG/JPEG into an owned RGB or RGBA buffer.
//! - `save_rgb_png`: write an RGB `PixelImage` to disk.
//! - `save_mask_png`: write a `BinaryMask` as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{BinaryMask, ImageView, PixelImage};
use crate::error::{PrepError, Result};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Decode `dir/name`. Alpha is kept when the file carries it.
pub fn load_image(dir: &Path, name: &str) -> Result<PixelImage> {
    load_image_path(&dir.join(name))
}

pub fn load_image_path(path: &Path) -> Result<PixelImage> {
    let decoded = image::open(path).map_err(|source| PrepError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    from_dynamic(decoded)
}

/// Convert a decoded image; grayscale inputs are expanded to RGB.
pub fn from_dynamic(decoded: DynamicImage) -> Result<PixelImage> {
    if decoded.color().has_alpha() {
        let rgba = decoded.into_rgba8();
        let (w, h) = (rgba.width() as usize, rgba.height() as usize);
        PixelImage::from_raw(w, h, 4, rgba.into_raw())
    } else {
        let rgb = decoded.into_rgb8();
        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        PixelImage::from_raw(w, h, 3, rgb.into_raw())
    }
}

/// Save the color channels of `image` as an RGB PNG.
pub fn save_rgb_png(image: &PixelImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let rgb = if image.channels == 3 {
        image.data.clone()
    } else {
        image.clone().into_rgb().data
    };
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(image.w as u32, image.h as u32, rgb)
            .ok_or_else(|| PrepError::config("failed to create RGB image buffer"))?;
    buffer.save(path).map_err(|source| PrepError::Save {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a mask with set pixels white and the rest black.
pub fn save_mask_png(mask: &BinaryMask, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.w as u32, mask.h as u32);
    for (y, row) in mask.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([if v != 0 { 255 } else { 0 }]));
        }
    }
    out.save(path).map_err(|source| PrepError::Save {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| PrepError::io(path, e))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PrepError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let mut img = PixelImage::new(3, 2, 3);
        img.set_color(2, 1, [10, 200, 30]);
        let path = dir.path().join("nested").join("img.png");
        save_rgb_png(&img, &path).unwrap();

        let loaded = load_image(&dir.path().join("nested"), "img.png").unwrap();
        assert_eq!(loaded, img);
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path(), "absent.png").unwrap_err();
        assert!(matches!(err, PrepError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        let err = load_image(dir.path(), "bad.png").unwrap_err();
        assert!(matches!(err, PrepError::Decode { .. }), "got {err:?}");
    }
}
