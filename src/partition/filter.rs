use crate::image::PixelImage;
use crate::splice::Splice;

/// Fraction of the splice's pixels where not every color channel exceeds
/// `min_pixel`.
///
/// The splice must be non-empty and inside the image.
pub fn background_ratio(image: &PixelImage, splice: &Splice, min_pixel: u8) -> f64 {
    let dark = splice
        .rows
        .clone()
        .map(|y| {
            splice
                .cols
                .clone()
                .filter(|&x| !image.is_foreground(x, y, min_pixel))
                .count()
        })
        .sum::<usize>();
    dark as f64 / splice.area() as f64
}

/// Keep the patch iff its background ratio is strictly below `threshold`.
pub fn keep_patch(image: &PixelImage, splice: &Splice, min_pixel: u8, threshold: f64) -> bool {
    background_ratio(image, splice, min_pixel) < threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x1 strip with the first `dark` pixels black.
    fn strip(dark: usize) -> PixelImage {
        let mut img = PixelImage::new(5, 1, 3);
        for x in dark..5 {
            img.set_color(x, 0, [90, 90, 90]);
        }
        img
    }

    #[test]
    fn ratio_counts_dark_pixels() {
        let splice = Splice::new(0..1, 0..5);
        assert_eq!(background_ratio(&strip(0), &splice, 5), 0.0);
        assert_eq!(background_ratio(&strip(2), &splice, 5), 0.4);
        assert_eq!(background_ratio(&strip(5), &splice, 5), 1.0);
    }

    #[test]
    fn threshold_is_strict() {
        let splice = Splice::new(0..1, 0..5);
        let img = strip(4); // ratio 0.8
        assert!(!keep_patch(&img, &splice, 5, 0.8));
        assert!(keep_patch(&img, &splice, 5, 0.8 + 1e-9));
        assert!(keep_patch(&strip(3), &splice, 5, 0.8));
    }

    #[test]
    fn pixel_at_min_pixel_counts_as_background() {
        let mut img = PixelImage::new(2, 1, 3);
        img.set_color(0, 0, [5, 200, 200]);
        img.set_color(1, 0, [6, 6, 6]);
        let splice = Splice::new(0..1, 0..2);
        assert_eq!(background_ratio(&img, &splice, 5), 0.5);
    }
}
