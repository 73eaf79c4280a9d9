use crate::image::{BinaryMask, PixelImage};

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
];

/// Mark every foreground pixel 8-connected to a foreground seed.
///
/// A pixel is foreground when all of its color channels exceed `min_pixel`.
/// Seeds are visited in row-major order; pixels already marked by an earlier
/// region are not revisited. Growth uses an explicit stack so region size is
/// bounded only by memory.
pub fn trace_mask(image: &PixelImage, min_pixel: u8) -> BinaryMask {
    let mut mask = BinaryMask::new(image.w, image.h);
    let mut stack: Vec<usize> = Vec::with_capacity(64);
    for y in 0..image.h {
        for x in 0..image.w {
            if mask.is_set(x, y) || !image.is_foreground(x, y, min_pixel) {
                continue;
            }
            mask.set(x, y);
            stack.push(mask.idx(x, y));
            grow_region(image, min_pixel, &mut mask, &mut stack);
        }
    }
    mask
}

fn grow_region(image: &PixelImage, min_pixel: u8, mask: &mut BinaryMask, stack: &mut Vec<usize>) {
    let (w, h) = (image.w as isize, image.h as isize);
    while let Some(idx) = stack.pop() {
        let x = (idx % image.w) as isize;
        let y = (idx / image.w) as isize;
        for (dx, dy) in NEIGH_OFFSETS {
            let xn = x + dx;
            let yn = y + dy;
            if xn < 0 || yn < 0 || xn >= w || yn >= h {
                continue;
            }
            let (nx, ny) = (xn as usize, yn as usize);
            if mask.is_set(nx, ny) || !image.is_foreground(nx, ny, min_pixel) {
                continue;
            }
            mask.set(nx, ny);
            stack.push(mask.idx(nx, ny));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with(w: usize, h: usize, lit: &[(usize, usize)]) -> PixelImage {
        let mut img = PixelImage::new(w, h, 3);
        for &(x, y) in lit {
            img.set_color(x, y, [200, 200, 200]);
        }
        img
    }

    #[test]
    fn diagonal_neighbors_are_connected() {
        let img = image_with(4, 4, &[(0, 0), (1, 1), (2, 2)]);
        let mask = trace_mask(&img, 5);
        assert_eq!(mask.count_ones(), 3);
        assert!(mask.is_set(2, 2));
        assert!(!mask.is_set(1, 0));
    }

    #[test]
    fn pixel_with_one_dark_channel_is_background() {
        let mut img = image_with(3, 1, &[(0, 0), (2, 0)]);
        img.set_color(1, 0, [200, 5, 200]);
        let mask = trace_mask(&img, 5);
        assert!(!mask.is_set(1, 0));
        assert_eq!(mask.count_ones(), 2);
    }

    #[test]
    fn large_region_does_not_exhaust_the_stack() {
        let (w, h) = (400, 300);
        let lit: Vec<_> = (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).collect();
        let mask = trace_mask(&image_with(w, h, &lit), 5);
        assert_eq!(mask.count_ones(), w * h);
    }
}
