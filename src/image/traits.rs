/// Read-only access to an interleaved, row-major image buffer.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Interleaved samples per pixel.
    fn channels(&self) -> usize;

    /// Samples of row `y`, `width() * channels()` long.
    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// All samples of the pixel at (x, y).
    #[inline]
    fn pixel(&self, x: usize, y: usize) -> &[Self::Pixel] {
        let c = self.channels();
        &self.row(y)[x * c..(x + 1) * c]
    }
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
