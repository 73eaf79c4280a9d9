pub mod io;
pub mod mask;
pub mod pixels;
pub mod traits;

pub use self::mask::BinaryMask;
pub use self::pixels::PixelImage;
pub use self::traits::{ImageView, Rows};
