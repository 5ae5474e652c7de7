pub mod io;
pub mod mask;
pub mod rgb;
pub mod traits;

pub use self::mask::Mask;
pub use self::rgb::{OwnedFrame, RgbImageU8};
pub use self::traits::ImageView;
