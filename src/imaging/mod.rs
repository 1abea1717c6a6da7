pub mod caption;
pub mod generate;

pub use caption::CaptionRenderer;
pub use generate::{ImageGenClient, ImageGenError};
