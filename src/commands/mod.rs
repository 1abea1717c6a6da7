pub mod draw;
pub mod meme;
