pub mod events;
pub mod speaker;

pub use speaker::{spawn_speak, speak, VoiceSettings};
