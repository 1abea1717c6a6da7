//! Response behaviors, independent of how the answer gets delivered.

pub mod draw;
pub mod meme;
pub mod smart_reply;

/// File stems of every artifact the responders write.
pub const ARTIFACT_STEMS: [&str; 3] = [
    meme::MEME_STEM,
    draw::GENERATED_STEM,
    smart_reply::AUTOGEN_STEM,
];
