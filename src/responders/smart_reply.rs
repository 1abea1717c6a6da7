use crate::artifact::Artifact;
use crate::persona::{AutoImage, Persona, ReplyStyle};
use crate::responders::{draw, meme};
use crate::Data;
use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{error, info};

pub const AUTOGEN_STEM: &str = "autogen_meme";

static IMAGE_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)image:|caption:|\[.*?\]").expect("valid regex"));

static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?\d+>").expect("valid regex"));

/// Who sent the message being answered.
#[derive(Debug, Clone)]
pub struct Sender {
    pub id: u64,
    pub username: String,
}

pub enum SmartOutcome {
    /// Reply with text and speak the same text.
    Text(String),
    /// Post an image instead and speak a fixed line.
    Image {
        artifact: Artifact,
        voice_line: String,
    },
    /// Image path failed; reply with this text and stay quiet.
    Failed(String),
}

/// Decorate the model's answer according to the persona's reply style.
pub fn compose_reply<R: Rng + ?Sized>(
    persona: &Persona,
    sender: &Sender,
    content_lower: &str,
    completion: &str,
    rng: &mut R,
) -> String {
    match &persona.reply_style {
        ReplyStyle::Plain => completion.to_string(),
        ReplyStyle::Tease {
            distinguished_user,
            flirt_triggers,
            flirt_lines,
        } => {
            if sender.id != *distinguished_user {
                return format!("Oh shut it, {} — {}", sender.username, completion);
            }

            let flirty = flirt_triggers
                .iter()
                .any(|trigger| content_lower.contains(trigger.as_str()));

            match flirt_lines.choose(rng) {
                Some(line) if flirty => format!("{} {}", line, completion),
                _ => completion.to_string(),
            }
        }
    }
}

/// Heuristic for completions that describe an image instead of being a reply.
pub fn looks_like_image_request(text: &str) -> bool {
    IMAGE_REQUEST.is_match(text)
}

/// Image prompt from the original message: mentions and the persona's name removed.
pub fn derive_image_prompt(original: &str, strip_keyword: &str, default_prompt: &str) -> String {
    let without_mentions = USER_MENTION.replace_all(original, "");
    let prompt = if strip_keyword.is_empty() {
        without_mentions.trim().to_string()
    } else {
        let keyword = Regex::new(&format!("(?i){}", regex::escape(strip_keyword)));
        match keyword {
            Ok(keyword) => keyword.replace_all(&without_mentions, "").trim().to_string(),
            Err(_) => without_mentions.trim().to_string(),
        }
    };

    if prompt.is_empty() {
        default_prompt.to_string()
    } else {
        prompt
    }
}

/// Produce the bot's answer to a message that triggered a smart reply.
pub async fn respond(data: &Data, sender: &Sender, original: &str) -> SmartOutcome {
    let persona = &data.persona;
    let completion = data.completion.complete(persona, original).await;

    let reply = compose_reply(
        persona,
        sender,
        &original.to_lowercase(),
        &completion,
        &mut rand::rng(),
    );

    if !looks_like_image_request(&reply) {
        return SmartOutcome::Text(reply);
    }

    info!("Completion for {} looks like an image request", sender.username);

    match &persona.auto_image {
        AutoImage::Caption {
            caption,
            voice_line,
        } => match meme::render(data, caption, AUTOGEN_STEM).await {
            Ok(artifact) => SmartOutcome::Image {
                artifact,
                voice_line: voice_line.clone(),
            },
            Err(e) => {
                error!("Auto meme render failed: {}", e);
                SmartOutcome::Failed(persona.error_fallback.clone())
            }
        },
        AutoImage::Generate {
            strip_keyword,
            default_prompt,
            voice_line,
            failure_reply,
        } => {
            let prompt = derive_image_prompt(original, strip_keyword, default_prompt);
            match draw::generate(data, &prompt, AUTOGEN_STEM).await {
                Ok(artifact) => SmartOutcome::Image {
                    artifact,
                    voice_line: voice_line.clone(),
                },
                Err(e) => {
                    error!("Auto image generation failed for '{}': {}", prompt, e);
                    SmartOutcome::Failed(failure_reply.clone())
                }
            }
        }
    }
}
