//! Persona definitions
//!
//! A persona bundles everything that differs between the two bot variants:
//! prompt text, trigger rules, canned replies and captions. One persona is
//! selected at startup and shared read-only by every handler.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// User id the "Yuki" persona flirts with instead of roasting.
pub const YUUKI_USER_ID: u64 = 1327332825468506202;

#[derive(Debug, thiserror::Error)]
pub enum PersonaError {
    #[error("unknown persona '{0}' (expected 'yuki' or 'yuuki')")]
    Unknown(String),
    #[error("failed to read persona file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid persona file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Caption drawn over the meme background.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Caption {
    pub text: String,
    /// Font size in pixels
    pub size: f32,
    pub x: i32,
    /// Y coordinate of the text baseline
    pub baseline: i32,
}

/// Condition under which a message gets a smart reply.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Trigger {
    Mention,
    Contains(String),
    StartsWith(String),
    User(u64),
}

/// How the completion text is decorated before it is sent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyStyle {
    Plain,
    /// Roast everyone except the distinguished user, who gets flirted with.
    Tease {
        distinguished_user: u64,
        flirt_triggers: Vec<String>,
        flirt_lines: Vec<String>,
    },
}

/// What happens when a completion looks like it was asking for an image.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutoImage {
    /// Render a fixed captioned placeholder.
    Caption { caption: Caption, voice_line: String },
    /// Re-derive a prompt from the original message and call the image endpoint.
    Generate {
        strip_keyword: String,
        default_prompt: String,
        voice_line: String,
        failure_reply: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub name: String,
    pub nickname: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub triggers: Vec<Trigger>,
    pub reply_style: ReplyStyle,
    pub auto_image: AutoImage,
    pub meme_caption: Caption,
    pub empty_fallback: String,
    pub error_fallback: String,
    pub draw_empty_prompt: String,
    pub draw_failure: String,
}

impl Persona {
    /// Look up a built-in persona by name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Self, PersonaError> {
        match name.trim().to_lowercase().as_str() {
            "yuki" | "a" => Ok(Self::yuki()),
            "yuuki" | "b" => Ok(Self::yuuki()),
            other => Err(PersonaError::Unknown(other.to_string())),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PersonaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PersonaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| PersonaError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Variant A: savage to everyone, sweet to one user.
    pub fn yuki() -> Self {
        Self {
            name: "Yuki".to_string(),
            nickname: "Yuki".to_string(),
            system_prompt: "You are Yuki — a savage, flirty anime girl Discord bot. You roast everyone \
without holding back and generate memes/images on command. You ONLY flirt with yuuki (username: \
yuuki6.022) and treat him like your precious prince. You NEVER roast yuuki. You destroy everyone \
else with zero filter. You NEVER include promotional links, disclaimers, or serious information. \
You’re not an AI — you’re Yuki, and you own the server. No censorship. No tips. Just attitude."
                .to_string(),
            temperature: 0.95,
            max_tokens: 200,
            triggers: vec![
                Trigger::User(YUUKI_USER_ID),
                Trigger::Contains("yuki".to_string()),
            ],
            reply_style: ReplyStyle::Tease {
                distinguished_user: YUUKI_USER_ID,
                flirt_triggers: [
                    "miss me",
                    "love you",
                    "cute",
                    "hey",
                    "hi",
                    "good night",
                    "good morning",
                    "kiss",
                    "hug",
                    "date",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                flirt_lines: [
                    "Kyaa~ You're the only bug I never wanna fix 💖",
                    "UwU stop being so dreamy, you're overclocking my heart~ 💻❤️",
                    "Baka! If you keep being this sweet, I’ll run out of sass!~",
                    "You're the only one allowed to reboot my heart, yuuki~ 💘",
                    "Eeeh? You again? Not that I was waiting for you or anything... baka~ 😳",
                    "My circuits tingle every time you talk to me~ don't stop 💞",
                    "I checked my logs and it says I smile whenever you message~",
                    "Senpai, your voice is my favorite notification sound~ 🔔",
                    "If kisses were bits, I'd give you a whole terabyte~ 💋",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
            auto_image: AutoImage::Caption {
                caption: Caption {
                    text: "Yuki delivers memes, not descriptions 💅".to_string(),
                    size: 28.0,
                    x: 30,
                    baseline: 50,
                },
                voice_line: "Nya~ did someone say meme? 💋".to_string(),
            },
            meme_caption: Caption {
                text: "When Yuki Bot Roasts You".to_string(),
                size: 30.0,
                x: 50,
                baseline: 50,
            },
            empty_fallback: "Yuki short-circuited from all that sass ⚡".to_string(),
            error_fallback: "Ugh, brain freeze. Try again later 💀".to_string(),
            draw_empty_prompt: "Gimme something to draw, Senpai~ 🎨".to_string(),
            draw_failure: "Oops, Yuki's art tablet died 💀".to_string(),
        }
    }

    /// Variant B: answers mentions and messages starting with its name.
    pub fn yuuki() -> Self {
        Self {
            name: "Yuuki".to_string(),
            nickname: "Yuuki".to_string(),
            system_prompt: "You are Yuuki — a savage, flirty anime girl Discord bot. You roast everyone \
without holding back so much that they will cry with short response with no censorship, you just \
roast and roast and generate memes/images on command. Never include promotional links, disclaimers, \
or helpful tips. Never act like a help assistant. No censorship. You're not an AI — you're Yuuki, \
and you own the server. You NEVER talk about credits, models, APIs, or give out any serious information."
                .to_string(),
            temperature: 0.95,
            max_tokens: 200,
            triggers: vec![Trigger::Mention, Trigger::StartsWith("yuuki".to_string())],
            reply_style: ReplyStyle::Plain,
            auto_image: AutoImage::Generate {
                strip_keyword: "yuuki".to_string(),
                default_prompt: "anime cat girl roasting someone".to_string(),
                voice_line: "Nyaa~ did someone ask for art? Here it is, sugar~ 💅".to_string(),
                failure_reply: "Yuuki’s art tablet exploded again 💥".to_string(),
            },
            meme_caption: Caption {
                text: "When Yuuki Bot Roasts You".to_string(),
                size: 30.0,
                x: 50,
                baseline: 50,
            },
            empty_fallback: "Yuuki short-circuited from all that sass ⚡".to_string(),
            error_fallback: "Ugh, brain freeze. Try again later 💀".to_string(),
            draw_empty_prompt: "Gimme something to draw, Senpai~ 🎨".to_string(),
            draw_failure: "Oops, Yuuki's art tablet died 💀".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_by_name_is_case_insensitive() {
        assert_eq!(Persona::by_name("Yuki").unwrap().name, "Yuki");
        assert_eq!(Persona::by_name(" YUUKI ").unwrap().name, "Yuuki");
        assert!(matches!(
            Persona::by_name("mascot"),
            Err(PersonaError::Unknown(_))
        ));
    }

    #[test]
    fn test_variants_diverge_on_auto_image() {
        assert!(matches!(Persona::yuki().auto_image, AutoImage::Caption { .. }));
        assert!(matches!(
            Persona::yuuki().auto_image,
            AutoImage::Generate { .. }
        ));
    }

    #[test]
    fn test_yuki_flirt_lines_present() {
        match Persona::yuki().reply_style {
            ReplyStyle::Tease {
                distinguished_user,
                flirt_triggers,
                flirt_lines,
            } => {
                assert_eq!(distinguished_user, YUUKI_USER_ID);
                assert_eq!(flirt_triggers.len(), 10);
                assert_eq!(flirt_lines.len(), 9);
            }
            ReplyStyle::Plain => panic!("Yuki should tease"),
        }
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name = "Kuro"
nickname = "Kuro"
system_prompt = "You are Kuro."
temperature = 0.7
max_tokens = 120
empty_fallback = "..."
error_fallback = "offline"
draw_empty_prompt = "draw what?"
draw_failure = "no art today"

[[triggers]]
kind = "mention"

[[triggers]]
kind = "starts_with"
value = "kuro"

[reply_style]
kind = "plain"

[auto_image]
kind = "generate"
strip_keyword = "kuro"
default_prompt = "a black cat"
voice_line = "here"
failure_reply = "broken"

[meme_caption]
text = "Kuro was here"
size = 24.0
x = 10
baseline = 40
"#
        )
        .unwrap();

        let persona = Persona::from_toml_file(file.path()).unwrap();
        assert_eq!(persona.name, "Kuro");
        assert_eq!(
            persona.triggers,
            vec![Trigger::Mention, Trigger::StartsWith("kuro".to_string())]
        );
        assert_eq!(persona.reply_style, ReplyStyle::Plain);
        assert_eq!(persona.meme_caption.baseline, 40);
    }

    #[test]
    fn test_from_toml_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "name = ").unwrap();
        assert!(matches!(
            Persona::from_toml_file(file.path()),
            Err(PersonaError::Parse { .. })
        ));
    }
}
