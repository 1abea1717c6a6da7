use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub persona: String,
    pub persona_file: Option<String>,
    pub completion_url: String,
    pub completion_model: String,
    pub completion_api_key: Option<String>,
    pub image_api_url: String,
    pub image_api_key: Option<String>,
    pub meme_background_url: String,
    /// Overrides the bundled caption font
    pub caption_font_path: Option<String>,
    pub artifact_dir: String,
    pub tts_host: String,
    pub tts_lang: String,
    pub tts_slow: bool,
    // Timeout settings
    pub llm_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub voice_idle_timeout_secs: u64,
    pub register_commands: bool,
    pub dev_guild_id: Option<u64>,
}

const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_COMPLETION_MODEL: &str = "meta-llama/llama-3-8b-instruct";
const DEFAULT_IMAGE_API_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-2";
const DEFAULT_MEME_BACKGROUND_URL: &str = "https://i.imgur.com/zvWTUVu.jpg";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .or_else(|_| env::var("TOKEN"))
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN (or TOKEN) must be set"))?,
            persona: env::var("PERSONA").unwrap_or_else(|_| "yuki".to_string()),
            persona_file: env::var("PERSONA_FILE").ok(),
            completion_url: env::var("COMPLETION_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_URL.to_string()),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string()),
            completion_api_key: env::var("OPENROUTER_API_KEY").ok(),
            image_api_url: env::var("IMAGE_API_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_API_URL.to_string()),
            image_api_key: env::var("HUGGINGFACE_API_KEY").ok(),
            meme_background_url: env::var("MEME_BACKGROUND_URL")
                .unwrap_or_else(|_| DEFAULT_MEME_BACKGROUND_URL.to_string()),
            caption_font_path: env::var("CAPTION_FONT_PATH").ok(),
            artifact_dir: env::var("ARTIFACT_DIR").unwrap_or_else(|_| "/tmp/yukibot".to_string()),
            tts_host: env::var("TTS_HOST")
                .unwrap_or_else(|_| "https://translate.google.com".to_string()),
            tts_lang: env::var("TTS_LANG").unwrap_or_else(|_| "en".to_string()),
            tts_slow: env::var("TTS_SLOW")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap_or(120),
            image_timeout_secs: env::var("IMAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
            voice_idle_timeout_secs: env::var("VOICE_IDLE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            register_commands: env::var("REGISTER_COMMANDS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            dev_guild_id: env::var("DEV_GUILD_ID").ok().and_then(|id| id.parse().ok()),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("persona", &self.persona)
            .field("persona_file", &self.persona_file)
            .field("completion_url", &self.completion_url)
            .field("completion_model", &self.completion_model)
            .field(
                "completion_api_key",
                &self.completion_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("image_api_url", &self.image_api_url)
            .field(
                "image_api_key",
                &self.image_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("meme_background_url", &self.meme_background_url)
            .field("caption_font_path", &self.caption_font_path)
            .field("artifact_dir", &self.artifact_dir)
            .field("tts_host", &self.tts_host)
            .field("tts_lang", &self.tts_lang)
            .field("tts_slow", &self.tts_slow)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("voice_idle_timeout_secs", &self.voice_idle_timeout_secs)
            .field("register_commands", &self.register_commands)
            .field("dev_guild_id", &self.dev_guild_id)
            .finish()
    }
}

/// Discord message limit is 2000 characters
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;
