pub mod artifact;
pub mod commands;
pub mod config;
pub mod handler;
pub mod imaging;
pub mod llm;
pub mod persona;
pub mod responders;
pub mod router;
pub mod session;
pub mod tts;
pub mod voice;

use std::time::Duration;

/// Custom data passed to all commands and event handlers
pub struct Data {
    pub config: config::Config,
    pub persona: persona::Persona,
    pub http_client: reqwest::Client,
    pub completion: llm::CompletionClient,
    pub image_gen: imaging::ImageGenClient,
    pub captions: imaging::CaptionRenderer,
    pub artifacts: artifact::ArtifactStore,
    /// Bot's own user ID for mention detection
    pub bot_id: u64,
}

impl Data {
    pub fn new(
        config: config::Config,
        persona: persona::Persona,
        bot_id: u64,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::new();

        Ok(Self {
            completion: llm::CompletionClient::new(&config)?,
            image_gen: imaging::ImageGenClient::new(&config)?,
            captions: imaging::CaptionRenderer::new(
                http_client.clone(),
                config.meme_background_url.clone(),
                config.caption_font_path.clone().map(Into::into),
            ),
            artifacts: artifact::ArtifactStore::new(config.artifact_dir.clone()),
            http_client,
            config,
            persona,
            bot_id,
        })
    }

    pub fn voice_settings(&self) -> voice::VoiceSettings {
        voice::VoiceSettings {
            tts: tts::TtsOptions {
                host: self.config.tts_host.clone(),
                lang: self.config.tts_lang.clone(),
                slow: self.config.tts_slow,
            },
            idle_grace: Duration::from_secs(self.config.voice_idle_timeout_secs),
            http_client: self.http_client.clone(),
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
