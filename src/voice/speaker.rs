use crate::tts::{self, TtsOptions};
use crate::voice::events::IdleLeaver;
use poise::serenity_prelude as serenity;
use songbird::input::HttpRequest;
use songbird::{Event, TrackEvent};
use std::time::Duration;
use tracing::info;

/// Everything a detached speech task needs.
#[derive(Clone)]
pub struct VoiceSettings {
    pub tts: TtsOptions,
    pub idle_grace: Duration,
    pub http_client: reqwest::Client,
}

/// The voice channel `user_id` is currently connected to, if any.
pub fn user_voice_channel(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> Option<serenity::ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;
    guild
        .voice_states
        .get(&user_id)
        .and_then(|vs| vs.channel_id)
}

/// Speak `text` in the sender's voice channel.
///
/// Returns `Ok(false)` without doing anything when the sender is not in voice.
pub async fn speak(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    text: &str,
    settings: &VoiceSettings,
) -> anyhow::Result<bool> {
    let Some(channel_id) = user_voice_channel(ctx, guild_id, user_id) else {
        return Ok(false);
    };

    let urls = tts::audio_urls(text, &settings.tts)?;

    let manager = songbird::get(ctx)
        .await
        .ok_or_else(|| anyhow::anyhow!("Songbird Voice client not initialized"))?;

    let handler_lock = manager.join(guild_id, channel_id).await?;
    let mut handler = handler_lock.lock().await;

    let leaver = IdleLeaver {
        guild_id,
        manager: manager.clone(),
        idle_grace: settings.idle_grace,
    };

    let clips = urls.len();
    for url in urls {
        let source = HttpRequest::new(settings.http_client.clone(), url.to_string());
        let track = handler.enqueue_input(source.into()).await;
        track.add_event(Event::Track(TrackEvent::End), leaver.clone())?;
        track.add_event(Event::Track(TrackEvent::Error), leaver.clone())?;
    }

    info!(
        "Speaking {} clip(s) in channel {} of guild {}",
        clips, channel_id, guild_id
    );
    Ok(true)
}

/// Fire-and-forget variant used next to a text reply.
pub fn spawn_speak(
    ctx: serenity::Context,
    guild_id: Option<serenity::GuildId>,
    user_id: serenity::UserId,
    text: String,
    settings: VoiceSettings,
) {
    let Some(guild_id) = guild_id else {
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = speak(&ctx, guild_id, user_id, &text, &settings).await {
            tracing::warn!("Voice playback failed in guild {}: {}", guild_id, e);
        }
    });
}
