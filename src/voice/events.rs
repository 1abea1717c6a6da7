use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use songbird::{Event, EventContext, EventHandler as VoiceEventHandler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Leaves the voice channel once the last queued clip has finished.
#[derive(Clone)]
pub struct IdleLeaver {
    pub guild_id: serenity::GuildId,
    pub manager: Arc<songbird::Songbird>,
    pub idle_grace: Duration,
}

#[async_trait]
impl VoiceEventHandler for IdleLeaver {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(_) = ctx {
            let manager = self.manager.clone();
            let guild_id = self.guild_id;
            let idle_grace = self.idle_grace;

            // The queue drops the finished track in its own handler; re-check after a grace period.
            tokio::spawn(async move {
                tokio::time::sleep(idle_grace).await;

                let Some(handler_lock) = manager.get(guild_id) else {
                    return;
                };
                let idle = handler_lock.lock().await.queue().is_empty();

                if idle {
                    info!("Playback idle in guild {}, leaving channel.", guild_id);
                    if let Err(e) = manager.remove(guild_id).await {
                        debug!("Voice call in guild {} already gone: {}", guild_id, e);
                    }
                } else {
                    debug!("Guild {} still has queued speech, staying.", guild_id);
                }
            });
        }
        None
    }
}
