//! Gateway session lifecycle: identity on connect and clean shutdown.

use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

/// Rename the bot in one guild. Failures (missing permission) are logged only.
pub async fn apply_nickname(ctx: &serenity::Context, guild_id: serenity::GuildId, nickname: &str) {
    match guild_id.edit_nickname(&ctx.http, Some(nickname)).await {
        Ok(()) => info!("Nickname set to {} in guild {}", nickname, guild_id),
        Err(e) => error!("Failed to set nickname in guild {}: {}", guild_id, e),
    }
}

/// Rename the bot in every guild it was in when the session became ready.
pub async fn apply_nickname_everywhere(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    nickname: &str,
) {
    for guild in &ready.guilds {
        apply_nickname(ctx, guild.id, nickname).await;
    }
}

/// Close every shard when the process receives Ctrl-C.
pub fn shutdown_on_ctrl_c(shard_manager: Arc<serenity::ShardManager>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Ctrl-C received, shutting down...");
        shard_manager.shutdown_all().await;
    });
}
