use crate::artifact::Artifact;
use crate::config::DISCORD_MESSAGE_LIMIT;
use crate::responders::draw::{self, DrawOutcome};
use crate::responders::meme;
use crate::responders::smart_reply::{self, Sender, SmartOutcome};
use crate::router::{self, Inbound, Route};
use crate::{session, voice, Data, Error};
use poise::serenity_prelude as serenity;
use tracing::{error, info};

pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            handle_message(ctx, new_message, data).await?;
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if is_new.unwrap_or(false) {
                info!("Joined new guild {}", guild.name);
                session::apply_nickname(ctx, guild.id, &data.persona.nickname).await;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Route a message and run the matching responder.
pub async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let roles = bot_roles(ctx, message.guild_id, data.bot_id);
    let inbound = Inbound::from_message(message, data.bot_id, &roles);

    match router::route(&data.persona, &inbound) {
        Route::Ignore => {}
        Route::Meme => {
            info!("Meme requested by {} in channel {}", message.author.name, message.channel_id);
            match meme::render(data, &data.persona.meme_caption, meme::MEME_STEM).await {
                Ok(artifact) => send_image(ctx, message.channel_id, &artifact).await?,
                Err(e) => error!("Meme render failed: {}", e),
            }
        }
        Route::Draw { prompt } => {
            info!("Draw requested by {}: {}", message.author.name, prompt);
            match draw::draw(data, &prompt).await {
                DrawOutcome::NeedPrompt(text) | DrawOutcome::Failed(text) => {
                    message.reply(&ctx.http, text).await?;
                }
                DrawOutcome::Image(artifact) => {
                    send_image(ctx, message.channel_id, &artifact).await?
                }
            }
        }
        Route::SmartReply => handle_smart_reply(ctx, message, data).await?,
    }

    Ok(())
}

/// Roles the bot holds in `guild_id`, including its managed integration role.
fn bot_roles(
    ctx: &serenity::Context,
    guild_id: Option<serenity::GuildId>,
    bot_id: u64,
) -> Vec<serenity::RoleId> {
    let Some(guild) = guild_id.and_then(|id| ctx.cache.guild(id)) else {
        return Vec::new();
    };
    let bot = serenity::UserId::new(bot_id);

    let mut roles = guild
        .members
        .get(&bot)
        .map(|member| member.roles.clone())
        .unwrap_or_default();
    roles.extend(
        guild
            .roles
            .values()
            .filter(|role| role.tags.bot_id == Some(bot))
            .map(|role| role.id),
    );
    roles.sort();
    roles.dedup();
    roles
}

async fn handle_smart_reply(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    info!(
        "Smart reply for {} in channel {}: {}",
        message.author.name, message.channel_id, message.content
    );

    let sender = Sender {
        id: message.author.id.get(),
        username: message.author.name.clone(),
    };

    let typing = message.channel_id.start_typing(&ctx.http);
    let outcome = smart_reply::respond(data, &sender, &message.content).await;
    drop(typing);

    match outcome {
        SmartOutcome::Text(text) => {
            // Speech runs on its own task alongside the text reply.
            voice::spawn_speak(
                ctx.clone(),
                message.guild_id,
                message.author.id,
                text.clone(),
                data.voice_settings(),
            );
            send_reply(ctx, message, &text).await?;
        }
        SmartOutcome::Image {
            artifact,
            voice_line,
        } => {
            send_image(ctx, message.channel_id, &artifact).await?;
            voice::spawn_speak(
                ctx.clone(),
                message.guild_id,
                message.author.id,
                voice_line,
                data.voice_settings(),
            );
        }
        SmartOutcome::Failed(text) => {
            message.reply(&ctx.http, text).await?;
        }
    }

    Ok(())
}

/// Post an artifact as a plain channel message (not a reply).
pub async fn send_image(
    ctx: &serenity::Context,
    channel_id: serenity::ChannelId,
    artifact: &Artifact,
) -> Result<(), Error> {
    let attachment = artifact.attachment().await?;
    channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().add_file(attachment))
        .await?;
    Ok(())
}

/// Reply to `message`, continuing in follow-up messages past Discord's limit.
pub async fn send_reply(
    ctx: &serenity::Context,
    message: &serenity::Message,
    text: &str,
) -> Result<(), Error> {
    let mut chunks = split_message(text, DISCORD_MESSAGE_LIMIT).into_iter();

    if let Some(first) = chunks.next() {
        message.reply(&ctx.http, first).await?;
    }
    for chunk in chunks {
        message.channel_id.say(&ctx.http, chunk).await?;
    }

    Ok(())
}

/// Split on character boundaries into pieces of at most `limit` characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
