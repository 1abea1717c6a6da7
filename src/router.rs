//! Message routing
//!
//! Decides which responder, if any, handles an inbound message. Routing is
//! pure: it only looks at the message metadata and the active persona.

use crate::persona::{Persona, Trigger};
use poise::serenity_prelude as serenity;

pub const MEME_KEYWORD: &str = "!meme";
pub const DRAW_PREFIX: &str = "!draw";

/// The parts of a message the router cares about.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub author_id: u64,
    pub author_is_bot: bool,
    pub via_webhook: bool,
    /// Lower-cased message text
    pub content: String,
    pub mentions_bot: bool,
}

impl Inbound {
    /// `bot_roles` are the roles the bot holds in the message's guild; pinging one
    /// of them counts as mentioning the bot.
    pub fn from_message(
        message: &serenity::Message,
        bot_id: u64,
        bot_roles: &[serenity::RoleId],
    ) -> Self {
        Self {
            author_id: message.author.id.get(),
            author_is_bot: message.author.bot,
            via_webhook: message.webhook_id.is_some(),
            content: message.content.to_lowercase(),
            mentions_bot: message.mention_everyone
                || message
                    .mentions
                    .iter()
                    .any(|user| user.id.get() == bot_id)
                || message
                    .mention_roles
                    .iter()
                    .any(|role| bot_roles.contains(role)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Ignore,
    Meme,
    Draw { prompt: String },
    SmartReply,
}

pub fn route(persona: &Persona, inbound: &Inbound) -> Route {
    if inbound.author_is_bot || inbound.via_webhook {
        return Route::Ignore;
    }

    let content = inbound.content.as_str();

    if content.contains(MEME_KEYWORD) {
        return Route::Meme;
    }

    if let Some(rest) = content.strip_prefix(DRAW_PREFIX) {
        return Route::Draw {
            prompt: rest.trim().to_string(),
        };
    }

    if persona
        .triggers
        .iter()
        .any(|trigger| trigger_matches(trigger, inbound))
    {
        return Route::SmartReply;
    }

    Route::Ignore
}

fn trigger_matches(trigger: &Trigger, inbound: &Inbound) -> bool {
    match trigger {
        Trigger::Mention => inbound.mentions_bot,
        Trigger::Contains(keyword) => inbound.content.contains(&keyword.to_lowercase()),
        Trigger::StartsWith(keyword) => inbound.content.starts_with(&keyword.to_lowercase()),
        Trigger::User(id) => inbound.author_id == *id,
    }
}
