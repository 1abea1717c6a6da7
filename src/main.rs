use poise::serenity_prelude as serenity;
use songbird::serenity::SerenityInit;
use tracing::{error, info, warn};
use yukibot::commands::{draw, meme};
use yukibot::responders::ARTIFACT_STEMS;
use yukibot::{config::Config, handler, persona::Persona, session, Data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let persona = match &config.persona_file {
        Some(path) => Persona::from_toml_file(path)?,
        None => Persona::by_name(&config.persona)?,
    };
    info!("Loaded persona {}", persona.name);
    let discord_token = config.discord_token.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![meme::meme(), draw::draw()],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(handler::handle_event(ctx, event, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("{} online as {}", persona.name, ready.user.name);

                if config.register_commands {
                    let commands = &framework.options().commands;
                    match config.dev_guild_id {
                        Some(guild_id) => {
                            poise::builtins::register_in_guild(
                                ctx,
                                commands,
                                serenity::GuildId::new(guild_id),
                            )
                            .await?
                        }
                        None => poise::builtins::register_globally(ctx, commands).await?,
                    }
                }

                session::apply_nickname_everywhere(ctx, ready, &persona.nickname).await;

                let data = Data::new(config, persona, ready.user.id.get())?;
                match data
                    .artifacts
                    .sweep(&ARTIFACT_STEMS, std::time::Duration::ZERO)
                {
                    Ok(0) => {}
                    Ok(n) => info!("Removed {} stale artifact(s) from {:?}", n, data.artifacts.dir()),
                    Err(e) => warn!("Artifact sweep failed: {}", e),
                }

                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let mut client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .register_songbird()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    session::shutdown_on_ctrl_c(client.shard_manager.clone());

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
        return Err(why.into());
    }

    info!("Bot stopped");
    Ok(())
}
