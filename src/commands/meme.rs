use crate::responders::meme::{self as memes, MemeOutcome};
use crate::{Context, Error};

/// Post the persona's roast meme
#[poise::command(slash_command)]
pub async fn meme(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    match memes::roast_meme(ctx.data()).await {
        MemeOutcome::Image(artifact) => {
            let attachment = artifact.attachment().await?;
            ctx.send(poise::CreateReply::default().attachment(attachment))
                .await?;
        }
        MemeOutcome::Failed(text) => {
            ctx.say(text).await?;
        }
    }

    Ok(())
}
