use crate::responders::draw::{self as drawing, DrawOutcome};
use crate::{Context, Error};

/// Generate an image from a prompt
#[poise::command(slash_command)]
pub async fn draw(
    ctx: Context<'_>,
    #[description = "What should be drawn"] prompt: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let prompt = prompt.to_lowercase();
    match drawing::draw(ctx.data(), prompt.trim()).await {
        DrawOutcome::NeedPrompt(text) | DrawOutcome::Failed(text) => {
            ctx.say(text).await?;
        }
        DrawOutcome::Image(artifact) => {
            let attachment = artifact.attachment().await?;
            ctx.send(poise::CreateReply::default().attachment(attachment))
                .await?;
        }
    }

    Ok(())
}
