use crate::artifact::Artifact;
use crate::Data;
use tracing::{error, info};

pub const GENERATED_STEM: &str = "generated";

pub enum DrawOutcome {
    /// Nothing to draw; reply with this text.
    NeedPrompt(String),
    Image(Artifact),
    /// Generation failed; reply with this apology.
    Failed(String),
}

/// Handle `!draw <prompt>`.
pub async fn draw(data: &Data, prompt: &str) -> DrawOutcome {
    if prompt.trim().is_empty() {
        return DrawOutcome::NeedPrompt(data.persona.draw_empty_prompt.clone());
    }

    match generate(data, prompt, GENERATED_STEM).await {
        Ok(artifact) => DrawOutcome::Image(artifact),
        Err(e) => {
            error!("Draw failed for prompt '{}': {}", prompt, e);
            DrawOutcome::Failed(data.persona.draw_failure.clone())
        }
    }
}

/// Call the image endpoint and store the returned bytes unmodified.
pub async fn generate(data: &Data, prompt: &str, stem: &str) -> anyhow::Result<Artifact> {
    let bytes = data.image_gen.generate(prompt).await?;
    let artifact = data.artifacts.write(stem, &bytes)?;
    info!("Stored generated image ({} bytes) at {:?}", bytes.len(), artifact.path());
    Ok(artifact)
}
