use crate::artifact::Artifact;
use crate::persona::Caption;
use crate::Data;
use tracing::{error, info};

pub const MEME_STEM: &str = "meme";

pub enum MemeOutcome {
    Image(Artifact),
    /// Persona line for a caller that must answer, the cause is only logged.
    Failed(String),
}

/// Render `caption` over the meme background and store it as `<stem>.png`.
pub async fn render(data: &Data, caption: &Caption, stem: &str) -> anyhow::Result<Artifact> {
    let png = data.captions.render(caption).await?;
    let artifact = data.artifacts.write(stem, &png)?;
    info!("Rendered meme '{}' to {:?}", caption.text, artifact.path());
    Ok(artifact)
}

/// The persona's roast meme, or a persona line when rendering fails.
pub async fn roast_meme(data: &Data) -> MemeOutcome {
    match render(data, &data.persona.meme_caption, MEME_STEM).await {
        Ok(artifact) => MemeOutcome::Image(artifact),
        Err(e) => {
            error!("Meme render failed: {:#}", e);
            MemeOutcome::Failed(data.persona.error_fallback.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;
    use httpmock::Method::GET;
    use httpmock::MockServer;

    #[tokio::test]
    async fn test_render_stores_one_captioned_png() {
        let server = MockServer::start_async().await;
        let background = server
            .mock_async(|when, then| {
                when.method(GET).path("/bg.png");
                then.status(200)
                    .header("content-type", "image/png")
                    .body(crate::test_support::background_png());
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = crate::test_support::config(&server.base_url(), dir.path());
        let data = Data::new(config, Persona::yuki(), 1).unwrap();

        let artifact = render(&data, &data.persona.meme_caption, MEME_STEM)
            .await
            .unwrap();
        assert_eq!(artifact.file_name(), "meme.png");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let image = image::open(artifact.path()).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (700, 250));
        // Caption ink sits left of x=400 on the baseline row band
        assert!(image
            .enumerate_pixels()
            .any(|(x, y, p)| x < 400 && (20..=50).contains(&y) && p.0[..3].iter().all(|&c| c >= 250)));
        background.assert_async().await;
    }

    #[tokio::test]
    async fn test_render_failure_leaves_no_file() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/bg.png");
                then.status(500);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = crate::test_support::config(&server.base_url(), dir.path());
        let data = Data::new(config, Persona::yuki(), 1).unwrap();

        let result = render(&data, &data.persona.meme_caption, MEME_STEM).await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_roast_meme_failure_hides_details() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/bg.png");
                then.status(200).body(crate::test_support::background_png());
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = crate::test_support::config(&server.base_url(), dir.path());
        let font = dir.path().join("fonts").join("missing.ttf");
        config.caption_font_path = Some(font.display().to_string());
        let data = Data::new(config, Persona::yuuki(), 1).unwrap();

        match roast_meme(&data).await {
            MemeOutcome::Failed(text) => {
                assert_eq!(text, data.persona.error_fallback);
                assert!(!text.contains("missing.ttf"));
            }
            MemeOutcome::Image(_) => panic!("expected a failure"),
        }
    }
}
