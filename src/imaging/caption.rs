use crate::persona::Caption;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use anyhow::Context as _;
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::debug;

pub const CANVAS_WIDTH: u32 = 700;
pub const CANVAS_HEIGHT: u32 = 250;

const CAPTION_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// DejaVu Sans Bold, used unless a font file is configured.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

/// Draws captions over a remote background picture.
#[derive(Clone)]
pub struct CaptionRenderer {
    http: reqwest::Client,
    background_url: String,
    font_path: Option<PathBuf>,
}

impl CaptionRenderer {
    pub fn new(
        http: reqwest::Client,
        background_url: impl Into<String>,
        font_path: Option<PathBuf>,
    ) -> Self {
        Self {
            http,
            background_url: background_url.into(),
            font_path,
        }
    }

    /// Render `caption` and return the PNG bytes.
    pub async fn render(&self, caption: &Caption) -> anyhow::Result<Vec<u8>> {
        let background = self.fetch_background().await?;
        let font = self.load_font().await?;
        let canvas = compose(&background, &font, caption);
        encode_png(&canvas)
    }

    async fn fetch_background(&self) -> anyhow::Result<DynamicImage> {
        let bytes = self
            .http
            .get(&self.background_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!("Fetched {} byte background from {}", bytes.len(), self.background_url);

        image::load_from_memory(&bytes).context("failed to decode meme background")
    }

    async fn load_font(&self) -> anyhow::Result<FontArc> {
        let Some(path) = &self.font_path else {
            return bundled_font();
        };
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read caption font {:?}", path))?;
        FontArc::try_from_vec(data)
            .map_err(|e| anyhow::anyhow!("invalid caption font {:?}: {}", path, e))
    }
}

pub fn bundled_font() -> anyhow::Result<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT)
        .map_err(|e| anyhow::anyhow!("invalid bundled caption font: {}", e))
}

/// Stretch `background` over the canvas.
pub fn fit_background(background: &DynamicImage) -> RgbaImage {
    imageops::resize(
        &background.to_rgba8(),
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        imageops::FilterType::Triangle,
    )
}

pub fn compose(background: &DynamicImage, font: &impl Font, caption: &Caption) -> RgbaImage {
    let mut canvas = fit_background(background);
    let scale = PxScale::from(caption.size);
    // imageproc positions text by its top edge, captions are placed by baseline.
    let top = caption.baseline - font.as_scaled(scale).ascent().round() as i32;
    draw_text_mut(
        &mut canvas,
        CAPTION_COLOR,
        caption.x,
        top,
        scale,
        font,
        &caption.text,
    );
    canvas
}

pub fn encode_png(canvas: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
