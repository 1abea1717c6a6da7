//! Text-to-speech playback URLs
//!
//! Builds Google Translate TTS URLs that the voice transport streams directly.
//! The endpoint accepts at most 200 characters per request, so longer text is
//! split on whitespace into several URLs played back in order.

use reqwest::Url;

pub const MAX_CHUNK_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("nothing to speak")]
    Empty,
    #[error("invalid TTS host: {0}")]
    Host(String),
}

#[derive(Debug, Clone)]
pub struct TtsOptions {
    pub host: String,
    pub lang: String,
    pub slow: bool,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            host: "https://translate.google.com".to_string(),
            lang: "en".to_string(),
            slow: false,
        }
    }
}

/// One playback URL per chunk of `text`.
pub fn audio_urls(text: &str, options: &TtsOptions) -> Result<Vec<Url>, TtsError> {
    let chunks = split_text(text, MAX_CHUNK_CHARS);
    if chunks.is_empty() {
        return Err(TtsError::Empty);
    }

    let total = chunks.len();
    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| chunk_url(chunk, idx, total, options))
        .collect()
}

fn chunk_url(chunk: &str, idx: usize, total: usize, options: &TtsOptions) -> Result<Url, TtsError> {
    let base = format!("{}/translate_tts", options.host.trim_end_matches('/'));
    let url = Url::parse_with_params(
        &base,
        &[
            ("ie", "UTF-8".to_string()),
            ("q", chunk.to_string()),
            ("tl", options.lang.clone()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", chunk.chars().count().to_string()),
            ("client", "tw-ob".to_string()),
            ("prev", "input".to_string()),
            ("ttsspeed", if options.slow { "0.24" } else { "1" }.to_string()),
        ],
    )
    .map_err(|e| TtsError::Host(e.to_string()))?;
    Ok(url)
}

/// Greedy whitespace split into chunks of at most `max_chars` characters.
/// Words longer than the limit are cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { word.len() + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(url: &Url, key: &str) -> String {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[test]
    fn test_single_url_parameters() {
        let urls = audio_urls("hello there", &TtsOptions::default()).unwrap();
        assert_eq!(urls.len(), 1);

        let url = &urls[0];
        assert_eq!(url.host_str(), Some("translate.google.com"));
        assert_eq!(url.path(), "/translate_tts");
        assert_eq!(query(url, "q"), "hello there");
        assert_eq!(query(url, "tl"), "en");
        assert_eq!(query(url, "textlen"), "11");
        assert_eq!(query(url, "total"), "1");
        assert_eq!(query(url, "idx"), "0");
        assert_eq!(query(url, "client"), "tw-ob");
        assert_eq!(query(url, "ttsspeed"), "1");
    }

    #[test]
    fn test_slow_speed_and_custom_host() {
        let options = TtsOptions {
            host: "https://translate.google.co.jp/".to_string(),
            lang: "ja".to_string(),
            slow: true,
        };
        let url = &audio_urls("konnichiwa", &options).unwrap()[0];
        assert_eq!(url.host_str(), Some("translate.google.co.jp"));
        assert_eq!(url.path(), "/translate_tts");
        assert_eq!(query(url, "tl"), "ja");
        assert_eq!(query(url, "ttsspeed"), "0.24");
    }

    #[test]
    fn test_long_text_is_split_in_order() {
        let text = "baka ".repeat(100);
        let urls = audio_urls(&text, &TtsOptions::default()).unwrap();
        assert!(urls.len() > 1);

        for (i, url) in urls.iter().enumerate() {
            assert_eq!(query(url, "idx"), i.to_string());
            assert_eq!(query(url, "total"), urls.len().to_string());
            assert!(query(url, "q").chars().count() <= MAX_CHUNK_CHARS);
        }
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(matches!(
            audio_urls("   ", &TtsOptions::default()),
            Err(TtsError::Empty)
        ));
    }

    #[test]
    fn test_split_text_cuts_oversized_words() {
        let chunks = split_text("ab cdefgh ij", 4);
        assert_eq!(chunks, vec!["ab", "cdef", "gh", "ij"]);

        let chunks = split_text("one two three", 7);
        assert_eq!(chunks, vec!["one two", "three"]);
    }
}
