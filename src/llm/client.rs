use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use crate::config::Config;
use crate::persona::Persona;
use std::time::Duration;
use tracing::{error, warn};

pub struct CompletionClient {
    chat_client: Client<OpenAIConfig>,
    chat_model: String,
}

impl CompletionClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self::with_http_client(
            http,
            &config.completion_url,
            config.completion_api_key.as_deref(),
            &config.completion_model,
        ))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        api_base: &str,
        api_key: Option<&str>,
        model: &str,
    ) -> Self {
        // A missing key still sends the request; the endpoint rejects it and the fallback kicks in.
        let chat_config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key.unwrap_or_default());

        // No retries: a failed call goes straight to the fallback reply.
        let no_retry = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            chat_client: Client::with_config(chat_config)
                .with_http_client(http)
                .with_backoff(no_retry),
            chat_model: model.to_string(),
        }
    }

    /// Ask the model for a reply in the persona's voice.
    ///
    /// Never fails: errors and empty answers are replaced by the persona's canned lines.
    /// A JSON body without a usable reply, error objects included, counts as empty.
    pub async fn complete(&self, persona: &Persona, prompt: &str) -> String {
        match self.chat(persona, prompt).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                warn!("Completion returned no content, using fallback");
                persona.empty_fallback.clone()
            }
            Err(e) if answered_with_json(&e) => {
                warn!("Completion endpoint answered without a reply: {}", e);
                persona.empty_fallback.clone()
            }
            Err(e) => {
                error!("Smart reply error: {}", e);
                persona.error_fallback.clone()
            }
        }
    }

    #[allow(deprecated)]
    async fn chat(&self, persona: &Persona, prompt: &str) -> Result<Option<String>, OpenAIError> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(persona.system_prompt.clone())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(messages)
            .temperature(persona.temperature)
            .max_tokens(persona.max_tokens)
            .build()?;

        let response = self.chat_client.chat().create(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty());

        Ok(content)
    }
}

/// Whether the endpoint sent a JSON document, as opposed to failing at the transport
/// level or answering with something that is not JSON.
fn answered_with_json(err: &OpenAIError) -> bool {
    match err {
        OpenAIError::JSONDeserialize(e) => e.classify() == serde_json::error::Category::Data,
        // Server errors arrive as the raw body with no structured fields
        OpenAIError::ApiError(e) => {
            e.r#type.is_some()
                || e.param.is_some()
                || e.code.is_some()
                || serde_json::from_str::<serde_json::Value>(&e.message).is_ok()
        }
        _ => false,
    }
}
