use std::future::Future;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
    },
    Client,
};
use backoff::ExponentialBackoffBuilder;

use crate::errors::ClassificationError;

pub const TEMPERATURE: f32 = 0.3;
pub const MAX_COMPLETION_TOKENS: u32 = 150;

/// What the classifier produced for one ticket.
#[derive(Debug)]
pub enum Prediction {
    Answered(String),
    Failed(ClassificationError),
}

impl Prediction {
    pub fn from_result(result: Result<String, ClassificationError>) -> Self {
        match result {
            Ok(text) => Prediction::Answered(text),
            Err(e) => Prediction::Failed(e),
        }
    }

    /// Text written to the prediction column of the result tables.
    pub fn raw_text(&self) -> String {
        match self {
            Prediction::Answered(text) => text.clone(),
            Prediction::Failed(e) => format!("Error: {e}"),
        }
    }
}

/// Anything that can turn one prompt into one completion.
pub trait Classifier {
    fn classify(&self, prompt: &str)
        -> impl Future<Output = Result<String, ClassificationError>>;
}

/// Chat-completion client for an OpenAI-compatible endpoint.
pub struct TicketClassifier {
    pub model: String,
    pub client: Client<OpenAIConfig>,
}

impl TicketClassifier {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);
        // one attempt per ticket; the SDK would otherwise retry rate limits
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Self {
            model: model.to_string(),
            client: Client::with_config(config).with_backoff(no_retry),
        }
    }
}

impl Classifier for TicketClassifier {
    async fn classify(&self, prompt: &str) -> Result<String, ClassificationError> {
        let req = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                    name: None,
                },
            )])
            .temperature(TEMPERATURE)
            .max_completion_tokens(MAX_COMPLETION_TOKENS)
            .stream(false)
            .build()?;

        let resp = self.client.chat().create(req).await?;
        resp.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .ok_or(ClassificationError::EmptyResponse)
    }
}
