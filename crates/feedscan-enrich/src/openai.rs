//! Chat-completions client used as a [`Classifier`].

use std::time::Duration;

use async_trait::async_trait;
use feedscan_core::ClassificationResult;
use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::error::EnrichError;

const PROMPT_PREAMBLE: &str = "You are an influencer-intelligence assistant. \
Given these Instagram post captions, return a JSON object with keys: \
content_type, tone, suggested_tags.";

pub struct OpenAiClassifier {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Model output. `suggested_tags` arrives either as a comma-separated
/// string or as an array depending on the model.
#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    tone: String,
    #[serde(default)]
    suggested_tags: TagList,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagList {
    Joined(String),
    List(Vec<String>),
}

impl Default for TagList {
    fn default() -> Self {
        TagList::List(Vec::new())
    }
}

impl TagList {
    fn into_tags(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagList::Joined(s) => s.split(',').map(str::to_owned).collect(),
            TagList::List(v) => v,
        };
        raw.into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl OpenAiClassifier {
    /// `base_url` is the API root (`https://api.openai.com` in production).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
        })
    }
}

fn build_prompt(samples: &[String]) -> String {
    let captions = serde_json::to_string(samples).unwrap_or_else(|_| "[]".to_owned());
    format!("{PROMPT_PREAMBLE}\n\nCAPTIONS:\n{captions}")
}

fn parse_content(content: &str) -> Result<ClassificationResult, EnrichError> {
    let raw: RawClassification =
        serde_json::from_str(content).map_err(|e| EnrichError::Deserialize {
            context: "classification message content".to_owned(),
            source: e,
        })?;
    Ok(ClassificationResult {
        content_type: raw.content_type.trim().to_owned(),
        tone: raw.tone.trim().to_owned(),
        suggested_tags: raw.suggested_tags.into_tags(),
    })
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, samples: &[String]) -> Result<ClassificationResult, EnrichError> {
        let prompt = build_prompt(samples);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let chat: ChatResponse =
            serde_json::from_str(&body).map_err(|e| EnrichError::Deserialize {
                context: "chat completion".to_owned(),
                source: e,
            })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(EnrichError::EmptyResponse)?;

        parse_content(&content)
    }
}
