use crate::config::Config;
use crate::report::SummaryGenerator;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    enabled: bool,
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: Client,
}

impl ChatCompletionClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.generation_timeout())
            .default_headers(headers)
            .build()
            .context("Failed to create AI HTTP client")?;

        Ok(Self {
            enabled: config.ai_enabled,
            api_key: config.resolve_api_key(),
            base_url: config.ai_api_base_url.trim_end_matches('/').to_string(),
            model: config.ai_model.clone(),
            client,
        })
    }

    pub async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        if !self.enabled {
            bail!("AI summaries are disabled");
        }

        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .context("AI API key is missing")?;

        let endpoint = format!("{}/chat/completions", self.base_url);
        let request_body = json!({
            "model": self.model,
            "temperature": 0.1,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ]
        });

        let response = self
            .client
            .post(endpoint)
            .header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .context("Failed to build Authorization header")?,
            )
            .json(&request_body)
            .send()
            .await
            .context("AI API request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read AI response body")?;

        if !status.is_success() {
            bail!("AI API error {}: {}", status, body);
        }

        parse_completion_content(&body)
    }
}

#[async_trait]
impl SummaryGenerator for ChatCompletionClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.chat_completion(system_prompt, user_prompt).await
    }
}

pub async fn test_connection(config: &Config) -> Result<String> {
    if config.resolve_api_key().is_none() {
        bail!(
            "AI API key is missing. Set `moodweek config set ai.api_key <KEY>` or `{}`.",
            crate::config::AI_API_KEY_ENV
        );
    }

    let client = ChatCompletionClient::from_config(config)?;
    client
        .chat_completion(
            "Return exactly one short sentence confirming the AI API is reachable.",
            "Health check for moodweek.",
        )
        .await
}

fn parse_completion_content(body: &str) -> Result<String> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse AI response: {body}"))?;

    parsed
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| anyhow!("AI response did not include message.content"))
}

#[cfg(test)]
mod tests {
    use super::{ChatCompletionClient, parse_completion_content};
    use crate::config::Config;

    #[test]
    fn reads_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  {\"summary_text\": \"hi\"}\n"}}]}"#;
        assert_eq!(
            parse_completion_content(body).expect("content"),
            r#"{"summary_text": "hi"}"#
        );
    }

    #[test]
    fn empty_or_missing_content_is_an_error() {
        assert!(parse_completion_content(r#"{"choices":[]}"#).is_err());
        assert!(parse_completion_content(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
        assert!(parse_completion_content(r#"{"choices":[{"message":{"content":"  "}}]}"#).is_err());
        assert!(parse_completion_content("<html>bad gateway</html>").is_err());
    }

    #[tokio::test]
    async fn disabled_client_fails_without_network() {
        let config = Config {
            ai_enabled: false,
            ai_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let client = ChatCompletionClient::from_config(&config).expect("client");

        let error = client
            .chat_completion("system", "user")
            .await
            .expect_err("disabled");
        assert!(error.to_string().contains("disabled"));
    }
}
