//! OpenAI-compatible chat completion providers

use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};
use crate::{
    config::{LlmConfig, LlmProvider, FALLBACK_MODEL},
    errors::{BotError, BotResult},
    network::{is_connection_error, retry_with_backoff, RetryConfig},
};

pub const SYSTEM_PROMPT: &str = "You generate compact JSON token specs. Output STRICT JSON only. \
Schema: {\"kind\": one of ['erc20_fixed','erc20_mintable','erc20_capped_burnable'], \
\"params\": {\"name\": str, \"symbol\": str, \"decimals\": int, \
\"initial_supply\": str, \"cap\": str (opt)}}";

const TEMPERATURE: f64 = 0.6;
const MAX_TOKENS: u32 = 256;
const INVALID_MODEL_MARKER: &str = "not a valid model ID";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

pub fn user_prompt(owner: &str) -> String {
    format!("Owner: {}. Generate ERC20 spec JSON only.", owner)
}

/// Parses a model reply as JSON, tolerating a surrounding code fence.
pub fn parse_reply(content: &str) -> Result<Value> {
    let mut text = content.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
        text = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    }
    serde_json::from_str(text).with_context(|| format!("reply is not JSON: {:?}", content))
}

pub struct LlmClient {
    http: reqwest::Client,
    providers: Vec<LlmProvider>,
    retry: RetryConfig,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> BotResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::rpc("Failed to build HTTP client", e))?;
        Ok(Self {
            http,
            providers: config.providers.clone(),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Asks each provider in turn; `None` when all of them failed.
    pub async fn request_selection(&self, owner: &str) -> Option<Value> {
        let prompt = user_prompt(owner);
        for provider in &self.providers {
            match self.ask(provider, &prompt).await {
                Ok(selection) => {
                    info!("🤖 LLM provider={} ok", provider.name);
                    return Some(selection);
                }
                Err(e) => warn!("⚠️ LLM provider={} failed: {:#}", provider.name, e),
            }
        }
        None
    }

    async fn ask(&self, provider: &LlmProvider, prompt: &str) -> Result<Value> {
        let api_key = provider
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{} API key not set", provider.name))?;
        let url = format!("{}/chat/completions", provider.base_url.trim_end_matches('/'));

        let mut model = provider.model.as_str();
        loop {
            let (status, body) = self.post(provider, &url, api_key, model, prompt).await?;

            if status == StatusCode::BAD_REQUEST && body.contains(INVALID_MODEL_MARKER) && model != FALLBACK_MODEL {
                warn!("⚠️ LLM invalid model '{}', falling back to {}", model, FALLBACK_MODEL);
                model = FALLBACK_MODEL;
                continue;
            }
            if !status.is_success() {
                return Err(anyhow!("HTTP {} from {}: {}", status, url, body));
            }

            let response: ChatResponse = serde_json::from_str(&body).context("unexpected completion payload")?;
            let content = response
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| anyhow!("completion has no choices"))?;
            return parse_reply(&content);
        }
    }

    async fn post(
        &self,
        provider: &LlmProvider,
        url: &str,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<(StatusCode, String)> {
        let payload = ChatRequest {
            model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let payload = &payload;
        let operation = move || async move {
            let mut request = self.http.post(url).bearer_auth(api_key).json(payload);
            if provider.name == "openrouter" {
                request = request
                    .header("HTTP-Referer", "https://local.dev")
                    .header("X-Title", "og-auto");
            }
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, anyhow::Error>((status, body))
        };

        let result = retry_with_backoff(
            operation,
            &self.retry,
            &format!("{} chat completion", provider.name),
            is_connection_error,
        )
        .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_tolerated() {
        let fenced = "```json\n{\"kind\": \"erc20_fixed\"}\n```";
        assert_eq!(parse_reply(fenced).unwrap()["kind"], "erc20_fixed");
        let bare = "  {\"kind\": \"erc20_mintable\"} ";
        assert_eq!(parse_reply(bare).unwrap()["kind"], "erc20_mintable");
    }

    #[test]
    fn prose_is_rejected() {
        assert!(parse_reply("Sure! Here is your token.").is_err());
    }
}
