//! OpenAI-compatible chat-completions client (Bearer API key).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::tools::ToolDefinition;
use crate::Result;

use super::super::message::{Message, ToolCallRequest};
use super::{
    ChatRequest, ChatResponse, LlmClient, LlmResponse, Usage, WireFunctionCall, WireFunctionDef,
    WireMessage, WireTool, WireToolCall,
};

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    api_key: String,
    model: String,
    endpoint: Url,
    client: Client,
}

impl OpenAiCompatClient {
    /// Create a client for `base_url` (e.g. `https://host/v1`).
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), api_key, model, base_url)
    }

    /// Create a client from configuration, applying its timeouts.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_client(client, &config.api_key, &config.model, &config.base_url)
    }

    fn with_client(client: Client, api_key: &str, model: &str, base_url: &str) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            endpoint: chat_endpoint(base_url)?,
            client,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_request(&self, messages: &[Message], tools: &[ToolDefinition]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(convert_message).collect(),
            tools: tools.iter().map(convert_tool).collect(),
        }
    }
}

/// Append `chat/completions` to the base URL, keeping its last path segment.
fn chat_endpoint(base_url: &str) -> Result<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?.join("chat/completions")?)
}

fn convert_message(m: &Message) -> WireMessage {
    let tool_calls = m.tool_calls.as_ref().map(|calls| {
        calls
            .iter()
            .map(|tc| WireToolCall {
                id: Some(tc.id.clone()),
                kind: "function".to_string(),
                function: WireFunctionCall {
                    name: tc.name.clone(),
                    arguments: encode_arguments(&tc.arguments),
                },
            })
            .collect()
    });

    WireMessage {
        role: m.role.as_str(),
        content: m.content.clone(),
        name: m.name.clone(),
        tool_call_id: m.tool_call_id.clone(),
        tool_calls,
    }
}

/// Inverse of [`parse_arguments`]: raw strings go back exactly as received.
fn encode_arguments(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn convert_tool(t: &ToolDefinition) -> WireTool {
    WireTool {
        kind: "function",
        function: WireFunctionDef {
            name: t.name.clone(),
            description: t.description.clone(),
            parameters: t.parameters.clone(),
        },
    }
}

/// Decode the JSON-encoded argument string of a tool call.
///
/// Blank means no arguments. Anything that is not valid JSON is handed to
/// the tool as a raw string so the tool can report it.
fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Tool arguments are not valid JSON ({}): {}", e, raw);
        Value::String(raw.to_string())
    })
}

fn parse_response(response: ChatResponse) -> Result<LlmResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Llm("No choices in response".to_string()))?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCallRequest {
            id: tc
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple())),
            arguments: parse_arguments(&tc.function.arguments),
            name: tc.function.name,
        })
        .collect();

    let usage = response
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(LlmResponse {
        content: choice.message.content,
        tool_calls,
        finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        usage,
    })
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse> {
        let request = self.build_request(messages, tools);
        debug!("request: {}", serde_json::to_string(&request)?);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!("response ({}): {}", status, text);

        if !status.is_success() {
            return Err(Error::Llm(format!("API error ({status}): {text}")));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        parse_response(parsed)
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}
