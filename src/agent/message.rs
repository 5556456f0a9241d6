//! Message types for agent communication

use serde::{Deserialize, Serialize};

use super::llm::Usage;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,

    /// Tool call ID (for tool responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Function name (for tool responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool calls made by assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            name: None,
            tool_calls: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message with tool calls
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::new(Role::Assistant, content)
        }
    }

    /// Create a tool result message answering `call`
    pub fn tool_result(call: &ToolCallRequest, result: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call.id.clone()),
            name: Some(call.name.clone()),
            ..Self::new(Role::Tool, result)
        }
    }
}

/// A tool call request from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A tool call with its result
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    pub result: String,
}

/// One request/response exchange with the model
#[derive(Debug, Clone)]
pub struct Round {
    /// 1-based round number
    pub number: usize,
    /// Assistant text for this round (empty when the model sent none)
    pub content: String,
    /// Tools the model asked for, with what they returned
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: String,
    pub usage: Usage,
}

/// Response from the agent
#[derive(Debug, Clone)]
pub struct Response {
    /// Final answer
    pub content: String,
    pub rounds: Vec<Round>,
}

impl Response {
    /// True when the model answered without calling any tool
    pub fn answered_directly(&self) -> bool {
        self.rounds.iter().all(|r| r.tool_calls.is_empty())
    }

    /// Token usage summed over every round
    pub fn total_usage(&self) -> Usage {
        self.rounds.iter().fold(Usage::default(), |acc, r| Usage {
            prompt_tokens: acc.prompt_tokens + r.usage.prompt_tokens,
            completion_tokens: acc.completion_tokens + r.usage.completion_tokens,
            total_tokens: acc.total_tokens + r.usage.total_tokens,
        })
    }
}
