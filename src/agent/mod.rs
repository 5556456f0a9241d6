//! Agent module — the conversation loop.
//!
//! This module contains:
//! - Message types (Message, Response, Round)
//! - LLM client trait and the OpenAI-compatible implementation
//! - Agent loop that answers tool calls until the model is done

mod loop_impl;
mod message;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use llm::{LlmClient, LlmResponse, OpenAiCompatClient, Usage};
pub use loop_impl::AgentLoop;
pub use message::{Message, Response, Role, Round, ToolCall, ToolCallRequest};
