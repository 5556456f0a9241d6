//! toolchat - tool-calling chat loop
//!
//! This library drives a conversation with an OpenAI-compatible
//! chat-completion endpoint, answering the model's tool calls with
//! local stubs until it produces a final reply.

pub mod agent;
pub mod config;
pub mod error;
pub mod tools;
pub mod ui;

pub use error::{Error, Result};
