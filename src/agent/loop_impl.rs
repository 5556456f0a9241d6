//! Agent loop - call the model, answer its tool calls, repeat

use tracing::{debug, info};
use crate::Result;
use crate::error::Error;
use crate::tools::ToolRunner;
use super::llm::LlmClient;
use super::message::{Message, Response, Round, ToolCall, ToolCallRequest};

/// The agent loop alternates between the model and local tool execution
pub struct AgentLoop<C: LlmClient> {
    client: C,
    tools: ToolRunner,
    max_iterations: usize,
    system_prompt: Option<String>,
}

impl<C: LlmClient> AgentLoop<C> {
    /// Create a new agent loop
    pub fn new(client: C, tools: ToolRunner, max_iterations: usize) -> Self {
        Self {
            client,
            tools,
            max_iterations,
            system_prompt: None,
        }
    }

    /// Seed every conversation with a system message
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn tools(&self) -> &ToolRunner {
        &self.tools
    }

    /// Run one conversation seeded by a single user prompt
    pub async fn run(&self, prompt: &str) -> Result<Response> {
        let mut messages = Vec::with_capacity(4);
        if let Some(system) = &self.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(prompt));

        let definitions = self.tools.definitions();
        let mut rounds = Vec::new();

        info!("Starting conversation with model {}", self.client.default_model());
        debug!("Prompt: {}", prompt);

        for iteration in 0..self.max_iterations {
            debug!("Round {}/{}", iteration + 1, self.max_iterations);

            let response = self.client.chat(&messages, &definitions).await?;
            let content = response.content.clone().unwrap_or_default();

            if !response.has_tool_calls() {
                info!("Model answered after {} round(s): {} chars", iteration + 1, content.len());
                rounds.push(Round {
                    number: iteration + 1,
                    content: content.clone(),
                    tool_calls: vec![],
                    finish_reason: response.finish_reason,
                    usage: response.usage,
                });
                return Ok(Response { content, rounds });
            }

            messages.push(Message::assistant_with_tools(
                content.clone(),
                response.tool_calls.clone(),
            ));

            let mut executed = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                let result = self.execute_tool(call).await;
                messages.push(Message::tool_result(call, result.clone()));
                executed.push(ToolCall {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                    result,
                });
            }

            rounds.push(Round {
                number: iteration + 1,
                content,
                tool_calls: executed,
                finish_reason: response.finish_reason,
                usage: response.usage,
            });
        }

        Err(Error::MaxIterations)
    }

    async fn execute_tool(&self, call: &ToolCallRequest) -> String {
        debug!("Executing tool: {} with args: {}", call.name, call.arguments);

        match self.tools.execute(&call.name, call.arguments.clone()).await {
            Ok(result) => {
                debug!("Tool {} succeeded: {}", call.name, result);
                result
            }
            Err(e) => {
                let error_msg = format!("Error: {}", e);
                debug!("Tool {} failed: {}", call.name, error_msg);
                error_msg
            }
        }
    }
}
