//! End-to-end conversation through the public API with a scripted model.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use toolchat::agent::{AgentLoop, LlmClient, LlmResponse, Message, Role, ToolCallRequest};
use toolchat::tools::{ToolDefinition, ToolRunner};
use toolchat::{Error, Result};

struct ScriptedModel {
    replies: Mutex<VecDeque<LlmResponse>>,
    offered: Mutex<Vec<Vec<String>>>,
    history: Mutex<Vec<Message>>,
}

impl ScriptedModel {
    fn new(replies: Vec<LlmResponse>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            offered: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedModel {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<LlmResponse> {
        self.offered
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.name.clone()).collect());
        *self.history.lock().unwrap() = messages.to_vec();
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Llm("script exhausted".to_string()))
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}

fn weather_call(id: &str, city: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_string(),
        name: "get_current_weather".to_string(),
        arguments: json!({ "location": city }),
    }
}

#[tokio::test]
async fn weather_then_time_then_answer() {
    let model = ScriptedModel::new(vec![
        LlmResponse::tools(vec![weather_call("call_1", "Beijing")]),
        LlmResponse::tools(vec![ToolCallRequest {
            id: "call_2".to_string(),
            name: "get_current_time".to_string(),
            arguments: json!({}),
        }]),
        LlmResponse::text("Beijing is rainy, bring an umbrella."),
    ]);
    let agent = AgentLoop::new(model, ToolRunner::with_defaults(), 10);

    let response = agent.run("Should I take an umbrella in Beijing?").await.unwrap();

    assert_eq!(response.content, "Beijing is rainy, bring an umbrella.");
    assert_eq!(response.rounds.len(), 3);
    assert!(!response.answered_directly());
    assert_eq!(response.rounds[0].tool_calls[0].result, "Beijing is rainy today.");
    assert!(response.rounds[1].tool_calls[0].result.starts_with("Current time: "));
}

#[tokio::test]
async fn history_grows_by_assistant_and_tool_messages() {
    let model = ScriptedModel::new(vec![
        LlmResponse::tools(vec![weather_call("w1", "Hangzhou"), weather_call("w2", "Yuhang")]),
        LlmResponse::text("Both rainy."),
    ]);
    let agent = AgentLoop::new(model, ToolRunner::with_defaults(), 10);

    agent.run("Weather in Hangzhou and Yuhang?").await.unwrap();

    // Last request: user, assistant(tool_calls), tool, tool
    let model = agent_model(&agent);
    let history = model.history.lock().unwrap().clone();
    let roles: Vec<Role> = history.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool, Role::Tool]);
    assert_eq!(history[2].content, "Hangzhou is rainy today.");
    assert_eq!(history[3].content, "Yuhang is rainy today.");
    assert_eq!(history[3].tool_call_id.as_deref(), Some("w2"));

    for offered in model.offered.lock().unwrap().iter() {
        assert_eq!(offered, &vec!["get_current_time", "get_current_weather"]);
    }
}

#[test]
fn model_error_propagates() {
    let agent = AgentLoop::new(ScriptedModel::new(vec![]), ToolRunner::with_defaults(), 5);
    let result = tokio_test::block_on(agent.run("hello"));
    assert!(matches!(result, Err(Error::Llm(msg)) if msg == "script exhausted"));
}

fn agent_model(agent: &AgentLoop<ScriptedModel>) -> &ScriptedModel {
    agent.client()
}
