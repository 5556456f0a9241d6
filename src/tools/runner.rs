//! Tool runner - manages and executes tools

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use crate::Result;
use crate::error::Error;
use super::Tool;
use super::time::CurrentTimeTool;
use super::weather::CurrentWeatherTool;

/// Tool definition for LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tool runner manages registered tools and executes them
pub struct ToolRunner {
    // Ordered so the advertised tool list is stable between requests.
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRunner {
    /// Create an empty tool runner
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Create a tool runner with the time and weather stubs
    pub fn with_defaults() -> Self {
        let mut runner = Self::new();
        runner.register(CurrentTimeTool);
        runner.register(CurrentWeatherTool);
        runner
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    /// Get tool definitions for LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values()
            .map(|t| t.to_definition())
            .collect()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, params: Value) -> Result<String> {
        let tool = self.tools.get(name)
            .ok_or_else(|| Error::Tool(format!("Unknown tool: {}", name)))?;

        debug!("Running tool {} with {}", name, params);
        tool.execute(params).await
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::DummyTool;
    use serde_json::json;

    #[tokio::test]
    async fn test_tool_runner_register_and_execute() {
        let mut runner = ToolRunner::new();
        runner.register(DummyTool {
            name: "test_tool".to_string(),
            result: "success".to_string(),
        });

        assert!(runner.has("test_tool"));

        let result = runner.execute("test_tool", json!({})).await.unwrap();
        assert_eq!(result, "success");
    }

    #[tokio::test]
    async fn test_tool_runner_unknown_tool() {
        let runner = ToolRunner::new();
        let result = runner.execute("unknown", json!({})).await;
        assert!(matches!(result, Err(Error::Tool(msg)) if msg == "Unknown tool: unknown"));
    }

    #[test]
    fn test_defaults_are_sorted() {
        let runner = ToolRunner::with_defaults();
        assert_eq!(runner.tool_names(), vec!["get_current_time", "get_current_weather"]);

        let names: Vec<String> = runner.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["get_current_time", "get_current_weather"]);
    }

    #[tokio::test]
    async fn test_defaults_dispatch_weather() {
        let runner = ToolRunner::with_defaults();
        let out = runner
            .execute("get_current_weather", json!({"location": "Hangzhou"}))
            .await
            .unwrap();
        assert_eq!(out, "Hangzhou is rainy today.");
    }
}
