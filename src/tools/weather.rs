//! Weather tool - simulated lookup, every city is rainy

use async_trait::async_trait;
use serde_json::{json, Value};
use crate::Result;
use crate::error::Error;
use super::Tool;

/// Returns a canned weather sentence for the requested location
pub struct CurrentWeatherTool;

#[async_trait]
impl Tool for CurrentWeatherTool {
    fn name(&self) -> &str { "get_current_weather" }
    fn description(&self) -> &str { "Useful when you want to check the weather in a specific city." }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "A city or district, such as Beijing, Hangzhou or Yuhang District."
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let location = params.get("location")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .ok_or_else(|| Error::Tool("Missing 'location' parameter".to_string()))?;

        if location.is_empty() {
            return Err(Error::Tool("'location' must not be empty".to_string()));
        }

        Ok(format!("{} is rainy today.", location))
    }
}
