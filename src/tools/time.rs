//! Time tool - report the local wall clock

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use serde_json::{json, Value};
use crate::Result;
use super::Tool;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local time, e.g. `Current time: 2024-04-15 17:15:18.`
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    fn render<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("Current time: {}.", now.format(TIME_FORMAT))
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str { "get_current_time" }
    fn description(&self) -> &str { "Useful when you want to know the current time." }

    fn parameters(&self) -> Value {
        // Takes no input.
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value) -> Result<String> {
        Ok(Self::render(&Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_render_format() {
        let at = Utc.with_ymd_and_hms(2024, 4, 15, 17, 15, 18).unwrap();
        assert_eq!(CurrentTimeTool::render(&at), "Current time: 2024-04-15 17:15:18.");
    }

    #[tokio::test]
    async fn test_execute_ignores_arguments() {
        let out = CurrentTimeTool.execute(json!({"anything": 1})).await.unwrap();
        assert!(out.starts_with("Current time: "));
        assert!(out.ends_with('.'));
        // "Current time: " + "YYYY-MM-DD HH:MM:SS" + "."
        assert_eq!(out.len(), 14 + 19 + 1);
    }
}
