//! Tool dispatcher
//!
//! Runs tools by name and normalizes every outcome to text. Nothing a tool
//! does (unknown name, returned error, panic) escapes as an error: it becomes
//! the payload the model reads in the results turn.

use std::any::Any;
use std::sync::Arc;

use crate::logging::Logger;
use crate::types::ToolResult;

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Executes registered tools one at a time
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    logger: Arc<dyn Logger>,
}

impl ToolDispatcher {
    /// Create a dispatcher over a registry
    pub fn new(registry: Arc<ToolRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self { registry, logger }
    }

    /// The registry tools are looked up in
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run one tool and return its normalized result
    pub async fn execute(&self, name: &str) -> ToolResult {
        let Some(tool) = self.registry.get(name) else {
            self.logger.warn(&format!("[ToolDispatcher] Unknown tool requested: {}", name));
            return ToolResult::error(name, format!("Unknown tool: {}", name));
        };

        self.logger.info(&format!("[ToolDispatcher] Executing {}", name));

        let outcome = match tokio::task::spawn_blocking(move || tool.invoke()).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                Err(ToolError::Panicked(panic_message(join_err.into_panic())))
            }
            Err(join_err) => Err(ToolError::other(join_err.to_string())),
        };

        let result = outcome.and_then(|value| Ok(serde_json::to_string_pretty(&value)?));

        match result {
            Ok(payload) => {
                self.logger.debug(&format!(
                    "[ToolDispatcher] {} returned {} bytes",
                    name,
                    payload.len()
                ));
                ToolResult::success(name, payload)
            }
            Err(e) => {
                self.logger.error(&format!("[ToolDispatcher] {} failed: {}", name, e));
                ToolResult::error(name, format!("Error executing {}: {}", name, e))
            }
        }
    }

    /// Run tools sequentially, in the given order
    pub async fn execute_all<S: AsRef<str>>(&self, names: &[S]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            results.push(self.execute(name.as_ref()).await);
        }
        results
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::tools::SystemTool;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    struct JsonTool;

    impl SystemTool for JsonTool {
        fn name(&self) -> &str {
            "get_answer"
        }
        fn description(&self) -> &str {
            "Returns the answer"
        }
        fn invoke(&self) -> Result<Value, ToolError> {
            Ok(json!({ "answer": 42 }))
        }
    }

    struct FailingTool;

    impl SystemTool for FailingTool {
        fn name(&self) -> &str {
            "get_broken"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn invoke(&self) -> Result<Value, ToolError> {
            Err(ToolError::other("sensor offline"))
        }
    }

    struct PanickingTool;

    impl SystemTool for PanickingTool {
        fn name(&self) -> &str {
            "get_panic"
        }
        fn description(&self) -> &str {
            "Panics"
        }
        fn invoke(&self) -> Result<Value, ToolError> {
            panic!("index out of range")
        }
    }

    struct RecordingTool {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl SystemTool for RecordingTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "Records calls"
        }
        fn invoke(&self) -> Result<Value, ToolError> {
            self.log.lock().push(self.name);
            Ok(Value::Null)
        }
    }

    fn dispatcher() -> ToolDispatcher {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(JsonTool))
            .unwrap()
            .with_tool(Arc::new(FailingTool))
            .unwrap()
            .with_tool(Arc::new(PanickingTool))
            .unwrap();
        ToolDispatcher::new(Arc::new(registry), Arc::new(NoOpLogger))
    }

    #[tokio::test]
    async fn test_success_is_indented_json() {
        let result = dispatcher().execute("get_answer").await;
        assert!(!result.is_error);
        assert_eq!(result.tool_name, "get_answer");
        assert_eq!(result.payload, "{\n  \"answer\": 42\n}");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = dispatcher().execute("get_weather").await;
        assert!(result.is_error);
        assert_eq!(result.payload, "Unknown tool: get_weather");
    }

    #[tokio::test]
    async fn test_tool_error_is_contained() {
        let result = dispatcher().execute("get_broken").await;
        assert!(result.is_error);
        assert_eq!(result.payload, "Error executing get_broken: sensor offline");
    }

    #[tokio::test]
    async fn test_tool_panic_is_contained() {
        let result = dispatcher().execute("get_panic").await;
        assert!(result.is_error);
        assert!(result.payload.starts_with("Error executing get_panic: "));
        assert!(result.payload.contains("index out of range"));
    }

    #[tokio::test]
    async fn test_execute_all_is_sequential_and_ordered() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(RecordingTool { name: "first", log: Arc::clone(&log) }))
            .unwrap()
            .with_tool(Arc::new(RecordingTool { name: "second", log: Arc::clone(&log) }))
            .unwrap();
        let dispatcher = ToolDispatcher::new(Arc::new(registry), Arc::new(NoOpLogger));

        let results = dispatcher
            .execute_all(&["second", "missing", "first", "second"])
            .await;

        let names: Vec<_> = results.iter().map(|r| r.tool_name.as_str()).collect();
        assert_eq!(names, vec!["second", "missing", "first", "second"]);
        assert_eq!(*log.lock(), vec!["second", "first", "second"]);
        assert_eq!(results[1].payload, "Unknown tool: missing");
    }
}
