use {
    async_trait::async_trait,
    serde_json::Value,
    std::{collections::HashMap, sync::Arc},
};

use crate::{error::Error, result::ToolResult};

/// Agent-callable tool.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    /// Run the tool. Failures are reported inside the returned envelope.
    async fn execute(&self, params: Value) -> ToolResult;
}

/// Registry of available tools.
///
/// Tools are stored as `Arc<dyn AgentTool>` so a host can hand out shared
/// references to individual tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn AgentTool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Box<dyn AgentTool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::from(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentTool>> {
        self.tools.get(name).map(Arc::clone)
    }

    /// Name, description and parameter schema of every tool, sorted by name.
    pub fn list_schemas(&self) -> Vec<Value> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters_schema(),
                })
            })
            .collect()
    }

    /// Get the list of tool names.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke a tool by name. Unknown names yield a failure envelope.
    pub async fn call(&self, name: &str, params: Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.execute(params).await,
            None => ToolResult::failure(Error::UnknownTool {
                name: name.to_string(),
            }),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    struct EchoTool;

    #[async_trait]
    impl AgentTool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the parameters back"
        }

        fn parameters_schema(&self) -> Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, params: Value) -> ToolResult {
            ToolResult::json(params)
        }
    }

    #[tokio::test]
    async fn calls_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let result = registry.call("echo", json!({ "a": 1 })).await;
        assert_eq!(result.details(), Some(&json!({ "a": 1 })));
        assert_eq!(registry.tool_names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn unknown_tool_is_a_failure_envelope() {
        let registry = ToolRegistry::new();
        let result = registry.call("nope", json!({})).await;
        assert_eq!(result.error(), Some("unknown tool: nope"));
        assert_eq!(result.text(), "Error: unknown tool: nope");
    }
}
