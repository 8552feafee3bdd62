//! Tool registry
//!
//! The ToolRegistry is the fixed catalogue of tools for one session:
//! - Tools are registered once at startup, in a stable order
//! - Lookup is by exact name
//! - The description list feeds the system prompt
//!
//! There is no mutation after construction; share it behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use crate::config::ToolSettings;
use crate::types::Tool;

use super::error::{RegistryError, RegistryResult, ToolError};
use super::system;

/// A zero-argument tool that reports on the host machine
///
/// `invoke` is blocking and may take a while (CPU sampling sleeps); the
/// dispatcher runs it off the async runtime.
pub trait SystemTool: Send + Sync {
    /// Unique tool name, as the model writes it in a marker
    fn name(&self) -> &str;

    /// One-line description for the system prompt
    fn description(&self) -> &str;

    /// Gather the tool's data
    fn invoke(&self) -> Result<Value, ToolError>;
}

/// Filter for which tools get registered
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    /// If set, only include tools with these names
    pub include: Option<HashSet<String>>,
    /// Exclude tools with these names
    pub exclude: HashSet<String>,
}

impl ToolFilter {
    /// Filter that lets every tool through
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter excluding the tools disabled in configuration
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self::all().with_exclude(settings.disabled.iter().cloned())
    }

    /// Include only specific tools
    pub fn with_include(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.include = Some(names.into_iter().collect());
        self
    }

    /// Exclude specific tools
    pub fn with_exclude(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.exclude = names.into_iter().collect();
        self
    }

    /// Check if a tool name passes this filter
    pub fn matches(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return false;
        }

        match &self.include {
            Some(include) => include.contains(name),
            None => true,
        }
    }
}

/// Insertion-ordered mapping from tool name to tool
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn SystemTool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in system tools that pass `filter`
    pub fn builtin(settings: &ToolSettings, filter: &ToolFilter) -> RegistryResult<Self> {
        let mut registry = Self::new();
        for tool in system::builtin_tools(settings) {
            if filter.matches(tool.name()) {
                registry.register(tool)?;
            }
        }
        Ok(registry)
    }

    /// Add a tool; names must be unique
    pub fn register(&mut self, tool: Arc<dyn SystemTool>) -> RegistryResult<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style `register`
    pub fn with_tool(mut self, tool: Arc<dyn SystemTool>) -> RegistryResult<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by exact name
    pub fn get(&self, name: &str) -> Option<Arc<dyn SystemTool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Check whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tool definitions in registration order
    pub fn definitions(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|t| Tool::new(t.name(), t.description()))
            .collect()
    }

    /// `- name: description` lines joined by newlines, in registration order
    pub fn descriptions(&self) -> String {
        self.definitions()
            .iter()
            .map(Tool::prompt_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticTool(&'static str, &'static str);

    impl SystemTool for StaticTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn invoke(&self) -> Result<Value, ToolError> {
            Ok(json!({ "tool": self.0 }))
        }
    }

    fn tool(name: &'static str, description: &'static str) -> Arc<dyn SystemTool> {
        Arc::new(StaticTool(name, description))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new()
            .with_tool(tool("alpha", "First"))
            .unwrap()
            .with_tool(tool("beta", "Second"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("alpha"));
        assert_eq!(registry.get("beta").unwrap().description(), "Second");
        assert!(registry.get("gamma").is_none());
        assert!(registry.get("Alpha").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("alpha", "First")).unwrap();

        let err = registry.register(tool("alpha", "Again")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("alpha".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("alpha").unwrap().description(), "First");
    }

    #[test]
    fn test_descriptions_keep_insertion_order() {
        let registry = ToolRegistry::new()
            .with_tool(tool("zeta", "Last letter"))
            .unwrap()
            .with_tool(tool("alpha", "First letter"))
            .unwrap();

        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert_eq!(
            registry.descriptions(),
            "- zeta: Last letter\n- alpha: First letter"
        );
        assert_eq!(ToolRegistry::new().descriptions(), "");
    }

    #[test]
    fn test_filter() {
        let filter = ToolFilter::all().with_exclude(vec!["beta".to_string()]);
        assert!(filter.matches("alpha"));
        assert!(!filter.matches("beta"));

        let filter = ToolFilter::all().with_include(vec!["alpha".to_string()]);
        assert!(filter.matches("alpha"));
        assert!(!filter.matches("beta"));
    }

    #[test]
    fn test_builtin_registry() {
        let settings = ToolSettings::default();
        let registry = ToolRegistry::builtin(&settings, &ToolFilter::all()).unwrap();

        assert_eq!(
            registry.names(),
            vec![
                "get_system_info",
                "get_cpu_info",
                "get_memory_info",
                "get_disk_info",
                "get_network_info",
                "get_process_info",
                "get_battery_info",
                "get_uptime",
            ]
        );
        assert!(registry
            .descriptions()
            .starts_with("- get_system_info: Get basic system information like OS, hostname, and processor\n"));
    }

    #[test]
    fn test_builtin_respects_disabled_tools() {
        let settings = ToolSettings {
            disabled: vec!["get_battery_info".to_string(), "get_process_info".to_string()],
            ..ToolSettings::default()
        };
        let registry =
            ToolRegistry::builtin(&settings, &ToolFilter::from_settings(&settings)).unwrap();

        assert_eq!(registry.len(), 6);
        assert!(!registry.contains("get_battery_info"));
        assert!(!registry.contains("get_process_info"));
        assert!(registry.contains("get_uptime"));
    }
}
