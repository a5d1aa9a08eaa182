/// Auxiliary tool panels that can be docked into the main window.
/// The persisted tool list is restored by id at startup.
pub const KNOWN_TOOLS: &[&str] = &[
    "source-structure",
    "file-browser",
    "workspace",
    "interactive-help",
    "logger",
];

#[derive(Default)]
pub struct ToolManager {
    loaded: Vec<String>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a tool panel by id. Unknown ids (e.g. from a state file written
    /// by a newer version) are logged and skipped; loading twice is a no-op.
    pub fn load_tool(&mut self, id: &str) -> bool {
        if !KNOWN_TOOLS.contains(&id) {
            log::warn!("unknown tool id '{}', skipping", id);
            return false;
        }
        if self.loaded.iter().any(|t| t == id) {
            return true;
        }
        log::debug!("loading tool '{}'", id);
        self.loaded.push(id.to_string());
        true
    }

    pub fn unload_tool(&mut self, id: &str) {
        self.loaded.retain(|t| t != id);
    }

    /// Currently loaded tool ids, in load order, for persistence.
    pub fn loaded_ids(&self) -> Vec<String> {
        self.loaded.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_known_tools_once() {
        let mut tools = ToolManager::new();
        assert!(tools.load_tool("workspace"));
        assert!(tools.load_tool("workspace"));
        assert_eq!(tools.loaded_ids(), vec!["workspace"]);
    }

    #[test]
    fn unknown_tool_is_skipped() {
        let mut tools = ToolManager::new();
        assert!(!tools.load_tool("jetpack"));
        assert!(tools.loaded_ids().is_empty());
    }

    #[test]
    fn unload_removes_tool() {
        let mut tools = ToolManager::new();
        tools.load_tool("logger");
        tools.unload_tool("logger");
        assert!(tools.loaded_ids().is_empty());
    }
}
