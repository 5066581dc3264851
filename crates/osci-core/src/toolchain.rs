//! Build prerequisites.
//!
//! Only checks that the tools are on `PATH`; installing them is left to the
//! user, guided by the install hint.

use std::path::PathBuf;

use serde::Serialize;

/// A program the build needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub name: String,
    pub install_hint: String,
}

impl Tool {
    pub fn new(name: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            install_hint: install_hint.into(),
        }
    }
}

/// Tools required to build Open Stage Control from source.
pub fn default_tools(npm: &str) -> Vec<Tool> {
    vec![
        Tool::new("node", "brew install node@20"),
        Tool::new(npm, "ships with node (brew install node@20)"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<PathBuf>,
    pub install_hint: String,
}

impl ToolStatus {
    pub fn is_installed(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolReport {
    pub tools: Vec<ToolStatus>,
}

impl ToolReport {
    pub fn missing(&self) -> impl Iterator<Item = &ToolStatus> {
        self.tools.iter().filter(|t| !t.is_installed())
    }

    pub fn all_installed(&self) -> bool {
        self.missing().next().is_none()
    }
}

/// Resolve each tool on `PATH`.
pub fn check_tools(tools: &[Tool]) -> ToolReport {
    let tools = tools
        .iter()
        .map(|tool| ToolStatus {
            name: tool.name.clone(),
            path: which::which(&tool.name).ok(),
            install_hint: tool.install_hint.clone(),
        })
        .collect();
    ToolReport { tools }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_reported_with_hint() {
        let report = check_tools(&[Tool::new(
            "osci-definitely-not-a-real-program",
            "install it somehow",
        )]);

        assert!(!report.all_installed());
        let missing: Vec<_> = report.missing().collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].install_hint, "install it somehow");
    }

    #[cfg(unix)]
    #[test]
    fn present_tool_resolves_to_path() {
        let report = check_tools(&[Tool::new("sh", "")]);
        assert!(report.all_installed());
        assert!(report.tools[0].path.is_some());
    }

    #[test]
    fn default_tools_include_node_and_npm() {
        let names: Vec<_> = default_tools("npm").into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["node", "npm"]);
    }
}
