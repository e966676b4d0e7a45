use serde::Deserialize;

use super::memory::WindowSpec;

/// Knobs for a [`Session`](super::Session). Missing JSON fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Initial `rsp` and `rbp`.
    pub stack_base: i64,
    /// Bytes shown above `rbp` and below `rsp` in the stack window.
    pub window_margin: i64,
    pub max_window_entries: usize,
    /// Undo depth; `None` keeps every step.
    pub history_limit: Option<usize>,
    /// Label whose address becomes the initial `rip`.
    pub entry_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stack_base: 1000,
            window_margin: 16,
            max_window_entries: 256,
            history_limit: Some(65_536),
            entry_label: "main".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub(crate) fn window(&self) -> WindowSpec {
        WindowSpec { margin: self.window_margin, max_entries: self.max_window_entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "stack_base": 4096, "history_limit": null }"#).unwrap();
        assert_eq!(cfg.stack_base, 4096);
        assert_eq!(cfg.history_limit, None);
        assert_eq!(cfg.window_margin, 16);
        assert_eq!(cfg.entry_label, "main");
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(EngineConfig::from_json(r#"{ "stack_top": 1 }"#).is_err());
    }
}
