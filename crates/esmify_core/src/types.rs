use serde::Serialize;

/// Outcome of transforming one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    /// Rewritten source, present only when `is_changed` is set
    pub code: Option<String>,
    pub is_changed: bool,
    /// A resolver call sits inside some function body
    pub has_inner_requires: bool,
}

impl TransformResult {
    /// Whether the rewritten text may replace the original file.
    pub fn should_write(&self) -> bool {
        self.is_changed && !self.has_inner_requires
    }
}
