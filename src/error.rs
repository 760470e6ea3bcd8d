//! Error taxonomy for the generation pipeline.
//!
//! Every variant is fatal. Library functions return `anyhow::Result` and
//! wrap these with file context; callers that need to branch on the kind of
//! failure can `downcast_ref::<PipelineError>()`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Catalog or stage input that cannot be used at all
    #[error("Input error: {0}")]
    Input(String),

    /// A CSV header lacks columns the stage needs
    #[error("{file} is missing required columns: {}", columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    /// Filtering or projection left nothing to write
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Upstream data contradicts itself or the documented file contract
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Parameters that can never produce a valid run
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        Self::EmptyResult(msg.into())
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn missing_columns(file: impl Into<String>, columns: &[&str]) -> Self {
        Self::MissingColumns {
            file: file.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = PipelineError::missing_columns("system_objects.csv", &["class", "object_id"]);
        assert_eq!(
            err.to_string(),
            "system_objects.csv is missing required columns: class, object_id"
        );
    }
}
