//! Domain errors raised while loading a lead file and computing segments.
//!
//! Every variant is terminal for the current invocation. The command layer
//! wraps these in `anyhow` context before they reach the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Could not read file: {0}")]
    FileRead(String),
    #[error("Your file seems to be empty")]
    EmptyDataset,
    #[error("Please select: {}", .missing.join(", "))]
    IncompleteMapping { missing: Vec<String> },
    #[error("Error interpreting column '{column}': {reason}")]
    SignalInterpretation { column: String, reason: String },
    #[error("Identifier column '{column}' required for duplicate detection was not found")]
    MissingIdentifierColumn { column: String },
    #[error("Column '{column}' mapped to {role} was not found in the dataset")]
    UnknownColumn { role: String, column: String },
}

impl SummaryError {
    pub fn file_read<E: std::fmt::Display>(err: E) -> Self {
        SummaryError::FileRead(err.to_string())
    }
}
