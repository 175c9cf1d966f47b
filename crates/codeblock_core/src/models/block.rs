//! Code-block model shared with the owning document.

use crate::error::CodeBlockError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// A code block as stored in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub id: String,
    /// Language tag; empty means plain text.
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub content: String,
    /// Nesting level within the note.
    #[serde(default)]
    pub indent: u32,
}

impl Default for CodeBlock {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl CodeBlock {
    /// Creates a block with a fresh id and no indent.
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            language: language.into(),
            content: content.into(),
            indent: 0,
        }
    }

    /// Serializes the block as JSON.
    ///
    /// # Errors
    /// Returns [`CodeBlockError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, CodeBlockError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a block from JSON; missing optional fields take defaults.
    ///
    /// # Errors
    /// Returns [`CodeBlockError::Serialization`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, CodeBlockError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the block as pretty JSON to `path`.
    ///
    /// # Errors
    /// Returns an IO or serialization error.
    pub fn write_json(&self, path: &Path) -> Result<(), CodeBlockError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads a block previously written with [`Self::write_json`].
    ///
    /// # Errors
    /// Returns an IO or serialization error.
    pub fn read_json(path: &Path) -> Result<Self, CodeBlockError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
