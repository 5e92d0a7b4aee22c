//! # models::commentary
//!
//! Shape of the `aiAnalysis` block. The values are produced by
//! [`crate::engine::commentary`]; nothing here calls a model.

use serde::{Deserialize, Serialize};

/// One persona's take on the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    /// Persona display name
    pub name: String,
    /// Short qualitative label, e.g. `"偏多"`
    pub view: String,
    /// One-sentence rationale
    pub desc: String,
    /// Confidence in `0..=100`
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinions {
    pub gemini: Opinion,
    pub gpt: Opinion,
    pub deepseek: Opinion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryBlock {
    pub opinions: Opinions,
    pub summary: String,
}
