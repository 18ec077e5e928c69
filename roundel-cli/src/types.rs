//! Serializable batch report types.

use serde::Serialize;

/// Outcome of processing a single input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    /// A card was written to the output path.
    Composited,
    /// The file was skipped by profile policy (non-square input).
    Skipped,
    /// Decoding, detection, or encoding failed for this file.
    Failed,
}

/// Per-file entry of the JSON batch report.
#[derive(Debug, Serialize)]
pub struct CardRecord {
    /// Source photo path.
    pub input: String,
    /// Written card path, when one was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Processing outcome.
    pub status: CardStatus,
    /// Framing decision label (already-square, face-centered, center-fallback).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framing: Option<&'static str>,
    /// Failure or skip cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
