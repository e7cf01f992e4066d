//! Blame data transfer objects.
//!
//! Exposes the per-line origin vector the line tracker's shortcut runs on:
//! for each line, the commit and line number where it was last written.

use serde::{Deserialize, Serialize};

/// Response for blame request on a file at a specific commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlameResponse {
    /// Path of the file
    pub path: String,
    /// Commit OID where blame was calculated
    pub commit: String,
    /// Per-line origin information
    pub lines: Vec<BlameLine>,
}

/// Origin of a single line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlameLine {
    /// Line number (1-indexed)
    pub line_number: usize,
    /// OID of the commit that last wrote this line
    pub origin_commit: String,
    /// Line number (1-indexed) the line had in the origin commit
    pub origin_line: usize,
}
