//! Line-tracking DTOs.
//!
//! Response for the track endpoint: where a line ended up. `reached_target`
//! is false when propagation stopped at an intermediate commit (the line was
//! deleted on the way); `commit` then names that commit instead of the
//! requested target.

use serde::{Deserialize, Serialize};

use super::CommitInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    /// Path of the tracked file
    pub path: String,
    /// Commit the line number was given in
    pub from_commit: String,
    /// Commit the line number was requested for
    pub to_commit: String,
    /// Commit actually reached (equals `to_commit` on full success)
    pub commit: CommitInfo,
    /// Line number (1-indexed) in the reached commit's version of the file
    pub line: usize,
    pub reached_target: bool,
}
