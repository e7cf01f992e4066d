//! Repository metadata DTOs.
//!
//! - `RepositoryInfo`: one configured repository (header display, repo list)

use serde::{Deserialize, Serialize};

use super::CommitInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub path: String,
    pub head_branch: Option<String>,
    pub head_commit: Option<CommitInfo>,
    pub is_bare: bool,
    pub is_empty: bool,
}
