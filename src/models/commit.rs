use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub oid: String,
    /// First line of the commit message
    pub summary: String,
    pub author: String,
    /// Author time, seconds since the epoch
    pub timestamp: i64,
}
