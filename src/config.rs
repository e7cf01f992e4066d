//! Repository registry configuration.
//!
//! The service is pointed at a JSON file listing the repositories it serves:
//!
//! ```json
//! { "repos": [ { "name": "linux", "path": "/srv/git/linux" } ] }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub repos: Vec<RepoConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    pub name: String,
    pub path: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&raw)?;
        Ok(config)
    }
}
