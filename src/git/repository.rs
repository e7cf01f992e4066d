//! Thread-safe git repository wrapper and the named-repository registry.
//!
//! Provides `GitRepository` struct that wraps libgit2's Repository with:
//! - Mutex for thread-safe access (libgit2 Repository is not thread-safe)
//! - File history cache for line tracking (lazily initialized)
//! - Helper methods for common operations
//!
//! `RepoRegistry` maps the configured repository names to their wrappers.
//! Used by: All route handlers via `SharedRepos` (Arc<RepoRegistry>)

use git2::Repository;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::git::history::{FileHistory, HistoryCache};
use crate::models::{CommitInfo, RepositoryInfo};

pub struct GitRepository {
    pub repo: Mutex<Repository>,
    pub name: String,
    pub path: String,
    /// File history cache for line tracking (lazily initialized)
    history: Mutex<Option<HistoryCache>>,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(name: &str, path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| {
            AppError::Internal(format!("Unable to open repository {} at {}", name, path_str))
        })?;

        Ok(Self {
            repo: Mutex::new(repo),
            name: name.to_string(),
            path: path_str,
            history: Mutex::new(None),
        })
    }

    pub fn with_repo<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        let repo = self
            .repo
            .lock()
            .map_err(|_| AppError::Internal("Repo lock poisoned".to_string()))?;
        f(&repo)
    }

    /// Run `f` against the file history for `path`, (re)building the cache
    /// if HEAD has changed
    pub fn with_history<F, T>(&self, path: &str, f: F) -> Result<T>
    where
        F: FnOnce(&FileHistory, &Repository) -> Result<T>,
    {
        let repo = self
            .repo
            .lock()
            .map_err(|_| AppError::Internal("Repo lock poisoned".to_string()))?;
        let mut cache_guard = self
            .history
            .lock()
            .map_err(|_| AppError::Internal("History lock poisoned".to_string()))?;

        // Check if we need to (re)build the cache
        let needs_rebuild = match cache_guard.as_ref() {
            None => true,
            Some(cache) => !cache.is_valid(&repo),
        };

        if needs_rebuild {
            *cache_guard = Some(HistoryCache::new(&repo)?);
        }

        let cache = cache_guard.as_mut().unwrap();
        let history = cache.file_history(&repo, path)?;
        f(history, &repo)
    }

    pub fn info(&self) -> Result<RepositoryInfo> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| AppError::Internal("Repo lock poisoned".to_string()))?;

        let head_branch = repo.head().ok().and_then(|h| {
            if h.is_branch() {
                h.shorthand().map(|s| s.to_string())
            } else {
                None
            }
        });

        let head_commit = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok().map(|c| commit_to_info(&c)));

        Ok(RepositoryInfo {
            name: self.name.clone(),
            path: self.path.clone(),
            head_branch,
            head_commit,
            is_bare: repo.is_bare(),
            is_empty: repo.is_empty().unwrap_or(true),
        })
    }
}

/// Named repositories from the service configuration.
pub struct RepoRegistry {
    repos: HashMap<String, Arc<GitRepository>>,
}

impl RepoRegistry {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut repos = HashMap::new();
        for repo_config in &config.repos {
            let repo = GitRepository::open(&repo_config.name, &repo_config.path)?;
            repos.insert(repo_config.name.clone(), Arc::new(repo));
        }
        Ok(Self { repos })
    }

    pub fn get(&self, name: &str) -> Result<Arc<GitRepository>> {
        self.repos
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::RepoUnknown(name.to_string()))
    }

    pub fn list(&self) -> Vec<Arc<GitRepository>> {
        let mut repos: Vec<_> = self.repos.values().cloned().collect();
        repos.sort_by(|a, b| a.name.cmp(&b.name));
        repos
    }
}

/// Condense a commit to the metadata the API responses carry: oid, summary
/// line, author name, and author timestamp.
pub fn commit_to_info(commit: &git2::Commit) -> CommitInfo {
    CommitInfo {
        oid: commit.id().to_string(),
        summary: commit.summary().unwrap_or_default().to_string(),
        author: commit.author().name().unwrap_or_default().to_string(),
        timestamp: commit.time().seconds(),
    }
}

pub type SharedRepos = Arc<RepoRegistry>;
