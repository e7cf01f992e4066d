//! API route handlers - maps HTTP endpoints to git operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repos`: Repository listing and metadata (GET /api/v1/repos)
//! - `track`: Line propagation between commits
//! - `blame`: Per-line origin vectors

pub mod blame;
pub mod repos;
pub mod track;

use axum::Router;

use crate::git::SharedRepos;

pub fn create_router(repos: SharedRepos) -> Router {
    Router::new()
        .merge(repos::routes(repos.clone()))
        .merge(track::routes(repos.clone()))
        .merge(blame::routes(repos))
}
