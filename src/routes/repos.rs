//! Repository info endpoints.
//!
//! GET /api/v1/repos - lists the configured repositories
//! GET /api/v1/repos/{name} - metadata for one repository:
//! name, path, current branch, HEAD commit, bare/empty status.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::git::SharedRepos;
use crate::models::RepositoryInfo;

pub fn routes(repos: SharedRepos) -> Router {
    Router::new()
        .route("/api/v1/repos", get(list_repos))
        .route("/api/v1/repos/:name", get(get_repo_info))
        .with_state(repos)
}

async fn list_repos(State(repos): State<SharedRepos>) -> Result<Json<Vec<RepositoryInfo>>> {
    let infos = repos
        .list()
        .iter()
        .map(|repo| repo.info())
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(infos))
}

async fn get_repo_info(
    State(repos): State<SharedRepos>,
    Path(name): Path<String>,
) -> Result<Json<RepositoryInfo>> {
    let repo = repos.get(&name)?;
    Ok(Json(repo.info()?))
}
