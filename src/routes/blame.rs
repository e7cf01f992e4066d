//! Blame endpoint.
//!
//! GET /api/v1/repos/{name}/blame?path=<path>&commit=<optional>
//!
//! Returns the per-line origin vector for a file at a specific commit
//! (default HEAD): for each line, the commit that last wrote it and the line
//! number it had there. This is the same vector the line tracker's blame
//! shortcut compares.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::git::history::blame_vector;
use crate::git::SharedRepos;
use crate::models::{BlameLine, BlameResponse};

pub fn routes(repos: SharedRepos) -> Router {
    Router::new()
        .route("/api/v1/repos/:name/blame", get(get_blame))
        .with_state(repos)
}

#[derive(Debug, Deserialize)]
struct BlameQuery {
    path: String,
    commit: Option<String>,
}

async fn get_blame(
    State(repos): State<SharedRepos>,
    Path(name): Path<String>,
    Query(query): Query<BlameQuery>,
) -> Result<Json<BlameResponse>> {
    let repo = repos.get(&name)?;

    let response = repo.with_repo(|r| {
        let refspec = query.commit.as_deref().unwrap_or("HEAD");
        let commit = r
            .revparse_single(refspec)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| AppError::CommitNotFound(refspec.to_string()))?
            .id();

        let lines = blame_vector(r, commit, &query.path)?
            .iter()
            .enumerate()
            .map(|(i, origin)| BlameLine {
                line_number: i + 1,
                origin_commit: origin.commit.to_string(),
                origin_line: origin.line,
            })
            .collect();

        Ok(BlameResponse {
            path: query.path.clone(),
            commit: commit.to_string(),
            lines,
        })
    })?;

    Ok(Json(response))
}
