//! Line-tracking endpoint.
//!
//! GET /api/v1/repos/{name}/track?path=<path>&from=<commit>&to=<commit>&line=<n>
//!
//! Propagates a 1-based line number from one commit to another. On full
//! success the returned commit equals `to`; when the line was deleted on the
//! way, the response carries the furthest commit reached and
//! `reached_target: false`.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::git::repository::commit_to_info;
use crate::git::SharedRepos;
use crate::models::TrackResponse;

pub fn routes(repos: SharedRepos) -> Router {
    Router::new()
        .route("/api/v1/repos/:name/track", get(track_line))
        .with_state(repos)
}

#[derive(Debug, Deserialize)]
struct TrackQuery {
    path: String,
    from: String,
    to: String,
    line: usize,
}

async fn track_line(
    State(repos): State<SharedRepos>,
    Path(name): Path<String>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<TrackResponse>> {
    let repo = repos.get(&name)?;

    let tracked = repo.track_line(&query.path, &query.from, &query.to, query.line)?;

    let (commit, target) = repo.with_repo(|r| {
        let reached = r
            .find_commit(tracked.commit)
            .map_err(|_| AppError::CommitNotFound(tracked.commit.to_string()))?;
        let target = r
            .revparse_single(&query.to)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| AppError::CommitNotFound(query.to.clone()))?;
        Ok((commit_to_info(&reached), target.id()))
    })?;

    Ok(Json(TrackResponse {
        path: query.path,
        from_commit: query.from,
        to_commit: query.to,
        reached_target: tracked.commit == target,
        commit,
        line: tracked.line,
    }))
}
