//! Line propagation across the commit history.
//!
//! `track_line` answers: line N of a file at commit A corresponds to which
//! line at commit B? The fast path is blame equality (the line was never
//! touched in between). Otherwise the per-file history is bisected down to
//! adjacent touching commits, and the containing hunk is mapped through the
//! character-level alignment in align.rs.
//!
//! A line that stops being trackable (deleted in some intermediate commit)
//! yields a partial result: the furthest commit reached plus the line number
//! there. Callers detect this by comparing the reached commit with the
//! requested target.

use git2::{Oid, Repository};

use crate::error::{AppError, Result};
use crate::git::align::map_line;
use crate::git::history::{blame_batch, FileHistory};
use crate::git::repository::GitRepository;
use crate::git::slice::file_slice;

/// Where a tracked line ended up.
#[derive(Debug, Clone, Copy)]
pub struct TrackedLine {
    pub commit: Oid,
    pub line: usize,
}

impl GitRepository {
    /// Propagate `line` (1-based) of `path` from commit `from` to commit
    /// `to`. Partial success returns an intermediate commit instead of `to`.
    pub fn track_line(&self, path: &str, from: &str, to: &str, line: usize) -> Result<TrackedLine> {
        let path = path.to_string();
        self.with_history(&path, |history, repo| {
            let source = resolve_commit(repo, from)?;
            let target = resolve_commit(repo, to)?;
            tracing::debug!("Tracking {}:{} from {} to {}", path, line, source, target);
            track_between(repo, history, &path, source, target, line)
        })
    }
}

fn resolve_commit(repo: &Repository, refspec: &str) -> Result<Oid> {
    repo.revparse_single(refspec)
        .and_then(|obj| obj.peel_to_commit())
        .map(|commit| commit.id())
        .map_err(|_| AppError::CommitNotFound(refspec.to_string()))
}

fn track_between(
    repo: &Repository,
    history: &FileHistory,
    path: &str,
    source: Oid,
    target: Oid,
    source_lineno: usize,
) -> Result<TrackedLine> {
    // In the simplest case, a line in the target commit will have the same
    // blame info as the line in question in the source commit.
    let blame_vectors = blame_batch(repo, &[source, target], path)?;
    let source_blame = &blame_vectors[0];
    let target_blame = &blame_vectors[1];

    if source_lineno < 1 || source_lineno > source_blame.len() {
        return Err(AppError::InvalidLine {
            line: source_lineno,
            commit: source.to_string(),
        });
    }
    let origin = source_blame[source_lineno - 1];
    for (i, blame) in target_blame.iter().enumerate() {
        if *blame == origin {
            return Ok(TrackedLine {
                commit: target,
                line: i + 1,
            });
        }
    }

    // Either the line has been deleted or it has mutated. Track explicitly,
    // one touching commit at a time, bisecting the history in between.
    let index_source = history.commit_index(repo, source)? - 1;
    let index_target = history.commit_index(repo, target)? - 1;

    if index_source + 1 < index_target {
        let middle = history.records[(index_source + index_target) / 2].oid;
        let reached = track_between(repo, history, path, source, middle, source_lineno)?;
        if reached.commit != middle {
            // We were unable to fully propagate the line number, so bail.
            return Ok(reached);
        }
        return track_between(repo, history, path, middle, target, reached.line);
    }

    for hunk in &history.records[index_target].hunks {
        if source_lineno >= hunk.old_start && source_lineno < hunk.old_start + hunk.old_length {
            if hunk.new_length == 0 {
                // The line was deleted, so we cannot propagate anymore.
                return Ok(TrackedLine {
                    commit: source,
                    line: source_lineno,
                });
            }
            let source_lines = file_slice(repo, source, path, hunk.old_start, hunk.old_length)?;
            let target_lines = file_slice(repo, target, path, hunk.new_start, hunk.new_length)?;
            let result = map_line(&source_lines, &target_lines, source_lineno - hunk.old_start + 1)?;
            return Ok(TrackedLine {
                commit: target,
                line: result + hunk.new_start - 1,
            });
        }
    }

    // A line not covered by any hunk is untouched and the blame shortcut
    // must already have fired.
    Err(AppError::Internal(format!(
        "no hunk of {} contains line {} of {}",
        target, source_lineno, path
    )))
}
