//! Contiguous line slices of a file at a specific commit.
//!
//! Thin façade over blob lookup: resolves `(commit, path)` to a blob, splits
//! on `\n`, and returns a 1-based line range. `start + length` may name the
//! synthetic one-past-end position so pure insertions can ask for an empty
//! slice at the end of the file.

use std::path::Path;

use git2::Repository;

use crate::error::{AppError, Result};

/// Return lines `start ..= start + length - 1` (1-based) of `path` at `commit`.
pub fn file_slice(
    repo: &Repository,
    commit: git2::Oid,
    path: &str,
    start: usize,
    length: usize,
) -> Result<Vec<String>> {
    let content = blob_content(repo, commit, path)?;
    let lines: Vec<&str> = content.split('\n').collect();

    if start >= 1 && start + length <= lines.len() + 1 {
        Ok(lines[start - 1..start - 1 + length]
            .iter()
            .map(|l| l.to_string())
            .collect())
    } else {
        Err(AppError::OutOfRange {
            path: path.to_string(),
            start,
            length,
        })
    }
}

fn blob_content(repo: &Repository, commit: git2::Oid, path: &str) -> Result<String> {
    let commit = repo
        .find_commit(commit)
        .map_err(|_| AppError::CommitNotFound(commit.to_string()))?;
    let tree = commit.tree()?;

    let entry = tree
        .get_path(Path::new(path))
        .map_err(|_| AppError::PathNotFound(path.to_string()))?;

    let obj = entry.to_object(repo)?;
    let blob = obj
        .as_blob()
        .ok_or_else(|| AppError::NotABlob(format!("{}:{}", commit.id(), path)))?;

    String::from_utf8(blob.content().to_vec())
        .map_err(|_| AppError::Internal("File is not valid UTF-8".to_string()))
}
