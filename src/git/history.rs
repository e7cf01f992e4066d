//! Per-file commit history and blame vectors.
//!
//! Provides the history index the line tracker runs on:
//! - `FileHistory`: ordered list of commits touching a path, each with the
//!   hunks of its change relative to the previous touching commit
//! - `HistoryCache`: per-path histories, built lazily, invalidated when HEAD
//!   moves
//! - `blame_batch`: per-line `(origin_commit, origin_line)` vectors bounded
//!   at a given commit
//!
//! Used by: `GitRepository::track_line()` in track.rs and the blame route

use git2::{BlameOptions, DiffOptions, Oid, Repository, Sort};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};

/// One contiguous change in a commit's diff for a single file.
/// Line offsets are 1-based; a length of 0 marks a pure insertion/deletion.
#[derive(Debug, Clone, Copy)]
pub struct Hunk {
    pub old_start: usize,
    pub old_length: usize,
    pub new_start: usize,
    pub new_length: usize,
}

/// A commit that touched the file, with its hunks against the previous
/// touching commit's version of the file.
#[derive(Debug, Clone)]
pub struct FileCommitRecord {
    pub oid: Oid,
    pub hunks: Vec<Hunk>,
}

/// Ordered (oldest first, ancestry-respecting) history of one file.
#[derive(Debug, Clone)]
pub struct FileHistory {
    pub records: Vec<FileCommitRecord>,
    /// oid -> 1-based position in `records`
    index_by_oid: HashMap<Oid, usize>,
}

impl FileHistory {
    /// 1-based position of `commit` within the file history. A commit that
    /// did not itself touch the file resolves to its newest file-touching
    /// ancestor; the file content at both is identical.
    pub fn commit_index(&self, repo: &Repository, commit: Oid) -> Result<usize> {
        if let Some(&index) = self.index_by_oid.get(&commit) {
            return Ok(index);
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.push(commit)?;

        for oid in revwalk {
            let oid = oid?;
            if let Some(&index) = self.index_by_oid.get(&oid) {
                return Ok(index);
            }
        }

        Err(AppError::CommitNotFound(commit.to_string()))
    }
}

/// Main history cache structure. One per repository, guarded by the
/// repository wrapper's mutex.
pub struct HistoryCache {
    /// path -> file history (lazily populated)
    per_path: HashMap<String, FileHistory>,
    /// HEAD commit OID when the cache was created
    head_oid: Oid,
}

impl HistoryCache {
    pub fn new(repo: &Repository) -> Result<Self> {
        let head_oid = repo.head()?.peel_to_commit()?.id();
        Ok(Self {
            per_path: HashMap::new(),
            head_oid,
        })
    }

    /// Check if the cache is still valid
    pub fn is_valid(&self, repo: &Repository) -> bool {
        match repo.head().and_then(|h| h.peel_to_commit()) {
            Ok(head_commit) => head_commit.id() == self.head_oid,
            Err(_) => false,
        }
    }

    /// Get or build the history for a path (expensive on first use - walks
    /// all commits and diffs each touching one)
    pub fn file_history(&mut self, repo: &Repository, path: &str) -> Result<&FileHistory> {
        if !self.per_path.contains_key(path) {
            tracing::info!("Building file history for: {}", path);
            let start = std::time::Instant::now();
            let history = build_file_history(repo, path)?;
            tracing::info!(
                "File history built: {} commits in {:?}",
                history.records.len(),
                start.elapsed()
            );
            self.per_path.insert(path.to_string(), history);
        }

        Ok(self.per_path.get(path).unwrap())
    }
}

fn build_file_history(repo: &Repository, path: &str) -> Result<FileHistory> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
    revwalk.push_head()?;

    let mut records: Vec<FileCommitRecord> = Vec::new();
    let mut index_by_oid = HashMap::new();
    let mut previous_tree: Option<git2::Tree> = None;

    for oid in revwalk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        let tree = commit.tree()?;

        // A commit touches the file when the blob it stores for the path
        // differs from its first parent's (including appearing or vanishing).
        let entry_id = file_entry_id(&tree, path);
        let parent_entry_id = match commit.parent(0) {
            Ok(parent) => file_entry_id(&parent.tree()?, path),
            Err(_) => None,
        };
        if entry_id == parent_entry_id {
            continue;
        }

        // Hunks are relative to the previous touching commit, not the first
        // parent: intermediate commits leave the file untouched.
        let hunks = diff_hunks(repo, previous_tree.as_ref(), &tree, path)?;

        index_by_oid.insert(oid, records.len() + 1);
        records.push(FileCommitRecord { oid, hunks });
        previous_tree = Some(tree);
    }

    Ok(FileHistory {
        records,
        index_by_oid,
    })
}

fn file_entry_id(tree: &git2::Tree, path: &str) -> Option<Oid> {
    tree.get_path(Path::new(path)).ok().map(|entry| entry.id())
}

/// Zero-context hunks of `path` between two trees. Zero context keeps the
/// old side of each hunk to exactly the replaced lines, which the hunk
/// containment test in the propagator relies on.
fn diff_hunks(
    repo: &Repository,
    old_tree: Option<&git2::Tree>,
    new_tree: &git2::Tree,
    path: &str,
) -> Result<Vec<Hunk>> {
    let mut opts = DiffOptions::new();
    opts.pathspec(path);
    opts.context_lines(0);

    let diff = repo.diff_tree_to_tree(old_tree, Some(new_tree), Some(&mut opts))?;

    let mut hunks = Vec::new();
    if diff.deltas().len() == 0 {
        return Ok(hunks);
    }

    if let Some(patch) = git2::Patch::from_diff(&diff, 0)? {
        for hunk_idx in 0..patch.num_hunks() {
            let (hunk, _) = patch.hunk(hunk_idx)?;
            hunks.push(Hunk {
                old_start: hunk.old_start() as usize,
                old_length: hunk.old_lines() as usize,
                new_start: hunk.new_start() as usize,
                new_length: hunk.new_lines() as usize,
            });
        }
    }

    Ok(hunks)
}

/// Where a line was last written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlameOrigin {
    pub commit: Oid,
    pub line: usize,
}

/// Per-line blame vector for `path` at `commit`, 1-based via index + 1.
pub fn blame_vector(repo: &Repository, commit: Oid, path: &str) -> Result<Vec<BlameOrigin>> {
    let mut opts = BlameOptions::new();
    opts.newest_commit(commit);

    let blame = repo
        .blame_file(Path::new(path), Some(&mut opts))
        .map_err(|_| AppError::BlameUnavailable(format!("{}:{}", commit, path)))?;

    let mut vector: Vec<BlameOrigin> = Vec::new();
    for hunk in blame.iter() {
        let final_start = hunk.final_start_line();
        for offset in 0..hunk.lines_in_hunk() {
            let index = final_start - 1 + offset;
            if vector.len() <= index {
                vector.resize(
                    index + 1,
                    BlameOrigin {
                        commit: Oid::zero(),
                        line: 0,
                    },
                );
            }
            vector[index] = BlameOrigin {
                commit: hunk.orig_commit_id(),
                line: hunk.orig_start_line() + offset,
            };
        }
    }

    Ok(vector)
}

/// Blame vectors for several commits of the same file in one call.
pub fn blame_batch(repo: &Repository, commits: &[Oid], path: &str) -> Result<Vec<Vec<BlameOrigin>>> {
    commits
        .iter()
        .map(|&commit| blame_vector(repo, commit, path))
        .collect()
}
