pub mod align;
pub mod history;
pub mod repository;
pub mod slice;
pub mod track;

pub use repository::{GitRepository, RepoRegistry, SharedRepos};
