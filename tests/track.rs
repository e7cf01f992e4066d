//! End-to-end tests for line tracking across real commit histories.

mod support;

use line_tracker_backend::error::AppError;
use line_tracker_backend::git::GitRepository;
use support::TestRepo;

fn open(test_repo: &TestRepo) -> GitRepository {
    GitRepository::open("test", test_repo.path()).unwrap()
}

#[test]
fn untouched_line_propagates_via_blame_shortcut() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\n", "initial");
    test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\ndelta\n", "append delta");
    let c3 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\ndelta\nepsilon\n", "append epsilon");

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("a.txt", &c1.to_string(), &c3.to_string(), 1)
        .unwrap();

    assert_eq!(tracked.commit, c3);
    assert_eq!(tracked.line, 1);
}

#[test]
fn insertion_above_shifts_the_line_number() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\n", "initial");
    let c2 = test_repo.commit_file(
        "a.txt",
        "intro\npreface\nalpha\nbeta\ngamma\n",
        "insert two lines on top",
    );

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("a.txt", &c1.to_string(), &c2.to_string(), 2)
        .unwrap();

    assert_eq!(tracked.commit, c2);
    assert_eq!(tracked.line, 4);
}

#[test]
fn insertion_below_keeps_the_line_number() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\n", "initial");
    let c2 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\ndelta\n", "append");

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("a.txt", &c1.to_string(), &c2.to_string(), 2)
        .unwrap();

    assert_eq!(tracked.commit, c2);
    assert_eq!(tracked.line, 2);
}

#[test]
fn edited_line_maps_through_the_containing_hunk() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file(
        "lib.rs",
        "fn compute() {\n    let total = 1;\n}\n",
        "initial",
    );
    let c2 = test_repo.commit_file(
        "lib.rs",
        "// compute things\nfn compute() {\n    let total = 2;\n}\n",
        "comment and bump",
    );

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("lib.rs", &c1.to_string(), &c2.to_string(), 2)
        .unwrap();

    assert_eq!(tracked.commit, c2);
    assert_eq!(tracked.line, 3);
}

#[test]
fn repeated_edits_bisect_through_the_history() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file(
        "lib.rs",
        "fn compute() {\n    let total = 1;\n}\n",
        "initial",
    );
    test_repo.commit_file(
        "lib.rs",
        "// compute things\nfn compute() {\n    let total = 2;\n}\n",
        "comment and bump",
    );
    test_repo.commit_file(
        "lib.rs",
        "// compute things\nfn compute() {\n    let total = 3;\n}\n",
        "bump again",
    );
    let c4 = test_repo.commit_file(
        "lib.rs",
        "// compute things\nfn compute() {\n    let total = 4;\n}\n",
        "bump once more",
    );

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("lib.rs", &c1.to_string(), &c4.to_string(), 2)
        .unwrap();

    assert_eq!(tracked.commit, c4);
    assert_eq!(tracked.line, 3);
}

#[test]
fn deleted_line_stops_at_the_predecessor() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\ndelta\n", "initial");
    let c2 = test_repo.commit_file("a.txt", "alpha\nbeta\ndelta\n", "drop gamma");

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("a.txt", &c1.to_string(), &c2.to_string(), 3)
        .unwrap();

    // Partial success: the line no longer exists at c2, so the tracker
    // reports the last commit where it did.
    assert_eq!(tracked.commit, c1);
    assert_eq!(tracked.line, 3);
}

#[test]
fn deletion_mid_chain_reports_the_furthest_commit_reached() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file(
        "lib.rs",
        "fn compute() {\n    let total = 1;\n    total\n}\n",
        "initial",
    );
    let c2 = test_repo.commit_file(
        "lib.rs",
        "fn compute() {\n    let total = 11;\n    total\n}\n",
        "edit tracked line",
    );
    test_repo.commit_file(
        "lib.rs",
        "fn compute() {\n    total\n}\n",
        "delete tracked line",
    );
    let c4 = test_repo.commit_file(
        "lib.rs",
        "fn compute() {\n    total\n}\n\n// trailing note\n",
        "unrelated append",
    );

    let repo = open(&test_repo);
    let tracked = repo
        .track_line("lib.rs", &c1.to_string(), &c4.to_string(), 2)
        .unwrap();

    assert_eq!(tracked.commit, c2);
    assert_eq!(tracked.line, 2);
}

#[test]
fn out_of_range_source_line_is_rejected() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\nbeta\n", "initial");
    let c2 = test_repo.commit_file("a.txt", "alpha\nbeta\ngamma\n", "append");

    let repo = open(&test_repo);
    let result = repo.track_line("a.txt", &c1.to_string(), &c2.to_string(), 99);

    assert!(matches!(result, Err(AppError::InvalidLine { line: 99, .. })));
}

#[test]
fn unknown_commit_is_rejected() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\n", "initial");

    let repo = open(&test_repo);
    let result = repo.track_line(
        "a.txt",
        &c1.to_string(),
        "0123456789abcdef0123456789abcdef01234567",
        1,
    );

    assert!(matches!(result, Err(AppError::CommitNotFound(_))));
}

#[test]
fn missing_file_yields_no_blame() {
    let test_repo = TestRepo::new();
    let c1 = test_repo.commit_file("a.txt", "alpha\n", "initial");

    let repo = open(&test_repo);
    let result = repo.track_line("nope.txt", &c1.to_string(), &c1.to_string(), 1);

    assert!(matches!(result, Err(AppError::BlameUnavailable(_))));
}
