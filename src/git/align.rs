//! Character-level line alignment between the two sides of a hunk.
//!
//! `map_line` answers: given the old text of a hunk, the new text, and one
//! line in the old text we care about, which new line did that line become?
//!
//! The answer comes from a dynamic program over the joined characters of
//! both sides. Skipping a source character is cheap in general but expensive
//! for characters of the tracked line, so the alignment prefers to land the
//! tracked line somewhere in the target rather than drop it. A histogram
//! over the tracked line's character destinations picks the final line.

use crate::error::{AppError, Result};

/// Upper bound on the source window the quadratic DP runs on.
const SOURCE_CHUNK_MAX_CONTEXT: usize = 10;

const PENALTY_FOR_SKIPPING: i32 = 2;
const PENALTY_FOR_SKIPPING_IMPORTANT_LINE: i32 = 10;

/// Penalty for the gap left in the target between the landing spots of two
/// consecutive source characters.
fn penalty_for_distance(distance: usize) -> i32 {
    match distance {
        0 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Map `source_lineno` (1-based within `source_lines`) to the best-matching
/// line of `target_lines` (1-based).
///
/// Both slices are the old/new text of a single hunk, so they are small;
/// oversized sources are truncated to a window around the tracked line
/// before the quadratic alignment runs.
pub fn map_line(
    source_lines: &[String],
    target_lines: &[String],
    source_lineno: usize,
) -> Result<usize> {
    if source_lineno < 1 || source_lineno > source_lines.len() {
        return Err(AppError::LineOutOfRange);
    }
    if target_lines.is_empty() {
        return Err(AppError::DeletionNotPropagatable);
    }
    if source_lines.len() > 8 {
        // Constrain the number of source lines we run on to avoid quadratic
        // blowup. The window never exceeds SOURCE_CHUNK_MAX_CONTEXT lines,
        // so the recursion terminates after one step.
        let new_start = source_lineno.saturating_sub(SOURCE_CHUNK_MAX_CONTEXT / 2).max(1);
        let new_end = (source_lineno + SOURCE_CHUNK_MAX_CONTEXT / 2).min(source_lines.len());
        return map_line(
            &source_lines[new_start - 1..new_end - 1],
            target_lines,
            source_lineno - new_start + 1,
        );
    }

    let source_chars = source_lines.join("\n").into_bytes();
    let target_chars = target_lines.join("\n").into_bytes();

    // Character range of the tracked line within the joined source.
    let i1: usize = source_lines[..source_lineno - 1]
        .iter()
        .map(|l| l.len())
        .sum::<usize>()
        + source_lineno.saturating_sub(2);
    let i2 = i1 + source_lines[source_lineno - 1].len();

    if source_chars.is_empty() || target_chars.is_empty() {
        return Ok(1);
    }

    // score[i][j] ===> penalty for mapping source_chars[i] to target_chars[j]
    // track[i][j] ===> where source_chars[i-1] mapped to, for that score
    let mut score = vec![vec![-1i32; target_chars.len()]; source_chars.len()];
    let mut track = vec![vec![-1i32; target_chars.len()]; source_chars.len()];

    for i in 0..source_chars.len() {
        let penalty_for_skipping_this_char = if i1 <= i && i < i2 {
            PENALTY_FOR_SKIPPING_IMPORTANT_LINE
        } else {
            PENALTY_FOR_SKIPPING
        };
        let source_char = source_chars[i];

        if i == 0 {
            for j in 0..target_chars.len() {
                if source_char == target_chars[j] {
                    score[i][j] = penalty_for_distance(j);
                } else if j == 0 {
                    score[i][j] = penalty_for_skipping_this_char;
                }
            }
        } else {
            let mut best_score = -1i32;
            let mut best_predecessor = -1i32;
            let mut k_restart = 0usize;
            for j in 0..target_chars.len() {
                if source_char == target_chars[j] {
                    for k in k_restart..j {
                        if score[i - 1][k] < 0 {
                            continue;
                        }
                        let candidate_score = score[i - 1][k] + penalty_for_distance(j - k);
                        if best_score == -1 || candidate_score < best_score {
                            best_score = candidate_score;
                            best_predecessor = k as i32;
                        }
                    }
                    k_restart = j;
                    score[i][j] = best_score;
                    track[i][j] = best_predecessor;
                } else if score[i - 1][j] > -1 {
                    score[i][j] = score[i - 1][j] + penalty_for_skipping_this_char;
                    track[i][j] = j as i32;
                }
            }
        }
    }

    // Track backwards through the predecessor table to recover, for each
    // source character, the target position it was assigned.
    let mut mapping = vec![-1i32; source_chars.len()];
    let mut cursor = 0i32;
    for i in (0..source_chars.len()).rev() {
        if i == source_chars.len() - 1 {
            let mut best_score = -1i32;
            for j in 0..target_chars.len() {
                let candidate_score =
                    score[i][j] + penalty_for_distance(target_chars.len() - 1 - j);
                if score[i][j] >= 0 && (best_score == -1 || best_score > candidate_score) {
                    best_score = candidate_score;
                    cursor = j as i32;
                }
            }
        } else if cursor >= 0 {
            cursor = track[i + 1][cursor as usize];
        }
        mapping[i] = cursor;
    }

    // Project the tracked line's character destinations onto target lines.
    // The mapping is non-decreasing, so a single pointer suffices.
    let mut target_line_beginnings = vec![0usize; target_lines.len() + 1];
    let mut target_line_histogram = vec![0usize; target_lines.len()];
    for (i, target_line) in target_lines.iter().enumerate() {
        target_line_beginnings[i + 1] = target_line_beginnings[i] + target_line.len() + 1;
    }
    let mut j = 0usize;
    for &m in &mapping[i1..i2] {
        while j < target_line_histogram.len() - 1 {
            if (target_line_beginnings[j] as i32) <= m && m < target_line_beginnings[j + 1] as i32 {
                break;
            }
            j += 1;
        }
        target_line_histogram[j] += 1;
    }

    let mut best_score = 0usize;
    let mut best_target_line = 0usize;
    for (i, &count) in target_line_histogram.iter().enumerate() {
        if best_score < count {
            best_score = count;
            best_target_line = i;
        }
    }
    Ok(best_target_line + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn source_fixture() -> Vec<String> {
        lines(&[
            "func my_function(arg1 int, arg2 int, arg3 string) {",
            "\t if (arg1 == arg2) {",
            "\t\t  log.Print(\"They are the same\")",
            "\t }",
            "\t log.Printf(\"Checked equality\")",
            "\t while (arg1 < arg2) {",
            "\t\t  arg1 += 1",
            "\t }",
            "\t log.Printf(\"Values are %d and %d\", arg1, arg2)",
            "}",
        ])
    }

    fn target_fixture() -> Vec<String> {
        lines(&[
            "// Comments",
            "func my_method(arg_a int, arg_b int, arg_c string) {",
            "\t if (arg_a == arg_b) {",
            "\t\t  log.Print(\"They are the same\")",
            "\t }",
            "\t while (arg_a < arg_b) { arg_a += 1 }",
            "\t log.Printf(\"Values are %d and %d\", arg_a, arg_b)",
            "\t log.Printf(\"Done!\")",
            "}",
        ])
    }

    #[test]
    fn maps_lines_through_a_rename_heavy_edit() {
        let source = source_fixture();
        let target = target_fixture();
        // Line 5 was deleted and maps to a neighbor; lines 6-8 were collapsed
        // into the one-line while loop.
        let expected = [
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 5),
            (6, 6),
            (7, 6),
            (8, 6),
            (9, 7),
            (10, 9),
        ];
        for (source_lineno, target_lineno) in expected {
            assert_eq!(
                map_line(&source, &target, source_lineno).unwrap(),
                target_lineno,
                "source line {} mapped wrong",
                source_lineno
            );
        }
    }

    #[test]
    fn identity_maps_every_line_to_itself() {
        let text = lines(&[
            "fn main() {",
            "    let x = 1;",
            "    let y = 2;",
            "    println!(\"{}\", x + y);",
            "}",
        ]);
        for k in 1..=text.len() {
            assert_eq!(map_line(&text, &text, k).unwrap(), k);
        }
    }

    #[test]
    fn result_stays_within_target_bounds() {
        let source = lines(&["alpha", "beta", "gamma", "delta"]);
        let target = lines(&["beta"]);
        for k in 1..=source.len() {
            let mapped = map_line(&source, &target, k).unwrap();
            assert!(mapped >= 1 && mapped <= target.len());
        }
    }

    #[test]
    fn mapping_is_monotone_without_crossing_moves() {
        let source = source_fixture();
        let target = target_fixture();
        let mut previous = 0;
        for k in 1..=source.len() {
            let mapped = map_line(&source, &target, k).unwrap();
            assert!(
                mapped >= previous,
                "line {} mapped to {} after {}",
                k,
                mapped,
                previous
            );
            previous = mapped;
        }
    }

    #[test]
    fn rejects_out_of_range_source_line() {
        let text = lines(&["one", "two"]);
        assert!(matches!(
            map_line(&text, &text, 0),
            Err(AppError::LineOutOfRange)
        ));
        assert!(matches!(
            map_line(&text, &text, 3),
            Err(AppError::LineOutOfRange)
        ));
    }

    #[test]
    fn rejects_empty_target() {
        let text = lines(&["one"]);
        assert!(matches!(
            map_line(&text, &[], 1),
            Err(AppError::DeletionNotPropagatable)
        ));
    }

    #[test]
    fn truncates_oversized_sources_around_the_tracked_line() {
        // 40 distinct lines, only a window around line 20 takes part in the
        // alignment; the tracked line itself still maps exactly.
        let source: Vec<String> = (1..=40).map(|i| format!("line number {:03}", i)).collect();
        let mut target = source.clone();
        target.insert(0, "// preamble".to_string());
        assert_eq!(map_line(&source, &target, 20).unwrap(), 21);
    }

    #[test]
    fn single_empty_lines_fall_back_to_line_one() {
        assert_eq!(
            map_line(&lines(&[""]), &lines(&["body"]), 1).unwrap(),
            1
        );
        assert_eq!(
            map_line(&lines(&["body", "tail"]), &lines(&[""]), 1).unwrap(),
            1
        );
    }

    #[test]
    fn unmatchable_source_falls_back_to_line_one() {
        let source = lines(&["@@@@"]);
        let target = lines(&["zzzz", "yyyy"]);
        assert_eq!(map_line(&source, &target, 1).unwrap(), 1);
    }
}
