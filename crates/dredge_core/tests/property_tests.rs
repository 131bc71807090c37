//! Property-based tests for `dredge_core`.
//!
//! These tests verify invariants that should hold for all inputs,
//! catching edge cases that hand-written tests might miss.

use proptest::prelude::*;
use dredge_core::prelude::*;

/// One body line of a generated hunk.
#[derive(Debug, Clone)]
enum HunkLine {
    Context(String),
    Removed(String),
    Added(String),
}

fn hunk_line() -> impl Strategy<Value = HunkLine> {
    // Content avoids newlines so each value stays a single diff line.
    let content = "[a-zA-Z0-9 =_.\"-]{0,40}";
    prop_oneof![
        content.prop_map(HunkLine::Context),
        content.prop_map(HunkLine::Removed),
        content.prop_map(HunkLine::Added),
    ]
}

/// Renders a one-file, one-hunk diff from generated body lines and returns
/// the diff text plus the expected added lines with their line numbers.
fn render_diff(lines: &[HunkLine]) -> (String, Vec<(u32, String)>) {
    let old_count = lines
        .iter()
        .filter(|l| matches!(l, HunkLine::Context(_) | HunkLine::Removed(_)))
        .count();
    let new_count = lines
        .iter()
        .filter(|l| matches!(l, HunkLine::Context(_) | HunkLine::Added(_)))
        .count();

    let mut diff = String::from("diff --git a/file.txt b/file.txt\n--- a/file.txt\n+++ b/file.txt\n");
    diff.push_str(&format!("@@ -1,{old_count} +1,{new_count} @@\n"));

    let mut expected = Vec::new();
    let mut line_number = 1u32;

    for line in lines {
        match line {
            HunkLine::Context(content) => {
                diff.push_str(&format!(" {content}\n"));
                line_number += 1;
            }
            HunkLine::Removed(content) => {
                diff.push_str(&format!("-{content}\n"));
            }
            HunkLine::Added(content) => {
                diff.push_str(&format!("+{content}\n"));
                expected.push((line_number, content.clone()));
                line_number += 1;
            }
        }
    }

    (diff, expected)
}

proptest! {
    /// The parser never panics, whatever text it is handed.
    #[test]
    fn diff_parse_is_total_over_arbitrary_text(raw in "\\PC*") {
        let _ = dredge_core::diff::parse(&raw);
    }

    /// Every generated added line comes back, with the right number, and
    /// nothing else does.
    #[test]
    fn diff_parse_returns_exactly_the_added_lines(lines in prop::collection::vec(hunk_line(), 0..30)) {
        let (diff, expected) = render_diff(&lines);
        let files = dredge_core::diff::parse(&diff);

        let parsed: Vec<(u32, String)> = files
            .iter()
            .flat_map(|f| f.added.iter().map(|l| (l.line_number, l.content.clone())))
            .collect();

        prop_assert_eq!(parsed, expected);
    }

    /// Added-line numbering is strictly increasing within a hunk.
    #[test]
    fn diff_parse_line_numbers_strictly_increase(lines in prop::collection::vec(hunk_line(), 1..30)) {
        let (diff, _) = render_diff(&lines);
        let files = dredge_core::diff::parse(&diff);

        for file in &files {
            for pair in file.added.windows(2) {
                prop_assert!(pair[0].line_number < pair[1].line_number);
            }
        }
    }

    /// Same content always produces the same fingerprint.
    #[test]
    fn fingerprint_is_deterministic(s in "\\PC*") {
        let a = Fingerprint::of(&s);
        let b = Fingerprint::of(&s);

        prop_assert_eq!(a.short(), b.short());
        prop_assert_eq!(a.as_str(), b.as_str());
    }

    /// A scan never reports the same content twice within one context.
    #[test]
    fn scan_never_duplicates_content_within_a_run(
        contents in prop::collection::vec("AKIA[0-9A-Z]{16}", 1..20)
    ) {
        let patterns = PatternSet::from_json(r#"{"aws_key": "AKIA[0-9A-Z]{16}"}"#).unwrap();
        let pr = PullRequestRef {
            number: 1,
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            title: "t".into(),
            author: "a".into(),
        };

        let added: Vec<AddedLine> = contents
            .iter()
            .enumerate()
            .map(|(i, c)| AddedLine { line_number: (i + 1) as u32, content: c.clone() })
            .collect();

        let mut ctx = ScanContext::new();
        let findings = scan_file("f.txt", &added, &patterns, &mut ctx, &pr);

        let mut reported: Vec<&str> = findings.iter().map(|f| f.content.as_str()).collect();
        reported.sort_unstable();
        reported.dedup();

        prop_assert_eq!(reported.len(), findings.len());
    }
}
