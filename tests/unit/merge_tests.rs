/*!
 * Tests for merging identical consecutive cues
 */

use subclean::cleaner::{merge_identical_consecutive_cues, CleaningOperation, CleaningStats};
use crate::common;

/// Test the three cue run merging into one spanning cue
#[test]
fn test_merge_withThreeIdenticalCues_shouldSpanWholeRun() {
    let mut subtitles = common::collection_from_texts(&["Okay.", "Okay.", "Okay."]);
    let mut stats = CleaningStats::new();

    let removed = merge_identical_consecutive_cues(&mut subtitles, &mut stats);

    assert_eq!(removed, 2);
    assert_eq!(subtitles.entries.len(), 1);
    assert_eq!(subtitles.entries[0].start_time_ms, 0);
    assert_eq!(subtitles.entries[0].end_time_ms, 3000);
    assert_eq!(subtitles.entries[0].seq_num, 1);
    assert_eq!(stats.count(CleaningOperation::CuesMerged), 2);
}

/// Test that only adjacent duplicates merge
#[test]
fn test_merge_withSeparatedDuplicates_shouldKeepBoth() {
    let mut subtitles = common::collection_from_texts(&["A", "B", "A"]);
    let mut stats = CleaningStats::new();

    assert_eq!(merge_identical_consecutive_cues(&mut subtitles, &mut stats), 0);
    assert_eq!(subtitles.entries.len(), 3);
    assert_eq!(stats.count(CleaningOperation::CuesMerged), 0);
}

/// Test several runs in one pass with renumbering
#[test]
fn test_merge_withTwoRuns_shouldReindexSurvivors() {
    let mut subtitles = common::collection_from_texts(&["A", "A", "B", "C", "C"]);
    let mut stats = CleaningStats::new();

    assert_eq!(merge_identical_consecutive_cues(&mut subtitles, &mut stats), 2);

    let summary: Vec<(usize, &str, u64, u64)> = subtitles
        .entries
        .iter()
        .map(|e| (e.seq_num, e.content.as_str(), e.start_time_ms, e.end_time_ms))
        .collect();
    assert_eq!(
        summary,
        vec![(1, "A", 0, 2000), (2, "B", 2000, 3000), (3, "C", 3000, 5000)]
    );
}

/// Test that content, not the match key, decides a merge
#[test]
fn test_merge_withSameMatchKeyDifferentContent_shouldNotMerge() {
    let mut subtitles = common::collection_from_texts(&["Okay.", "Okay"]);
    assert_eq!(subtitles.entries[0].clean_content, subtitles.entries[1].clean_content);

    let mut stats = CleaningStats::new();
    assert_eq!(merge_identical_consecutive_cues(&mut subtitles, &mut stats), 0);
}

#[test]
fn test_merge_withZeroOrOneCue_shouldBeNoOp() {
    let mut stats = CleaningStats::new();

    let mut empty = common::collection_from_texts(&[]);
    assert_eq!(merge_identical_consecutive_cues(&mut empty, &mut stats), 0);

    let mut single = common::collection_from_texts(&["Alone"]);
    assert_eq!(merge_identical_consecutive_cues(&mut single, &mut stats), 0);
    assert_eq!(single.entries.len(), 1);
    assert_eq!(stats.total(), 0);
}
