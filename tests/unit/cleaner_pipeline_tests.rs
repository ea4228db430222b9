/*!
 * Tests for the cleaning plan and the cue orchestrator
 */

use subclean::app_config::TextCleaningConfig;
use subclean::cleaner::{
    clean_text, CleaningOperation, CleaningPlan, CleaningStats, CleaningStep, CueGate,
    DelimiterPair, RemovalReason, Stage, StageOutcome,
};
use crate::common;

fn content(text: &str, changed: bool) -> StageOutcome {
    StageOutcome::Content { text: text.to_string(), changed }
}

/// Test that a default configuration builds an empty plan
#[test]
fn test_from_config_withDefaults_shouldBuildEmptyPlan() {
    let plan = CleaningPlan::from_config(&TextCleaningConfig::default());
    assert!(plan.is_empty());

    let mut stats = CleaningStats::new();
    assert_eq!(plan.clean_cue("  Hello  ", &mut stats), content("Hello", true));
    assert_eq!(stats.total(), 0);
}

/// Test that stage order is fixed regardless of which switches are on
#[test]
fn test_from_config_withEverythingEnabled_shouldOrderGatesThenEdits() {
    let mut config = common::all_enabled_config();
    config.custom_chars_to_remove = vec!["@".to_string()];

    let plan = CleaningPlan::from_config(&config);
    let operations: Vec<CleaningOperation> = plan.stages().iter().map(Stage::operation).collect();

    assert_eq!(
        operations,
        vec![
            CleaningOperation::CustomCharsRemoved,
            CleaningOperation::MusicNotesRemoved,
            CleaningOperation::FormattingTagsRemoved,
            CleaningOperation::SdhCleaned,
            CleaningOperation::SpeakerLabelsRemoved,
            CleaningOperation::DialogMarkersRemoved,
            CleaningOperation::LineBreaksRemoved,
            CleaningOperation::CurlyBracesCleaned,
            CleaningOperation::ParenthesesCleaned,
            CleaningOperation::SquareBracketsCleaned,
            CleaningOperation::AsterisksCleaned,
            CleaningOperation::HashtagsCleaned,
            CleaningOperation::UppercaseConverted,
        ]
    );
}

/// Test that only the configured delimiter pairs become stages
#[test]
fn test_from_config_withSomeDelimiters_shouldKeepSubOrder() {
    let config = TextCleaningConfig {
        remove_text_in_hashtags: true,
        remove_text_in_curly_braces: true,
        ..Default::default()
    };

    let plan = CleaningPlan::from_config(&config);
    assert_eq!(
        plan.stages(),
        &[
            Stage::Edit(CleaningStep::Delimiters(DelimiterPair::CurlyBraces)),
            Stage::Edit(CleaningStep::Delimiters(DelimiterPair::Hashtags)),
        ]
    );
}

/// Test that empty custom patterns do not produce a gate
#[test]
fn test_from_config_withOnlyEmptyCustomPattern_shouldSkipGate() {
    let config = TextCleaningConfig {
        custom_chars_to_remove: vec![String::new()],
        ..Default::default()
    };
    assert!(CleaningPlan::from_config(&config).is_empty());
}

/// Test that tag removal runs before speaker label removal
#[test]
fn test_clean_cue_withTagWrappedSpeakerLabel_shouldRemoveBoth() {
    let config = TextCleaningConfig {
        remove_formatting_tags: true,
        remove_speaker_labels: true,
        preserve_font_tags: false,
        ..Default::default()
    };
    let plan = CleaningPlan::from_config(&config);
    let mut stats = CleaningStats::new();

    assert_eq!(plan.clean_cue("<font>JOHN: hi</font>", &mut stats), content("hi", true));
    assert_eq!(stats.count(CleaningOperation::FormattingTagsRemoved), 1);
    assert_eq!(stats.count(CleaningOperation::SpeakerLabelsRemoved), 1);
}

/// Test that without tag removal the label is not recognised
#[test]
fn test_clean_cue_withTagRemovalDisabled_shouldLeaveWrappedLabel() {
    let config = TextCleaningConfig {
        remove_speaker_labels: true,
        ..Default::default()
    };
    let plan = CleaningPlan::from_config(&config);
    let mut stats = CleaningStats::new();

    let text = "<font>JOHN: hi</font>";
    assert_eq!(plan.clean_cue(text, &mut stats), content(text, false));
    assert_eq!(stats.total(), 0);
}

/// Test that the custom character gate stops evaluation
#[test]
fn test_clean_cue_withCustomCharAndMusicNote_shouldOnlyCountCustomGate() {
    let config = TextCleaningConfig {
        remove_music_notes: true,
        custom_chars_to_remove: vec!["@".to_string()],
        ..Default::default()
    };
    let plan = CleaningPlan::from_config(&config);
    let mut stats = CleaningStats::new();

    assert_eq!(
        plan.clean_cue("@ ♪ singing ♪", &mut stats),
        StageOutcome::Removed(RemovalReason::CustomChar)
    );
    assert_eq!(stats.count(CleaningOperation::CustomCharsRemoved), 1);
    assert_eq!(stats.count(CleaningOperation::MusicNotesRemoved), 0);
    assert_eq!(stats.total(), 1);
}

/// Test that gates look at the content before any edit
#[test]
fn test_clean_cue_withCustomPatternRemovedByLaterStep_shouldStillRemove() {
    let config = TextCleaningConfig {
        remove_formatting_tags: true,
        preserve_italic_tags: false,
        custom_chars_to_remove: vec!["<i>".to_string()],
        ..Default::default()
    };
    let plan = CleaningPlan::from_config(&config);
    let mut stats = CleaningStats::new();

    assert_eq!(
        plan.clean_cue("<i>Whisper</i>", &mut stats),
        StageOutcome::Removed(RemovalReason::CustomChar)
    );
    assert_eq!(stats.count(CleaningOperation::FormattingTagsRemoved), 0);
}

/// Test that the line break counter follows the input, not the output
#[test]
fn test_clean_cue_withLineBreak_shouldCountLineBreakRemoval() {
    let config = TextCleaningConfig {
        remove_line_breaks: true,
        ..Default::default()
    };
    let plan = CleaningPlan::from_config(&config);
    let mut stats = CleaningStats::new();

    assert_eq!(plan.clean_cue("Hello\nworld", &mut stats), content("Hello world", true));
    assert_eq!(plan.clean_cue("One line", &mut stats), content("One line", false));
    assert_eq!(stats.count(CleaningOperation::LineBreaksRemoved), 1);
}

/// Test the line break step on its own
#[test]
fn test_cleaning_step_withLineBreaksAndTrailingBreak_shouldReportChanged() {
    let outcome = CleaningStep::LineBreaks.apply("Hi\n");
    assert_eq!(outcome, content("Hi", true));
}

/// Test a gate stage passing content through
#[test]
fn test_stage_run_withGateNotTriggered_shouldPassContent() {
    let stage = Stage::Gate(CueGate::MusicNotes);
    assert_eq!(stage.run("No song"), content("No song", false));
    assert_eq!(stage.run("♪"), StageOutcome::Removed(RemovalReason::MusicNote));
}

/// Test that a second pass over cleaned text changes nothing
#[test]
fn test_clean_cue_withAlreadyCleanedText_shouldBeIdempotent() {
    let plan = CleaningPlan::from_config(&common::all_enabled_config());
    let mut stats = CleaningStats::new();

    let first = plan.clean_cue("<b>MARY: (laughs) Hello\nthere</b>", &mut stats);
    assert_eq!(first, content("Hello there", true));
    let counted = stats.total();

    let second = plan.clean_cue("Hello there", &mut stats);
    assert_eq!(second, content("Hello there", false));
    assert_eq!(stats.total(), counted);
}

/// Test that a shouted multi-step cue comes out in sentence case
#[test]
fn test_clean_cue_withDialogAndShouting_shouldNormalizeCase() {
    let plan = CleaningPlan::from_config(&common::all_enabled_config());
    let mut stats = CleaningStats::new();

    assert_eq!(
        plan.clean_cue("- GET OUT {now}!", &mut stats),
        content("Get out !", true)
    );
    assert_eq!(stats.count(CleaningOperation::DialogMarkersRemoved), 1);
    assert_eq!(stats.count(CleaningOperation::CurlyBracesCleaned), 1);
    assert_eq!(stats.count(CleaningOperation::UppercaseConverted), 1);
}

/// Test the orchestrator over a whole collection
#[test]
fn test_clean_text_withMixedCues_shouldMarkEditAndRecordDiffs() {
    common::init_test_logging();
    let config = TextCleaningConfig {
        remove_music_notes: true,
        remove_speaker_labels: true,
        ..Default::default()
    };
    let plan = CleaningPlan::from_config(&config);
    let mut stats = CleaningStats::new();
    let mut subtitles = common::collection_from_texts(&["JOHN: hi", "♪ la la ♪", "Untouched."]);

    clean_text(&mut subtitles, &plan, &mut stats);

    let entries = &subtitles.entries;
    assert_eq!(entries.len(), 3, "removal is only scheduled");
    assert_eq!(entries[0].content, "hi");
    assert_eq!(entries[0].clean_content, "hi");
    assert!(entries[1].is_marked_for_removal());
    assert_eq!(entries[1].hints, vec!["contains_music_note".to_string()]);
    assert_eq!(entries[1].content, "♪ la la ♪");
    assert_eq!(entries[2].content, "Untouched.");
    assert_eq!(entries[2].clean_content, "Untouched");

    let diffs = subtitles.cleaning_diffs();
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].seq_num, 1);
    assert_eq!(diffs[0].diff, "@@ -1 +1 @@\n-JOHN: hi\n+hi");

    assert_eq!(subtitles.pending_removals(), 1);
    assert_eq!(subtitles.apply_removals(), 1);
    assert_eq!(subtitles.entries.len(), 2);
    assert_eq!(subtitles.entries[1].seq_num, 2);
}

/// Test that dropping a trailing newline updates content without a diff
#[test]
fn test_clean_text_withTrailingNewlineOnly_shouldNotRecordDiff() {
    let plan = CleaningPlan::from_config(&TextCleaningConfig::default());
    let mut stats = CleaningStats::new();
    let mut subtitles = common::collection_from_texts(&["Hello\n"]);

    clean_text(&mut subtitles, &plan, &mut stats);

    assert_eq!(subtitles.entries[0].content, "Hello");
    assert!(subtitles.cleaning_diffs().is_empty());
}

/// Test that an empty collection is a no-op
#[test]
fn test_clean_text_withNoCues_shouldDoNothing() {
    let plan = CleaningPlan::from_config(&common::all_enabled_config());
    let mut stats = CleaningStats::new();
    let mut subtitles = common::collection_from_texts(&[]);

    clean_text(&mut subtitles, &plan, &mut stats);

    assert!(subtitles.entries.is_empty());
    assert_eq!(stats.total(), 0);
}
