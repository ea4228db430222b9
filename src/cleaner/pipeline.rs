/*!
 * Cleaning pipeline.
 *
 * A `CleaningPlan` is built once per session from the configuration. It is
 * an ordered list of stages: gates first (custom characters, then music
 * notes), then the enabled edit steps in their fixed order. Tags go first
 * among the edits because the later patterns only recognise labels and
 * annotations once surrounding markup is gone.
 */

use log::debug;

use super::case::convert_uppercase_to_sentence_case;
use super::delimiters::DelimiterPair;
use super::diff::build_unified_diff;
use super::gates::{CueGate, RemovalReason};
use super::patterns::{
    remove_dialog_markers, remove_formatting_tags, remove_line_breaks, remove_sdh,
    remove_speaker_labels, TagPreservation,
};
use super::stats::{CleaningOperation, CleaningStats};
use super::CueSequence;
use crate::app_config::TextCleaningConfig;

/// Result of running one stage, or a whole plan, on cue content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The cue is dropped entirely
    Removed(RemovalReason),
    /// The cue is kept with this content
    Content { text: String, changed: bool },
}

/// An in-place text edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleaningStep {
    FormattingTags(TagPreservation),
    Sdh,
    SpeakerLabels,
    DialogMarkers,
    LineBreaks,
    Delimiters(DelimiterPair),
    UppercaseToSentenceCase,
}

impl CleaningStep {
    pub fn operation(&self) -> CleaningOperation {
        match self {
            Self::FormattingTags(_) => CleaningOperation::FormattingTagsRemoved,
            Self::Sdh => CleaningOperation::SdhCleaned,
            Self::SpeakerLabels => CleaningOperation::SpeakerLabelsRemoved,
            Self::DialogMarkers => CleaningOperation::DialogMarkersRemoved,
            Self::LineBreaks => CleaningOperation::LineBreaksRemoved,
            Self::Delimiters(pair) => pair.operation(),
            Self::UppercaseToSentenceCase => CleaningOperation::UppercaseConverted,
        }
    }

    /// Apply the edit. `changed` reports whether the step counts as having
    /// touched the cue.
    pub fn apply(&self, content: &str) -> StageOutcome {
        let text = match self {
            Self::FormattingTags(preserved) => remove_formatting_tags(content, preserved),
            Self::Sdh => remove_sdh(content),
            Self::SpeakerLabels => remove_speaker_labels(content),
            Self::DialogMarkers => remove_dialog_markers(content),
            Self::LineBreaks => remove_line_breaks(content),
            Self::Delimiters(pair) => pair.strip(content),
            Self::UppercaseToSentenceCase => convert_uppercase_to_sentence_case(content),
        };

        // Line breaks count whenever the input had one
        let changed = match self {
            Self::LineBreaks => content.contains('\n'),
            _ => text != content,
        };

        StageOutcome::Content { text, changed }
    }
}

/// One entry of a cleaning plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Gate(CueGate),
    Edit(CleaningStep),
}

impl Stage {
    pub fn run(&self, content: &str) -> StageOutcome {
        match self {
            Self::Gate(gate) => match gate.check(content) {
                Some(reason) => StageOutcome::Removed(reason),
                None => StageOutcome::Content { text: content.to_string(), changed: false },
            },
            Self::Edit(step) => step.apply(content),
        }
    }

    /// Counter credited when this stage fires
    pub fn operation(&self) -> CleaningOperation {
        match self {
            Self::Gate(CueGate::CustomChars(_)) => CleaningOperation::CustomCharsRemoved,
            Self::Gate(CueGate::MusicNotes) => CleaningOperation::MusicNotesRemoved,
            Self::Edit(step) => step.operation(),
        }
    }
}

/// Ordered stages derived from one configuration snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleaningPlan {
    stages: Vec<Stage>,
}

impl CleaningPlan {
    /// Build the plan. Stage order is fixed and does not depend on the
    /// order of fields in the configuration.
    pub fn from_config(config: &TextCleaningConfig) -> Self {
        let mut stages = Vec::new();

        if let Some(gate) = CueGate::custom_chars(&config.custom_chars_to_remove) {
            stages.push(Stage::Gate(gate));
        }
        if config.remove_music_notes {
            stages.push(Stage::Gate(CueGate::MusicNotes));
        }

        let edits = [
            (
                config.remove_formatting_tags,
                CleaningStep::FormattingTags(TagPreservation::new(
                    config.preserve_italic_tags,
                    config.preserve_bold_tags,
                    config.preserve_font_tags,
                )),
            ),
            (config.remove_sdh, CleaningStep::Sdh),
            (config.remove_speaker_labels, CleaningStep::SpeakerLabels),
            (config.remove_dialog_markers, CleaningStep::DialogMarkers),
            (config.remove_line_breaks, CleaningStep::LineBreaks),
        ];
        stages.extend(
            edits
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, step)| Stage::Edit(step)),
        );

        stages.extend(
            DelimiterPair::ALL
                .into_iter()
                .filter(|pair| config.removes_delimited(*pair))
                .map(|pair| Stage::Edit(CleaningStep::Delimiters(pair))),
        );

        if config.convert_uppercase_to_lowercase {
            stages.push(Stage::Edit(CleaningStep::UppercaseToSentenceCase));
        }

        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage on one cue's content.
    ///
    /// Stops at the first gate that removes the cue. Otherwise the returned
    /// text is trimmed and `changed` compares it to `content`. Counters are
    /// bumped for every stage that fired.
    pub fn clean_cue(&self, content: &str, stats: &mut CleaningStats) -> StageOutcome {
        let mut current = content.to_string();

        for stage in &self.stages {
            match stage.run(&current) {
                StageOutcome::Removed(reason) => {
                    stats.increment(reason.operation());
                    return StageOutcome::Removed(reason);
                }
                StageOutcome::Content { text, changed } => {
                    if changed {
                        stats.increment(stage.operation());
                    }
                    current = text;
                }
            }
        }

        let text = current.trim().to_string();
        let changed = text != content;
        StageOutcome::Content { text, changed }
    }
}

/// Clean every cue of `subtitle` in sequence order.
///
/// Cues dropped by a gate get a hint and are marked for removal; nothing
/// else happens to them. Kept cues that changed get their new content, a
/// recorded diff (when non-empty) and a recomputed match key.
pub fn clean_text<S>(subtitle: &mut S, plan: &CleaningPlan, stats: &mut CleaningStats)
where
    S: CueSequence + ?Sized,
{
    for index in 0..subtitle.cues().len() {
        let original = subtitle.cues()[index].content.clone();

        match plan.clean_cue(&original, stats) {
            StageOutcome::Removed(reason) => {
                let cue = &mut subtitle.cues_mut()[index];
                cue.hints.push(reason.hint().to_string());
                debug!("Cue {} marked for removal: {}", cue.seq_num, reason.hint());
                subtitle.mark_for_removal(index);
            }
            StageOutcome::Content { text, changed } => {
                if !changed {
                    continue;
                }

                let diff = build_unified_diff(&original, &text);
                let cue = &mut subtitle.cues_mut()[index];
                cue.content = text;
                cue.refresh_clean_content();
                debug!("Cue {} cleaned", cue.seq_num);

                if !diff.is_empty() {
                    subtitle.attach_diff(index, diff);
                }
            }
        }
    }
}
