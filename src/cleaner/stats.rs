/*!
 * Cleaning statistics.
 *
 * One counter per cleaning operation. A `CleaningStats` value is one
 * session: create it (or `reset` it) before a run, pass it by `&mut` into
 * the pipeline and the merger, and read a snapshot with `get` at the end.
 */

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of operation that are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningOperation {
    MusicNotesRemoved,
    SdhCleaned,
    SpeakerLabelsRemoved,
    LineBreaksRemoved,
    DialogMarkersRemoved,
    FormattingTagsRemoved,
    CurlyBracesCleaned,
    ParenthesesCleaned,
    SquareBracketsCleaned,
    AsterisksCleaned,
    HashtagsCleaned,
    UppercaseConverted,
    CuesMerged,
    CustomCharsRemoved,
}

impl CleaningOperation {
    pub const ALL: [CleaningOperation; 14] = [
        CleaningOperation::MusicNotesRemoved,
        CleaningOperation::SdhCleaned,
        CleaningOperation::SpeakerLabelsRemoved,
        CleaningOperation::LineBreaksRemoved,
        CleaningOperation::DialogMarkersRemoved,
        CleaningOperation::FormattingTagsRemoved,
        CleaningOperation::CurlyBracesCleaned,
        CleaningOperation::ParenthesesCleaned,
        CleaningOperation::SquareBracketsCleaned,
        CleaningOperation::AsterisksCleaned,
        CleaningOperation::HashtagsCleaned,
        CleaningOperation::UppercaseConverted,
        CleaningOperation::CuesMerged,
        CleaningOperation::CustomCharsRemoved,
    ];

    /// Stable counter name used in snapshots and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::MusicNotesRemoved => "music_notes_removed",
            Self::SdhCleaned => "sdh_cleaned",
            Self::SpeakerLabelsRemoved => "speaker_labels_removed",
            Self::LineBreaksRemoved => "line_breaks_removed",
            Self::DialogMarkersRemoved => "dialog_markers_removed",
            Self::FormattingTagsRemoved => "formatting_tags_removed",
            Self::CurlyBracesCleaned => "curly_braces_cleaned",
            Self::ParenthesesCleaned => "parentheses_cleaned",
            Self::SquareBracketsCleaned => "square_brackets_cleaned",
            Self::AsterisksCleaned => "asterisks_cleaned",
            Self::HashtagsCleaned => "hashtags_cleaned",
            Self::UppercaseConverted => "uppercase_converted",
            Self::CuesMerged => "cues_merged",
            Self::CustomCharsRemoved => "custom_chars_removed",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CleaningOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-session operation counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    counters: [usize; CleaningOperation::ALL.len()],
}

impl CleaningStats {
    /// Create a session with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter for a new session
    pub fn reset(&mut self) {
        self.counters = [0; CleaningOperation::ALL.len()];
    }

    pub fn increment(&mut self, operation: CleaningOperation) {
        self.add(operation, 1);
    }

    pub fn add(&mut self, operation: CleaningOperation, amount: usize) {
        let counter = &mut self.counters[operation.index()];
        *counter = counter.saturating_add(amount);
    }

    pub fn count(&self, operation: CleaningOperation) -> usize {
        self.counters[operation.index()]
    }

    /// Sum of all counters
    pub fn total(&self) -> usize {
        self.counters.iter().sum()
    }

    /// Snapshot keyed by counter name; later counting never shows up in it
    pub fn get(&self) -> BTreeMap<&'static str, usize> {
        CleaningOperation::ALL
            .iter()
            .map(|op| (op.name(), self.count(*op)))
            .collect()
    }
}

impl fmt::Display for CleaningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let changed: Vec<String> = CleaningOperation::ALL
            .iter()
            .filter(|op| self.count(**op) > 0)
            .map(|op| format!("{}={}", op.name(), self.count(*op)))
            .collect();

        if changed.is_empty() {
            write!(f, "no changes")
        } else {
            write!(f, "{}", changed.join(", "))
        }
    }
}
