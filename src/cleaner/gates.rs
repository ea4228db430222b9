/*!
 * Gate filters.
 *
 * A gate inspects the original cue content and decides whether the whole
 * cue is dropped. Gates never edit text.
 */

use serde::{Deserialize, Serialize};

use super::stats::CleaningOperation;

/// Music note glyph marking sung or instrumental cues
pub const MUSIC_NOTE: char = '♪';

/// Why a gate removed a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    CustomChar,
    MusicNote,
}

impl RemovalReason {
    /// Diagnostic hint appended to the removed cue
    pub fn hint(&self) -> &'static str {
        match self {
            Self::CustomChar => "contains_custom_char",
            Self::MusicNote => "contains_music_note",
        }
    }

    pub fn operation(&self) -> CleaningOperation {
        match self {
            Self::CustomChar => CleaningOperation::CustomCharsRemoved,
            Self::MusicNote => CleaningOperation::MusicNotesRemoved,
        }
    }
}

/// A whole-cue filter, evaluated before any edit step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueGate {
    /// Drop cues containing any of these substrings
    CustomChars(Vec<String>),
    /// Drop cues containing a music note
    MusicNotes,
}

impl CueGate {
    /// Build the custom character gate, ignoring empty patterns.
    /// Returns `None` when no usable pattern is left.
    pub fn custom_chars(patterns: &[String]) -> Option<Self> {
        let patterns: Vec<String> = patterns
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect();

        if patterns.is_empty() {
            None
        } else {
            Some(Self::CustomChars(patterns))
        }
    }

    /// Returns the removal reason when the gate triggers on `content`
    pub fn check(&self, content: &str) -> Option<RemovalReason> {
        match self {
            Self::CustomChars(patterns) => {
                contains_custom_chars(content, patterns).then_some(RemovalReason::CustomChar)
            }
            Self::MusicNotes => contains_music_note(content).then_some(RemovalReason::MusicNote),
        }
    }
}

pub fn contains_music_note(text: &str) -> bool {
    text.contains(MUSIC_NOTE)
}

/// Single characters and multi-character patterns are both matched as
/// plain substrings
pub fn contains_custom_chars(text: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| !pattern.is_empty() && text.contains(pattern.as_str()))
}
