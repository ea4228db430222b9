/*!
 * Subtitle cue cleaning.
 *
 * This module holds the text cleaning pipeline and the cue merge pass:
 *
 * - `pipeline`: builds the ordered `CleaningPlan` and runs `clean_text`
 * - `patterns`: tag, SDH, speaker label, dialog marker and line break removal
 * - `delimiters`: stripping of text between delimiter pairs
 * - `case`: uppercase to sentence case normalization
 * - `gates`: whole-cue filters (custom characters, music notes)
 * - `diff`: compact unified diffs of cleaned cues
 * - `stats`: per-session operation counters
 * - `merge`: merging of identical consecutive cues
 */

pub mod case;
pub mod delimiters;
pub mod diff;
pub mod gates;
pub mod merge;
pub mod patterns;
pub mod pipeline;
pub mod stats;

// Re-export main types
pub use delimiters::DelimiterPair;
pub use gates::{CueGate, RemovalReason};
pub use merge::merge_identical_consecutive_cues;
pub use patterns::TagPreservation;
pub use pipeline::{clean_text, CleaningPlan, CleaningStep, Stage, StageOutcome};
pub use stats::{CleaningOperation, CleaningStats};

use crate::subtitle_processor::SubtitleEntry;

/// The subtitle operations the cleaner relies on.
///
/// Indices refer to positions in `cues()` at the time of the call.
pub trait CueSequence {
    fn cues(&self) -> &[SubtitleEntry];

    fn cues_mut(&mut self) -> &mut [SubtitleEntry];

    /// Schedule the cue for removal; it stays in the sequence until the
    /// owner applies its removals
    fn mark_for_removal(&mut self, index: usize);

    /// Record the cleaning diff of a cue
    fn attach_diff(&mut self, index: usize, diff: String);

    /// Remove the cues at these positions at once
    fn remove_cues(&mut self, indices: &[usize]);

    /// Renumber cues after a structural change
    fn reindex(&mut self);
}
