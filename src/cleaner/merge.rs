// @module: Merging of identical consecutive cues

use log::debug;

use super::stats::{CleaningOperation, CleaningStats};
use super::CueSequence;

/// Collapse runs of consecutive cues with byte-identical content.
///
/// The first cue of a run survives and its end time is stretched to the end
/// time of the last cue in the run. The others are removed in one batch,
/// then the sequence is reindexed. Returns the number of cues removed.
pub fn merge_identical_consecutive_cues<S>(subtitle: &mut S, stats: &mut CleaningStats) -> usize
where
    S: CueSequence + ?Sized,
{
    if subtitle.cues().len() < 2 {
        return 0;
    }

    let mut merged = Vec::new();
    let mut survivor = 0;

    let cues = subtitle.cues_mut();
    for index in 1..cues.len() {
        if cues[index].content == cues[survivor].content {
            let end_time_ms = cues[index].end_time_ms;
            cues[survivor].end_time_ms = end_time_ms;
            debug!("Merging cue {} into cue {}", cues[index].seq_num, cues[survivor].seq_num);
            merged.push(index);
        } else {
            survivor = index;
        }
    }

    if !merged.is_empty() {
        subtitle.remove_cues(&merged);
        stats.add(CleaningOperation::CuesMerged, merged.len());
    }
    subtitle.reindex();

    merged.len()
}
