use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cleaner::CueSequence;
use crate::errors::SubtitleError;

// @module: Subtitle model and SRT reading/writing

// @const: SRT timestamp line, ',' or '.' before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})")
        .expect("Invalid timestamp regex")
});

// @const: Characters dropped from the match key
static MATCH_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s.,:_-]").expect("Invalid match key regex")
});

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Display text, may span several lines
    pub content: String,

    // @field: Content without whitespace and `.,:_-`, used for matching
    pub clean_content: String,

    // @field: Diagnostic tags added by the cleaner
    pub hints: Vec<String>,

    marked_for_removal: bool,
}

impl SubtitleEntry {
    /// Creates a new cue and computes its match key
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, content: String) -> Self {
        let clean_content = Self::match_key(&content);
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            content,
            clean_content,
            hints: Vec::new(),
            marked_for_removal: false,
        }
    }

    /// Normalized form of a text: whitespace and `. , : _ -` removed
    pub fn match_key(text: &str) -> String {
        MATCH_KEY_REGEX.replace_all(text, "").into_owned()
    }

    /// Recompute `clean_content` from the current content
    pub fn refresh_clean_content(&mut self) {
        self.clean_content = Self::match_key(&self.content);
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm or HH:MM:SS.mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());

        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let mut values = [0u64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| invalid())?;
        }
        let [hours, minutes, seconds, millis] = values;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid());
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(invalid)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.content)?;
        writeln!(f)
    }
}

/// Diff recorded for a cue the cleaner changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningDiff {
    /// Sequence number of the cue when the diff was recorded
    pub seq_num: usize,
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    /// Hunk-only unified diff
    pub diff: String,
}

impl fmt::Display for CleaningDiff {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "# cue {} ({} --> {})",
            self.seq_num,
            SubtitleEntry::format_timestamp(self.start_time_ms),
            SubtitleEntry::format_timestamp(self.end_time_ms)
        )?;
        writeln!(f, "{}", self.diff)
    }
}

/// Collection of subtitle cues with cleaning bookkeeping
#[derive(Debug, Default)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Cues in file order
    pub entries: Vec<SubtitleEntry>,

    cleaning_diffs: Vec<CleaningDiff>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
            cleaning_diffs: Vec::new(),
        }
    }

    pub fn from_entries(source_file: PathBuf, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection {
            source_file,
            entries,
            cleaning_diffs: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_srt_file<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SubtitleError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let entries = Self::parse_srt_string(&content)?;
        Ok(Self::from_entries(path.to_path_buf(), entries))
    }

    /// Parse SRT content into cues.
    ///
    /// Blocks without a timestamp line or without text are skipped with a
    /// warning. Cues keep their file order and are numbered from 1.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let normalized = content
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let mut entries = Vec::new();
        let mut block: Vec<&str> = Vec::new();

        // A trailing empty line flushes the last block
        for line in normalized.split('\n').chain(std::iter::once("")) {
            if !line.trim().is_empty() {
                block.push(line);
                continue;
            }
            if block.is_empty() {
                continue;
            }

            if let Some(entry) = Self::parse_block(&block, entries.len() + 1) {
                entries.push(entry);
            }
            block.clear();
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in content");
            return Err(SubtitleError::NoEntries);
        }

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            debug!("Found {} overlapping subtitle entries", overlap_count);
        }

        Ok(entries)
    }

    /// Parse one blank-line separated block
    fn parse_block(block: &[&str], seq_num: usize) -> Option<SubtitleEntry> {
        let Some(timing_index) = block.iter().position(|line| TIMESTAMP_REGEX.is_match(line)) else {
            warn!("Skipping block without timestamp: {:?}", block.first().unwrap_or(&""));
            return None;
        };

        let caps = TIMESTAMP_REGEX.captures(block[timing_index])?;
        let start_time_ms = Self::parse_timestamp_to_ms(&caps, 1);
        let end_time_ms = Self::parse_timestamp_to_ms(&caps, 5);

        let text = block[timing_index + 1..]
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            warn!("Skipping empty subtitle entry at {}", block[timing_index].trim());
            return None;
        }
        if end_time_ms < start_time_ms {
            warn!("Subtitle entry {} ends before it starts", seq_num);
        }

        Some(SubtitleEntry::new(seq_num, start_time_ms, end_time_ms, text))
    }

    /// Timestamp captures starting at group `start_idx` to milliseconds
    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let part = |offset: usize| -> u64 {
            caps.get(start_idx + offset)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        (part(0) * 3600 + part(1) * 60 + part(2)) * 1000 + part(3)
    }

    /// Render every cue in SRT format
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write cues to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Diffs recorded by the cleaner, in recording order
    pub fn cleaning_diffs(&self) -> &[CleaningDiff] {
        &self.cleaning_diffs
    }

    /// All recorded diffs as one text report
    pub fn diff_report(&self) -> String {
        self.cleaning_diffs
            .iter()
            .map(|diff| diff.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn pending_removals(&self) -> usize {
        self.entries.iter().filter(|e| e.marked_for_removal).count()
    }

    /// Drop every cue marked for removal and renumber the rest.
    /// Returns the number of cues removed.
    pub fn apply_removals(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.marked_for_removal);
        let removed = before - self.entries.len();

        if removed > 0 {
            debug!("Removed {} marked subtitle entries", removed);
        }
        self.reindex();
        removed
    }
}

impl CueSequence for SubtitleCollection {
    fn cues(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    fn cues_mut(&mut self) -> &mut [SubtitleEntry] {
        &mut self.entries
    }

    fn mark_for_removal(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.marked_for_removal = true;
        }
    }

    fn attach_diff(&mut self, index: usize, diff: String) {
        if let Some(entry) = self.entries.get(index) {
            self.cleaning_diffs.push(CleaningDiff {
                seq_num: entry.seq_num,
                start_time_ms: entry.start_time_ms,
                end_time_ms: entry.end_time_ms,
                diff,
            });
        }
    }

    fn remove_cues(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut position = 0;
        self.entries.retain(|_| {
            let keep = sorted.binary_search(&position).is_err();
            position += 1;
            keep
        });
    }

    fn reindex(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        writeln!(f, "Cleaning diffs: {}", self.cleaning_diffs.len())?;
        Ok(())
    }
}
