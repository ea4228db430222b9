use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::app_config::Config;
use crate::cleaner::{
    clean_text, merge_identical_consecutive_cues, CleaningPlan, CleaningStats, CueSequence,
};
use crate::file_utils::{FileManager, FileType};
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for subtitle cleaning

// @const: Hint for cues whose whole text was cleaned away
pub const EMPTY_AFTER_CLEANING_HINT: &str = "empty_after_cleaning";

/// Summary of one cleaning run over one or more files
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CleaningReport {
    pub files_cleaned: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    /// Cues read from all cleaned files
    pub cues_before: usize,
    /// Cues written to all cleaned files
    pub cues_after: usize,
    pub diffs_recorded: usize,
    /// Counter snapshot of the whole run
    pub stats: BTreeMap<&'static str, usize>,
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Cleaned,
    Skipped,
}

/// Main application controller for subtitle cleaning
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Stages built from config.text_cleaning
    plan: CleaningPlan,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let plan = CleaningPlan::from_config(&config.text_cleaning);

        if plan.is_empty() && !config.text_cleaning.merge_identical_cues {
            warn!("No cleaning operation is enabled; files will only be rewritten");
        }

        Ok(Self { config, plan })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn plan(&self) -> &CleaningPlan {
        &self.plan
    }

    /// Clean one in-memory collection: pipeline, removal of gated and
    /// emptied cues, then the merge pass when enabled. Returns the number
    /// of cues removed.
    pub fn clean_collection(&self, subtitles: &mut SubtitleCollection, stats: &mut CleaningStats) -> usize {
        clean_text(subtitles, &self.plan, stats);
        Self::mark_empty_cues(subtitles);
        let mut removed = subtitles.apply_removals();

        if self.config.text_cleaning.merge_identical_cues {
            removed += merge_identical_consecutive_cues(subtitles, stats);
        }

        removed
    }

    /// An SRT block cannot hold an empty text, so cues cleaned down to
    /// nothing are dropped
    fn mark_empty_cues(subtitles: &mut SubtitleCollection) {
        let empty: Vec<usize> = subtitles
            .cues()
            .iter()
            .enumerate()
            .filter(|(_, cue)| !cue.is_marked_for_removal() && cue.content.trim().is_empty())
            .map(|(index, _)| index)
            .collect();

        for index in empty {
            let cue = &mut subtitles.cues_mut()[index];
            cue.hints.push(EMPTY_AFTER_CLEANING_HINT.to_string());
            debug!("Cue {} marked for removal: {}", cue.seq_num, EMPTY_AFTER_CLEANING_HINT);
            subtitles.mark_for_removal(index);
        }
    }

    /// Clean a single subtitle file into `output_dir`
    pub fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<CleaningReport> {
        let start_time = Instant::now();
        let mut stats = CleaningStats::new();
        let mut report = CleaningReport::default();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        match self.clean_file(&input_file, &output_dir, force_overwrite, &mut stats, &mut report)? {
            FileOutcome::Cleaned => report.files_cleaned += 1,
            FileOutcome::Skipped => report.files_skipped += 1,
        }
        report.stats = stats.get();

        info!(
            "Cleaning completed in {}: {}",
            Self::format_duration(start_time.elapsed()),
            stats
        );

        Ok(report)
    }

    /// Clean every SRT file below `input_dir`, writing next to each input.
    /// Outputs of earlier runs are not cleaned again.
    pub fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<CleaningReport> {
        let start_time = Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let suffix = &self.config.output.suffix;
        let subtitle_files: Vec<PathBuf> = FileManager::find_files(&input_dir, "srt")?
            .into_iter()
            .filter(|path| !FileManager::has_output_suffix(path, suffix))
            .collect();

        if subtitle_files.is_empty() {
            return Err(anyhow::anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        // One statistics session for the whole folder
        let mut stats = CleaningStats::new();
        stats.reset();
        let mut report = CleaningReport::default();

        let folder_pb = ProgressBar::new(subtitle_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));

        for subtitle_file in &subtitle_files {
            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Cleaning: {}", file_name));

            let output_dir = subtitle_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_dir.clone());

            match self.clean_file(subtitle_file, &output_dir, force_overwrite, &mut stats, &mut report) {
                Ok(FileOutcome::Cleaned) => report.files_cleaned += 1,
                Ok(FileOutcome::Skipped) => report.files_skipped += 1,
                Err(e) => {
                    error!("Error cleaning file {}: {:#}", file_name, e);
                    report.files_failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder cleaning complete");
        report.stats = stats.get();

        info!(
            "Folder cleaning completed in {}: {} cleaned, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            report.files_cleaned,
            report.files_skipped,
            report.files_failed
        );
        info!("Totals: {}", stats);

        Ok(report)
    }

    /// Parse, clean and write one file
    fn clean_file(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
        stats: &mut CleaningStats,
        report: &mut CleaningReport,
    ) -> Result<FileOutcome> {
        let suffix = &self.config.output.suffix;
        let output_path = FileManager::generate_output_path(input_file, output_dir, suffix, "srt");

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, cleaned file already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(FileOutcome::Skipped);
        }

        if FileManager::detect_file_type(input_file)? != FileType::Subtitle {
            warn!("Skipping {:?}, not a subtitle file", input_file);
            return Ok(FileOutcome::Skipped);
        }

        let mut subtitles = SubtitleCollection::from_srt_file(input_file)
            .with_context(|| format!("Failed to parse subtitle file: {:?}", input_file))?;
        let cues_before = subtitles.entries.len();

        let removed = self.clean_collection(&mut subtitles, stats);
        debug!(
            "{:?}: {} cues in, {} removed, {} changed",
            input_file,
            cues_before,
            removed,
            subtitles.cleaning_diffs().len()
        );

        FileManager::ensure_dir(output_dir)?;
        subtitles.write_to_srt(&output_path)?;

        if self.config.output.write_diff_report && !subtitles.cleaning_diffs().is_empty() {
            let diff_path = FileManager::generate_output_path(input_file, output_dir, suffix, "diff");
            FileManager::write_to_file(&diff_path, &subtitles.diff_report())?;
            debug!("Diff report written to {:?}", diff_path);
        }

        report.cues_before += cues_before;
        report.cues_after += subtitles.entries.len();
        report.diffs_recorded += subtitles.cleaning_diffs().len();

        info!("Success: {:?}", output_path);
        Ok(FileOutcome::Cleaned)
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
