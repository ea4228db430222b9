/*!
 * # subclean - SRT subtitle cleaner
 *
 * A Rust library for cleaning SRT subtitle files.
 *
 * ## Features
 *
 * - Drop cues containing music notes or user-defined characters
 * - Remove formatting tags, optionally keeping italic, bold and font tags
 * - Remove SDH annotations and speaker labels
 * - Remove dialog markers and line breaks
 * - Remove text between curly braces, parentheses, square brackets,
 *   asterisks or hashtags
 * - Convert mostly-uppercase cues to sentence case
 * - Merge consecutive identical cues
 * - Per-operation counters and unified diffs of every change
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing, cue model and writing
 * - `cleaner`: The cleaning pipeline:
 *   - `cleaner::pipeline`: Ordered stages built from the configuration
 *   - `cleaner::patterns`: Tag, SDH, speaker label and dialog marker removal
 *   - `cleaner::delimiters`: Removal of delimited text
 *   - `cleaner::gates`: Whole-cue removal checks
 *   - `cleaner::merge`: Merging of identical consecutive cues
 *   - `cleaner::stats`: Operation counters
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod cleaner;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, TextCleaningConfig};
pub use app_controller::{CleaningReport, Controller};
pub use cleaner::{clean_text, merge_identical_consecutive_cues, CleaningPlan, CleaningStats};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use errors::{ConfigError, SubtitleError};
