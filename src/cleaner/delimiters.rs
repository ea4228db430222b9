/*!
 * Delimiter-pair stripping.
 *
 * Removes every span enclosed by an open/close delimiter pair, delimiters
 * included, then tidies the lines the removal left behind.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::stats::CleaningOperation;

static SPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r" +").expect("Invalid space run regex")
});

/// Delimiter pairs the pipeline knows how to strip, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterPair {
    CurlyBraces,
    Parentheses,
    SquareBrackets,
    Asterisks,
    Hashtags,
}

impl DelimiterPair {
    /// All pairs in the order the pipeline applies them
    pub const ALL: [DelimiterPair; 5] = [
        DelimiterPair::CurlyBraces,
        DelimiterPair::Parentheses,
        DelimiterPair::SquareBrackets,
        DelimiterPair::Asterisks,
        DelimiterPair::Hashtags,
    ];

    pub fn open(&self) -> char {
        match self {
            Self::CurlyBraces => '{',
            Self::Parentheses => '(',
            Self::SquareBrackets => '[',
            Self::Asterisks => '*',
            Self::Hashtags => '#',
        }
    }

    pub fn close(&self) -> char {
        match self {
            Self::CurlyBraces => '}',
            Self::Parentheses => ')',
            Self::SquareBrackets => ']',
            Self::Asterisks => '*',
            Self::Hashtags => '#',
        }
    }

    /// Statistic bumped when this pair changes a cue
    pub fn operation(&self) -> CleaningOperation {
        match self {
            Self::CurlyBraces => CleaningOperation::CurlyBracesCleaned,
            Self::Parentheses => CleaningOperation::ParenthesesCleaned,
            Self::SquareBrackets => CleaningOperation::SquareBracketsCleaned,
            Self::Asterisks => CleaningOperation::AsterisksCleaned,
            Self::Hashtags => CleaningOperation::HashtagsCleaned,
        }
    }

    /// Strip this pair from text
    pub fn strip(&self, text: &str) -> String {
        strip_delimited(text, self.open(), self.close())
    }
}

fn tidy_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| SPACE_RUN_REGEX.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove all text between `open` and the nearest following `close`,
/// delimiters included, across line boundaries.
///
/// Afterwards each line has its space runs collapsed and is trimmed, and
/// lines left empty are dropped.
pub fn strip_delimited(text: &str, open: char, close: char) -> String {
    let mut kept = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(open) {
        let after_open = &rest[start + open.len_utf8()..];
        // No close after this open means no close after any later open either
        let Some(end) = after_open.find(close) else {
            break;
        };
        kept.push_str(&rest[..start]);
        rest = &after_open[end + close.len_utf8()..];
    }
    kept.push_str(rest);

    tidy_lines(&kept)
}
