/*!
 * Pattern removers for cue text.
 *
 * Each function is a pure text -> text transformation that returns its input
 * (modulo trimming) when nothing matches:
 * - formatting (angle-bracket) tags, with a configurable preserved set
 * - SDH annotations at line start
 * - uppercase speaker labels
 * - leading dialog dashes
 * - embedded line breaks
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Any angle-bracket tag; group 1 is the tag name after an optional '/'
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?(\w*)[^>]*>").expect("Invalid tag regex")
});

/// Line-anchored SDH annotations, applied in order
static SDH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // [SPEAKER] or [NOISE]
        r"(?m)^\s*\[[^\]]*\]",
        // (SPEAKER) or (noise)
        r"(?m)^\s*\([^)]*\)",
        // *SPEAKER*
        r"(?m)^\s*\*[^*]+\*",
        // (doorbell ringing), (music playing), ...
        r"(?mi)^\s*\([^)]*(?:ringing|playing|sounds?|music|knocking|door|phone|alarm|beeping|buzzing|creaking|footsteps?|silence|pounding)\s*[^)]*\)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid SDH regex"))
    .collect()
});

static SPEAKER_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Z][A-Z\s]*?):\s*").expect("Invalid speaker label regex")
});

static DIALOG_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-–—]\s*").expect("Invalid dialog marker regex")
});

static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

const MAX_SPEAKER_LABEL_WORDS: usize = 3;

/// Tag names kept by `remove_formatting_tags`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagPreservation {
    names: Vec<&'static str>,
}

impl TagPreservation {
    /// Build the preserved set from the three tag switches
    pub fn new(italic: bool, bold: bool, font: bool) -> Self {
        let mut names = Vec::new();
        if italic {
            names.push("i");
        }
        if bold {
            names.push("b");
        }
        if font {
            names.extend(["font", "span", "color"]);
        }
        Self { names }
    }

    /// Preserve nothing: every tag is removed
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn preserves(&self, tag_name: &str) -> bool {
        self.names.iter().any(|name| name.eq_ignore_ascii_case(tag_name))
    }
}

/// Remove every angle-bracket tag whose name is not preserved.
/// The text between tags is left alone.
pub fn remove_formatting_tags(text: &str, preserved: &TagPreservation) -> String {
    TAG_REGEX
        .replace_all(text, |caps: &Captures| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            if preserved.preserves(name) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Remove SDH annotations that open a line
pub fn remove_sdh(text: &str) -> String {
    let mut result = text.to_string();
    for pattern in SDH_PATTERNS.iter() {
        result = pattern.replace_all(&result, "").into_owned();
    }
    result.trim().to_string()
}

/// Strip `NAME:` style speaker labels of one to three uppercase words
pub fn remove_speaker_labels(text: &str) -> String {
    text.split('\n')
        .map(|line| match SPEAKER_LABEL_REGEX.captures(line) {
            Some(caps) => {
                let speaker = caps[1].trim();
                if speaker.split_whitespace().count() <= MAX_SPEAKER_LABEL_WORDS {
                    &line[caps[0].len()..]
                } else {
                    line
                }
            }
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Strip one leading hyphen, en dash or em dash per line
pub fn remove_dialog_markers(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split('\n')
        .map(|line| match DIALOG_MARKER_REGEX.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Join all lines of a cue with single spaces
pub fn remove_line_breaks(text: &str) -> String {
    let joined = text.replace('\n', " ");
    WHITESPACE_RUN_REGEX.replace_all(&joined, " ").trim().to_string()
}
