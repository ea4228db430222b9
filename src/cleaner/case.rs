// @module: Uppercase to sentence case normalization

/// Minimum number of letters needed to judge the casing of a cue
const MIN_LETTERS: usize = 2;

/// Uppercase share (in percent of letters) at which a cue is converted
const UPPERCASE_THRESHOLD_PERCENT: usize = 70;

/// Convert predominantly uppercase text to sentence case.
///
/// Only alphabetic characters are counted. When at least 70% of them are
/// uppercase the whole text is lowercased and its first character is
/// uppercased; otherwise the text is returned unchanged.
pub fn convert_uppercase_to_sentence_case(text: &str) -> String {
    let (letters, uppercase) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, uppercase), c| {
            (letters + 1, uppercase + usize::from(c.is_uppercase()))
        });

    if letters < MIN_LETTERS {
        return text.to_string();
    }

    if uppercase * 100 < letters * UPPERCASE_THRESHOLD_PERCENT {
        return text.to_string();
    }

    let lowered = text.to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lowered,
    }
}
