// src/extractors/numeric.rs
//! Number, speed and channel-count extraction from free-form cell text.

use crate::rialcom::models::{collapse_whitespace, round1};
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)").expect("Failed to compile NUMBER_RE"));

// Tried in order: "(165 каналов)" first, then a bare "165 каналов"
static CHANNEL_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\((\d+)\s*канал(?:ов|а)?\)",
        r"(?i)(\d+)\s*канал(?:ов|а)?",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

static CHANNEL_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\(\d+\s*канал(?:ов|а)?\)").expect("Failed to compile CHANNEL_SUFFIX_RE")
});

const UP_TO_PREFIX: &str = "до ";
const KBIT_MARKERS: [&str; 3] = ["кбит", "kbit", "кб/с"];

/// Returns the first number in `text`. Spaces are ignored (so "1 234"
/// is one number) and a comma is read as the decimal separator.
pub fn extract_number(text: &str) -> Option<f64> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let captures = NUMBER_RE.captures(&compact)?;
    captures.get(1)?.as_str().parse::<f64>().ok()
}

/// Returns the speed in Mbit/s. Kbit/s values are converted and rounded
/// to one decimal.
pub fn extract_speed(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_prefix(UP_TO_PREFIX).unwrap_or(text);

    let lowered = text.to_lowercase();
    let is_kbit = KBIT_MARKERS.iter().any(|unit| lowered.contains(unit));

    let speed = extract_number(text)?;
    if is_kbit {
        Some(round1(speed / 1000.0))
    } else {
        Some(speed)
    }
}

pub fn extract_channels(text: &str) -> Option<u32> {
    CHANNEL_RES.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    })
}

/// Removes a "(N каналов)" parenthetical and collapses whitespace.
pub fn strip_channel_suffix(text: &str) -> String {
    collapse_whitespace(&CHANNEL_SUFFIX_RE.replace_all(text, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("1 234,5 руб"), Some(1234.5));
        assert_eq!(extract_number("500 руб./мес."), Some(500.0));
        assert_eq!(extract_number("от 350\u{a0}₽"), Some(350.0));
        assert_eq!(extract_number(""), None);
        assert_eq!(extract_number("бесплатно"), None);
    }

    #[test]
    fn test_extract_number_takes_first_match() {
        assert_eq!(extract_number("100 / 200"), Some(100.0));
    }

    #[test]
    fn test_extract_speed() {
        assert_eq!(extract_speed("до 100 Мбит/с"), Some(100.0));
        assert_eq!(extract_speed("512 Кбит/с"), Some(0.5));
        assert_eq!(extract_speed("  до 256 kbit/s"), Some(0.3));
        assert_eq!(extract_speed("1 Гбит/с"), Some(1.0));
        assert_eq!(extract_speed("128 кб/с"), Some(0.1));
        assert_eq!(extract_speed(""), None);
        assert_eq!(extract_speed("до"), None);
    }

    #[test]
    fn test_extract_speed_kbit_ties_round_to_even() {
        assert_eq!(extract_speed("250 Кбит/с"), Some(0.2));
        assert_eq!(extract_speed("1150 Кбит/с"), Some(1.1));
        assert_eq!(extract_speed("350 Кбит/с"), Some(0.3), "0.35 is stored just below the tie");
    }

    #[test]
    fn test_extract_channels() {
        assert_eq!(extract_channels("Пакет (165 каналов)"), Some(165));
        assert_eq!(extract_channels("Пакет 200 КАНАЛОВ"), Some(200));
        assert_eq!(extract_channels("Мини (2 канала)"), Some(2));
        assert_eq!(extract_channels("обычный пакет"), None);
        assert_eq!(extract_channels(""), None);
    }

    #[test]
    fn test_extract_channels_prefers_parenthesized() {
        assert_eq!(extract_channels("Плюс 5 каналов (180 каналов)"), Some(180));
    }

    #[test]
    fn test_strip_channel_suffix() {
        assert_eq!(strip_channel_suffix("Пакет  (165 каналов)"), "Пакет");
        assert_eq!(strip_channel_suffix(" Детский \n пакет "), "Детский пакет");
    }
}
