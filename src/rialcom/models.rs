// src/rialcom/models.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Raw speeds above this are assumed to be Kbit/s that escaped unit detection.
// FIXME: a genuine 1200 Mbit/s plan is also rescaled (to 1.2).
const SPEED_KBIT_THRESHOLD: f64 = 1000.0;

/// Placeholder written to the spreadsheet for absent optional values.
pub const NULL_CELL: &str = "null";

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Rounds to one decimal place using the exact decimal value of `value`,
/// with exact ties going to the even digit (0.25 -> 0.2, 1.15 -> 1.1).
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// One normalized tariff offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tariff {
    name: String,
    channels: Option<u32>,
    speed: Option<f64>, // Mbit/s
    price: Option<f64>,
}

impl Tariff {
    /// Builds a tariff, collapsing whitespace in the name and bringing
    /// the speed to Mbit/s.
    pub fn new(
        name: impl AsRef<str>,
        channels: Option<u32>,
        speed: Option<f64>,
        price: Option<f64>,
    ) -> Self {
        let speed = speed.map(|s| {
            if s > SPEED_KBIT_THRESHOLD {
                round1(s / 1000.0)
            } else {
                s
            }
        });

        Self {
            name: collapse_whitespace(name.as_ref()),
            channels,
            speed,
            price,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> Option<u32> {
        self.channels
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }
}

/// Combo base name -> TV channel count, taken from the MKD section.
/// The private-house combo table does not print channel counts itself.
#[derive(Debug, Clone, Default)]
pub struct ChannelMap {
    inner: HashMap<String, u32>,
}

impl ChannelMap {
    /// Builds the map from combo tariffs that carry a channel count.
    /// The base name is the part of the tariff name before `marker`.
    pub fn from_tariffs(tariffs: &[Tariff], marker: &str) -> Self {
        let mut inner = HashMap::new();
        for tariff in tariffs {
            if let Some(channels) = tariff.channels() {
                let base_name = Self::base_name(tariff.name(), marker);
                tracing::trace!("Channel map: '{}' -> {}", base_name, channels);
                inner.insert(base_name, channels);
            }
        }
        Self { inner }
    }

    /// Cuts `name` at the first occurrence of `marker`.
    pub fn base_name(name: &str, marker: &str) -> String {
        let head = match name.find(marker) {
            Some(idx) => &name[..idx],
            None => name,
        };
        head.trim().to_string()
    }

    pub fn get(&self, base_name: &str) -> Option<u32> {
        self.inner.get(base_name).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Summary of a run, compared against the expected tariff count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseStatistics {
    pub total: usize,
    pub expected: usize,
    pub difference: i64,
    pub percentage: f64,
}

impl ParseStatistics {
    pub fn compute(total: usize, expected: usize) -> Self {
        let percentage = if expected > 0 {
            round1(total as f64 / expected as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total,
            expected,
            difference: total as i64 - expected as i64,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_normalization() {
        let fast = Tariff::new("Гигабит", None, Some(1500.0), Some(900.0));
        assert_eq!(fast.speed(), Some(1.5), "Speeds above 1000 should be rescaled");

        let plain = Tariff::new("Базовый", None, Some(50.0), Some(500.0));
        assert_eq!(plain.speed(), Some(50.0), "Speeds up to 1000 stay as they are");

        let edge = Tariff::new("Ровно", None, Some(1000.0), Some(1.0));
        assert_eq!(edge.speed(), Some(1000.0));
    }

    #[test]
    fn test_rescaled_speed_ties_round_to_even() {
        let tariff = Tariff::new("Гигабит", None, Some(1250.0), Some(900.0));
        assert_eq!(tariff.speed(), Some(1.2), "1.25 should round to the even digit");

        let tariff = Tariff::new("Гигабит", None, Some(1350.0), Some(900.0));
        assert_eq!(tariff.speed(), Some(1.4));
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(0.25), 0.2);
        assert_eq!(round1(1.15), 1.1, "1.15 is stored just below the tie");
        assert_eq!(round1(0.256), 0.3);
        assert_eq!(round1(33.333), 33.3);
    }

    #[test]
    fn test_name_whitespace_collapsed() {
        let raw_name = "  Пакет \n  + РиалКом\tИнтернет 100 ";
        let tariff = Tariff::new(raw_name, Some(165), None, Some(1.0));
        assert_eq!(tariff.name(), "Пакет + РиалКом Интернет 100");
        assert_eq!(tariff.channels(), Some(165));
    }

    #[test]
    fn test_channel_map_from_combo_names() {
        let combos = vec![
            Tariff::new("Пакет + РиалКом Интернет 100", Some(165), Some(100.0), Some(900.0)),
            Tariff::new("Пакет + РиалКом Интернет 200", Some(165), Some(200.0), Some(1e3)),
            Tariff::new("Без каналов + РиалКом Интернет 100", None, None, Some(700.0)),
        ];
        let map = ChannelMap::from_tariffs(&combos, " + РиалКом Интернет");

        assert_eq!(map.len(), 1, "Only tariffs with a channel count are mapped");
        assert_eq!(map.get("Пакет"), Some(165));
        assert_eq!(map.get("Без каналов"), None);
    }

    #[test]
    fn test_base_name_without_marker_is_whole_name() {
        assert_eq!(ChannelMap::base_name(" Пакет ", " + РиалКом Интернет"), "Пакет");
    }

    #[test]
    fn test_statistics() {
        let stats = ParseStatistics::compute(53, 106);
        assert_eq!(stats.difference, -53);
        assert_eq!(stats.percentage, 50.0);

        let stats = ParseStatistics::compute(1, 3);
        assert_eq!(stats.percentage, 33.3);

        let stats = ParseStatistics::compute(1, 400);
        assert_eq!(stats.percentage, 0.2, "0.25% should round to the even digit");

        let stats = ParseStatistics::compute(5, 0);
        assert_eq!(stats.percentage, 0.0, "Zero expected must not divide by zero");
        assert_eq!(stats.difference, 5);
    }
}
