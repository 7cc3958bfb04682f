// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

// --- Defaults ---
pub const DEFAULT_URL: &str = "https://www.rialcom.ru/internet_tariffs/";
pub const DEFAULT_OUTPUT_FILENAME: &str = "rialcom_tariffs.xlsx";
/// Number of tariffs the page listed when the scraper was written.
/// Only used for the summary, never for correctness.
pub const DEFAULT_EXPECTED_TARIFFS: usize = 106;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MKD_SECTION_ID: &str = "collapse1";
const PRIVATE_SECTION_ID: &str = "collapse2";
const PRIVATE_COMBO_SUFFIX: &str = "_ч";
const COMBO_NAME_MARKER: &str = " + РиалКом Интернет";

/// Immutable settings for one scraping run.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub url: String,
    pub output_path: PathBuf,
    pub expected_tariffs: usize,
    pub request_timeout: Duration,
    /// `id` of the apartment-building (MKD) section container.
    pub mkd_section_id: String,
    /// `id` of the private-house section container.
    pub private_section_id: String,
    /// Appended to private-house combo names so they differ from MKD ones.
    pub private_combo_suffix: String,
    /// Everything from this marker onward is dropped to get a combo base name.
    pub combo_name_marker: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            expected_tariffs: DEFAULT_EXPECTED_TARIFFS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            mkd_section_id: MKD_SECTION_ID.to_string(),
            private_section_id: PRIVATE_SECTION_ID.to_string(),
            private_combo_suffix: PRIVATE_COMBO_SUFFIX.to_string(),
            combo_name_marker: COMBO_NAME_MARKER.to_string(),
        }
    }
}
