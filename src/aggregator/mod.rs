// src/aggregator/mod.rs

// --- Imports ---
use crate::config::ScraperConfig;
use crate::extractors::{parse_combo_table, parse_flat_table, SectionLocator};
use crate::rialcom::{client, ChannelMap, ParseStatistics, Tariff};
use crate::utils::error::{FetchError, ValidationError};
use scraper::{ElementRef, Html};

/// Outcome of one run. Validation errors are informational only.
#[derive(Debug, Clone)]
pub struct AggregationReport {
    pub tariffs: Vec<Tariff>,
    pub errors: Vec<ValidationError>,
    pub statistics: ParseStatistics,
}

/// Collects tariffs from both pricing sections of the page.
pub struct TariffAggregator {
    config: ScraperConfig,
    locator: SectionLocator,
}

impl TariffAggregator {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            locator: SectionLocator::new(),
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Downloads the page and aggregates it. Only the download can fail.
    pub async fn run(&self) -> Result<AggregationReport, FetchError> {
        tracing::info!("Parsing started...");
        let document = client::fetch_document(&self.config).await?;
        Ok(self.aggregate(&document))
    }

    /// Extracts, reconciles and validates the tariffs of a parsed page.
    pub fn aggregate(&self, document: &Html) -> AggregationReport {
        // 1. MKD section: internet-only and combo tables
        let mkd = self.section(document, &self.config.mkd_section_id);
        let mkd_internet = mkd.map(|s| self.internet_tariffs(s, "МКД")).unwrap_or_default();
        let mkd_combo = mkd.map(|s| self.combo_tariffs(s, "МКД", "", None)).unwrap_or_default();

        // 2. Channel counts are printed only in the MKD combo table
        let channel_map = ChannelMap::from_tariffs(&mkd_combo, &self.config.combo_name_marker);
        if channel_map.is_empty() {
            tracing::warn!("No channel counts found in the MKD combo table");
        } else {
            tracing::debug!("Channel map built with {} entries", channel_map.len());
        }

        // 3. Private houses, reusing MKD channel counts
        let private = self.section(document, &self.config.private_section_id);
        let suffix = &self.config.private_combo_suffix;
        let private_internet = private
            .map(|s| self.internet_tariffs(s, "частные"))
            .unwrap_or_default();
        let private_combo = private
            .map(|s| self.combo_tariffs(s, "частные", suffix, Some(&channel_map)))
            .unwrap_or_default();

        // 4. Merge, validate and summarize
        let mut all_tariffs = mkd_internet;
        all_tariffs.extend(mkd_combo);
        all_tariffs.extend(private_internet);
        all_tariffs.extend(private_combo);

        let (tariffs, errors) = validate_tariffs(all_tariffs);
        let statistics = ParseStatistics::compute(tariffs.len(), self.config.expected_tariffs);

        tracing::info!("Tariffs found: {}", statistics.total);
        if !errors.is_empty() {
            tracing::warn!("Rejected tariffs: {}", errors.len());
            for error in &errors {
                tracing::debug!("{}", error);
            }
        }

        AggregationReport { tariffs, errors, statistics }
    }

    fn section<'a>(&self, document: &'a Html, section_id: &str) -> Option<ElementRef<'a>> {
        match self.locator.locate_section(document, section_id) {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    fn internet_tariffs(&self, section: ElementRef, label: &str) -> Vec<Tariff> {
        match self.locator.locate_internet_table(section) {
            Ok(table) => {
                let tariffs = parse_flat_table(table);
                tracing::info!("Internet tariffs found ({}): {}", label, tariffs.len());
                tariffs
            }
            Err(e) => {
                tracing::warn!("Internet tariffs ({}) skipped: {}", label, e);
                Vec::new()
            }
        }
    }

    fn combo_tariffs(
        &self,
        section: ElementRef,
        label: &str,
        suffix: &str,
        channel_map: Option<&ChannelMap>,
    ) -> Vec<Tariff> {
        match self.locator.locate_combo_table(section) {
            Ok(table) => {
                let tariffs = parse_combo_table(table, suffix, channel_map);
                tracing::info!("Combo tariffs found ({}): {}", label, tariffs.len());
                tariffs
            }
            Err(e) => {
                tracing::warn!("Combo tariffs ({}) skipped: {}", label, e);
                Vec::new()
            }
        }
    }
}

/// Splits tariffs into valid ones and one error per rejected tariff.
/// A missing name is reported before a missing price.
pub fn validate_tariffs(tariffs: Vec<Tariff>) -> (Vec<Tariff>, Vec<ValidationError>) {
    let mut valid = Vec::with_capacity(tariffs.len());
    let mut errors = Vec::new();

    for tariff in tariffs {
        if tariff.name().is_empty() {
            errors.push(ValidationError::MissingName(format!("{:?}", tariff)));
            continue;
        }
        if tariff.price().is_none() {
            errors.push(ValidationError::MissingPrice(tariff.name().to_string()));
            continue;
        }
        valid.push(tariff);
    }

    (valid, errors)
}
