// src/extractors/table.rs

// --- Imports ---
use crate::extractors::numeric::{
    extract_channels, extract_number, extract_speed, strip_channel_suffix,
};
use crate::rialcom::models::{collapse_whitespace, ChannelMap, Tariff};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

// --- Constants ---
// Flat table columns: name | price | (unused) | speed
const FLAT_MIN_CELLS: usize = 4;
const FLAT_NAME_COL: usize = 0;
const FLAT_PRICE_COL: usize = 1;
const FLAT_SPEED_COL: usize = 3;

// --- CSS Selectors (Lazy Static) ---
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static THEAD_HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead th").expect("Failed to compile THEAD_HEADER_SELECTOR"));

static TIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)").expect("Failed to compile TIER_RE"));

/// Whitespace-collapsed text content of an element.
fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Direct child cells of a row with the given tag name ("td" or "th").
fn child_cells<'a>(row: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == tag)
        .collect()
}

/// Header texts of a matrix table. Uses `<thead>` when present, otherwise
/// the first row made of `<th>` cells.
fn header_texts(table: ElementRef) -> Vec<String> {
    let from_thead: Vec<String> = table.select(&THEAD_HEADER_SELECTOR).map(element_text).collect();
    if !from_thead.is_empty() {
        return from_thead;
    }

    table
        .select(&ROW_SELECTOR)
        .map(|row| child_cells(row, "th"))
        .find(|cells| !cells.is_empty())
        .map(|cells| cells.into_iter().map(element_text).collect())
        .unwrap_or_default()
}

/// Bandwidth tier from a column header: its first integer, if any.
fn header_tier(header: &str) -> Option<f64> {
    TIER_RE
        .captures(header)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parses a flat "name | price | ... | speed" table.
pub fn parse_flat_table(table: ElementRef) -> Vec<Tariff> {
    let mut tariffs = Vec::new();

    for row in table.select(&ROW_SELECTOR) {
        let cells = child_cells(row, "td");
        if cells.len() < FLAT_MIN_CELLS {
            continue; // Header rows and short rows carry no tariff
        }

        let name = element_text(cells[FLAT_NAME_COL]);
        let price = extract_number(&element_text(cells[FLAT_PRICE_COL]));
        let speed = extract_speed(&element_text(cells[FLAT_SPEED_COL]));

        match price {
            Some(price) if !name.is_empty() => {
                tracing::debug!("Added internet tariff: {}", name);
                tariffs.push(Tariff::new(name, None, speed, Some(price)));
            }
            _ => tracing::trace!("Skipping flat row without name or price: '{}'", name),
        }
    }

    tariffs
}

/// Parses a combo (internet + TV) matrix table: one row per TV package,
/// one price column per bandwidth tier.
///
/// Each row's channel count comes from its own label; when the label has
/// none, `channel_map` is consulted with the cleaned package name.
pub fn parse_combo_table(
    table: ElementRef,
    name_suffix: &str,
    channel_map: Option<&ChannelMap>,
) -> Vec<Tariff> {
    let mut tariffs = Vec::new();

    // Skip the label column
    let headers: Vec<String> = header_texts(table).into_iter().skip(1).collect();
    let tiers: Vec<Option<f64>> = headers.iter().map(|h| header_tier(h)).collect();
    tracing::debug!("Combo table columns: {:?} -> tiers {:?}", headers, tiers);

    for row in table.select(&ROW_SELECTOR) {
        let cells = child_cells(row, "td");
        let Some(label_cell) = cells.first() else {
            continue;
        };

        let label = element_text(*label_cell);
        let base_name = strip_channel_suffix(&label);
        let channels = extract_channels(&label)
            .or_else(|| channel_map.and_then(|map| map.get(&base_name)));

        for (i, (header, tier)) in headers.iter().zip(&tiers).enumerate() {
            let Some(speed) = tier else {
                continue;
            };
            let Some(price_cell) = cells.get(i + 1) else {
                continue;
            };
            let Some(price) = extract_number(&element_text(*price_cell)) else {
                continue;
            };

            let name = format!("{} + {}{}", base_name, header, name_suffix);
            tracing::debug!("Added combo tariff: {}", name);
            tariffs.push(Tariff::new(name, channels, Some(*speed), Some(price)));
        }
    }

    tariffs
}
