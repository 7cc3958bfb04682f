// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Covers connect errors and timeouts

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // Any other non-2xx status

    #[error("Tariff page not found: {0}")]
    NotFound(String),
}

/// Structural problems while locating markup. Never fatal for a run:
/// the aggregator logs them and treats the affected part as empty.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Header '{header}' not found in section {section}")]
    HeaderNotFound { section: String, header: String },

    #[error("No table follows header '{header}' in section {section}")]
    TableNotFound { section: String, header: String },
}

/// Reason a constructed tariff was rejected before export.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Tariff without a name: {0}")]
    MissingName(String),

    #[error("Tariff without a price: {0}")]
    MissingPrice(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No tariffs to export")]
    NoData,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load tariff page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No tariffs found")]
    NoTariffs,
}
