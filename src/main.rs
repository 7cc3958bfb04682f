// src/main.rs
mod aggregator;
mod config;
mod extractors;
mod rialcom;
mod storage;
mod utils;

use aggregator::{AggregationReport, TariffAggregator};
use clap::Parser;
use config::ScraperConfig;
use rialcom::ParseStatistics;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::ExitCode;
use std::time::Duration;
use storage::SpreadsheetExporter;
use utils::AppError;

const EXIT_INTERRUPTED: u8 = 130;

/// Scrapes the RialCom tariff page into a spreadsheet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the tariff page
    #[arg(long, default_value = config::DEFAULT_URL)]
    url: String,

    /// Output spreadsheet path
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_FILENAME)]
    output: PathBuf,

    /// Expected number of tariffs, used only for the summary
    #[arg(long, default_value_t = config::DEFAULT_EXPECTED_TARIFFS)]
    expected: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Also print the parsed tariffs as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Debug-level logging (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> Result<ScraperConfig, AppError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(AppError::Config(format!("Unsupported URL: {}", self.url)));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("Timeout must be at least one second".to_string()));
        }

        Ok(ScraperConfig {
            url: self.url.clone(),
            output_path: self.output.clone(),
            expected_tariffs: self.expected,
            request_timeout: Duration::from_secs(self.timeout_secs),
            ..ScraperConfig::default()
        })
    }
}

fn print_statistics(stats: &ParseStatistics) {
    println!("\n{}", "=".repeat(50));
    println!("СТАТИСТИКА ПАРСИНГА");
    println!("{}", "=".repeat(50));
    println!("Всего тарифов: {}", stats.total);
    println!("Ожидалось: {}", stats.expected);
    println!("Разница: {} ({}%)", stats.difference, stats.percentage);
    println!("{}", "=".repeat(50));
}

fn print_json(report: &AggregationReport, config: &ScraperConfig) -> Result<(), AppError> {
    let dump = serde_json::json!({
        "source": config.url,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "statistics": report.statistics,
        "rejected": report.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "tariffs": report.tariffs,
    });
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

/// Fetches and aggregates the page, then prints the summary.
async fn collect(aggregator: &TariffAggregator) -> Result<AggregationReport, AppError> {
    // A failed download aborts the run
    let report = aggregator.run().await?;

    if report.tariffs.is_empty() {
        return Err(AppError::NoTariffs);
    }

    print_statistics(&report.statistics);
    Ok(report)
}

/// Writes the spreadsheet and, if asked, the JSON dump.
fn publish(report: &AggregationReport, config: &ScraperConfig, json: bool) -> Result<(), AppError> {
    let exporter = SpreadsheetExporter::new(&config.output_path);
    let path = exporter.export(&report.tariffs)?;
    println!("\nФайл сохранен: {}", path.display());

    if json {
        print_json(report, config)?;
    }

    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Runs `work` unless `interrupt` resolves first (`None`).
async fn unless_interrupted<I, F>(interrupt: Pin<&mut I>, work: F) -> Option<F::Output>
where
    I: Future<Output = ()>,
    F: Future,
{
    tokio::select! {
        biased;
        () = interrupt => None,
        output = work => Some(output),
    }
}

fn interrupted_exit() -> ExitCode {
    tracing::warn!("Interrupted by user");
    eprintln!("\nОстановлено пользователем");
    ExitCode::from(EXIT_INTERRUPTED)
}

fn failure_exit(e: AppError) -> ExitCode {
    tracing::error!("Run failed: {}", e);
    eprintln!("\nОшибка: {}", e);
    ExitCode::FAILURE
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Build configuration from CLI arguments
    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => return failure_exit(e),
    };
    let aggregator = TariffAggregator::new(config);

    let interrupt = interrupted();
    tokio::pin!(interrupt);

    // 4. Fetch and aggregate
    let report = match unless_interrupted(interrupt.as_mut(), collect(&aggregator)).await {
        None => return interrupted_exit(),
        Some(Err(e)) => return failure_exit(e),
        Some(Ok(report)) => report,
    };

    // 5. Export, unless Ctrl-C arrived while aggregating
    let export = async {
        // Let the signal driver deliver a pending Ctrl-C first
        tokio::task::yield_now().await;
        publish(&report, aggregator.config(), args.json)
    };
    match unless_interrupted(interrupt.as_mut(), export).await {
        None => interrupted_exit(),
        Some(Err(e)) => failure_exit(e),
        Some(Ok(())) => ExitCode::SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rialcom::Tariff;
    use scraper::Html;
    use storage::{tariff_row, CellValue};

    fn single_tariff_report() -> AggregationReport {
        let tariffs = vec![Tariff::new("Базовый", None, Some(50.0), Some(500.0))];
        AggregationReport {
            statistics: ParseStatistics::compute(tariffs.len(), 1),
            tariffs,
            errors: Vec::new(),
        }
    }

    fn temp_output(tag: &str) -> ScraperConfig {
        let file_name = format!("rialcom_{}_{}.xlsx", tag, std::process::id());
        ScraperConfig {
            output_path: std::env::temp_dir().join(file_name),
            ..ScraperConfig::default()
        }
    }

    #[test]
    fn test_single_flat_row_end_to_end() {
        let html = r#"
            <html><body>
            <div id="collapse1">
              <div class="bg-danger">Интернет</div>
              <table>
                <thead><tr><th>Тариф</th><th>Цена</th><th>Период</th><th>Скорость</th></tr></thead>
                <tbody><tr><td>Базовый</td><td>500</td><td>мес.</td><td>до 50 Мбит/с</td></tr></tbody>
              </table>
            </div>
            <div id="collapse2"></div>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        let report = TariffAggregator::new(ScraperConfig::default()).aggregate(&document);
        let rows: Vec<_> = report.tariffs.iter().map(tariff_row).collect();

        assert_eq!(rows.len(), 1, "Expected exactly one data row");
        assert_eq!(
            rows[0],
            [
                CellValue::Text("Базовый".to_string()),
                CellValue::Text("null".to_string()),
                CellValue::Number(50.0),
                CellValue::Number(500.0),
            ]
        );
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from(["rialcom_tariffs", "-o", "out/t.xlsx", "--expected", "10"]);
        let config = args.to_config().expect("defaults should be valid");

        assert_eq!(config.url, config::DEFAULT_URL);
        assert_eq!(config.output_path, PathBuf::from("out/t.xlsx"));
        assert_eq!(config.expected_tariffs, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.mkd_section_id, "collapse1");
    }

    #[test]
    fn test_args_reject_bad_url() {
        let args = Args::parse_from(["rialcom_tariffs", "--url", "ftp://example.com"]);
        assert!(matches!(args.to_config(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_interrupt_before_export_skips_the_file() {
        let config = temp_output("interrupted");
        let report = single_tariff_report();
        let interrupt = std::future::ready(());
        tokio::pin!(interrupt);

        let export = async { publish(&report, &config, false) };
        let outcome = tokio_test::block_on(unless_interrupted(interrupt.as_mut(), export));

        assert!(outcome.is_none(), "A pending Ctrl-C must win over the export");
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_export_runs_without_interrupt() {
        let config = temp_output("uninterrupted");
        let report = single_tariff_report();
        let interrupt = std::future::pending::<()>();
        tokio::pin!(interrupt);

        let export = async { publish(&report, &config, false) };
        let outcome = tokio_test::block_on(unless_interrupted(interrupt.as_mut(), export));

        assert!(matches!(outcome, Some(Ok(()))), "Export should complete: {:?}", outcome);
        assert!(config.output_path.exists());
        let _ = std::fs::remove_file(&config.output_path);
    }
}
