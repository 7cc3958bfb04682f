// src/storage/mod.rs
use crate::rialcom::models::{Tariff, NULL_CELL};
use crate::utils::error::ExportError;
use rust_xlsxwriter::{ColNum, Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Тарифы";
pub const HEADERS: [&str; 4] = [
    "Название тарифа",
    "Количество каналов",
    "Скорость доступа",
    "Абонентская плата",
];
const HEADER_FILL: u32 = 0x444444;
const HEADER_FONT_SIZE: u8 = 12;
const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    fn optional_number(value: Option<f64>) -> Self {
        match value {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(NULL_CELL.to_string()),
        }
    }

    /// Text as it is measured for column widths.
    fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

/// Spreadsheet row for a tariff, in `HEADERS` order.
pub fn tariff_row(tariff: &Tariff) -> [CellValue; 4] {
    [
        CellValue::Text(tariff.name().to_string()),
        CellValue::optional_number(tariff.channels().map(f64::from)),
        CellValue::optional_number(tariff.speed()),
        CellValue::optional_number(tariff.price()),
    ]
}

/// Column widths: longest text in each column plus padding, capped.
fn column_widths(rows: &[[CellValue; 4]]) -> [usize; 4] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.display().chars().count());
        }
    }
    widths.map(|w| (w + COLUMN_PADDING).min(MAX_COLUMN_WIDTH))
}

pub struct SpreadsheetExporter {
    path: PathBuf,
}

impl SpreadsheetExporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Writes all tariffs to a single styled sheet and returns the file path.
    pub fn export(&self, tariffs: &[Tariff]) -> Result<PathBuf, ExportError> {
        if tariffs.is_empty() {
            tracing::warn!("No data to export");
            return Err(ExportError::NoData);
        }

        tracing::info!("Exporting {} tariffs to {}", tariffs.len(), self.path.display());

        let rows: Vec<[CellValue; 4]> = tariffs.iter().map(tariff_row).collect();

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        Self::write_sheet(worksheet, &rows)?;

        // Create parent directories for nested output paths
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        workbook.save(&self.path)?;

        tracing::info!("Saved spreadsheet to {}", self.path.display());
        Ok(self.path.clone())
    }

    fn write_sheet(worksheet: &mut Worksheet, rows: &[[CellValue; 4]]) -> Result<(), ExportError> {
        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_font_size(HEADER_FONT_SIZE)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        let text_format = Format::new().set_border(FormatBorder::Thin);
        let centered_format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as ColNum, *header, &header_format)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let row_num = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                // Name column left-aligned, numeric columns centered
                let format = if col == 0 { &text_format } else { &centered_format };
                match cell {
                    CellValue::Text(s) => {
                        let col = col as ColNum;
                        worksheet.write_string_with_format(row_num, col, s.as_str(), format)?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number_with_format(row_num, col as ColNum, *n, format)?;
                    }
                }
            }
        }

        for (col, width) in column_widths(rows).iter().enumerate() {
            worksheet.set_column_width(col as ColNum, *width as f64)?;
        }

        Ok(())
    }
}
