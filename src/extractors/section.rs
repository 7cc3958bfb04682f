// src/extractors/section.rs

// --- Imports ---
use crate::rialcom::models::collapse_whitespace;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
// Red banner above the internet-only table
static INTERNET_HEADER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.bg-danger").expect("Failed to compile INTERNET_HEADER_SELECTOR")
});

// Dark banner above the internet + TV table
static COMBO_HEADER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.bg-dark").expect("Failed to compile COMBO_HEADER_SELECTOR")
});

// --- Banner Text ---
// Lowercased text a banner must contain; promo alerts share the same classes
const INTERNET_HEADER_TEXT: &str = "интернет";
const COMBO_HEADER_TEXT: &str = "интернет + интерактивное тв";

/// Which table of a section to look for.
#[derive(Debug, Clone, Copy)]
enum Banner {
    Internet,
    Combo,
}

impl Banner {
    fn selector(self) -> &'static Selector {
        match self {
            Banner::Internet => &INTERNET_HEADER_SELECTOR,
            Banner::Combo => &COMBO_HEADER_SELECTOR,
        }
    }

    fn required_text(self) -> &'static str {
        match self {
            Banner::Internet => INTERNET_HEADER_TEXT,
            Banner::Combo => COMBO_HEADER_TEXT,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Banner::Internet => "div.bg-danger",
            Banner::Combo => "div.bg-dark",
        }
    }
}

/// Finds the pricing sections of the page and the tables inside them.
pub struct SectionLocator;

impl Default for SectionLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionLocator {
    pub fn new() -> Self {
        Self {}
    }

    /// Finds the `<div>` container with the given id.
    pub fn locate_section<'a>(
        &self,
        document: &'a Html,
        section_id: &str,
    ) -> Result<ElementRef<'a>, ExtractError> {
        let raw = format!("div#{}", section_id);
        let selector =
            Selector::parse(&raw).map_err(|_| ExtractError::InvalidSelector(raw.clone()))?;

        document
            .select(&selector)
            .next()
            .ok_or_else(|| ExtractError::SectionNotFound(section_id.to_string()))
    }

    /// Table following the "internet" banner of a section.
    pub fn locate_internet_table<'a>(
        &self,
        section: ElementRef<'a>,
    ) -> Result<ElementRef<'a>, ExtractError> {
        self.locate_table_after(section, Banner::Internet)
    }

    /// Table following the "internet + TV" banner of a section.
    pub fn locate_combo_table<'a>(
        &self,
        section: ElementRef<'a>,
    ) -> Result<ElementRef<'a>, ExtractError> {
        self.locate_table_after(section, Banner::Combo)
    }

    fn locate_table_after<'a>(
        &self,
        section: ElementRef<'a>,
        banner: Banner,
    ) -> Result<ElementRef<'a>, ExtractError> {
        let section_label = section.value().id().unwrap_or("?").to_string();

        // First banner of the right class whose text names the offer
        let header = section
            .select(banner.selector())
            .find(|candidate| {
                let text = candidate.text().collect::<String>();
                let matches = collapse_whitespace(&text)
                    .to_lowercase()
                    .contains(banner.required_text());
                if !matches {
                    tracing::debug!("Skipping {} banner '{}'", banner.label(), text.trim());
                }
                matches
            })
            .ok_or_else(|| ExtractError::HeaderNotFound {
                section: section_label.clone(),
                header: banner.label().to_string(),
            })?;
        tracing::debug!(
            "Found header {} in section {}: '{}'",
            banner.label(),
            section_label,
            header.text().collect::<String>().trim()
        );

        self.next_table(header).ok_or(ExtractError::TableNotFound {
            section: section_label,
            header: banner.label().to_string(),
        })
    }

    /// First `<table>` after `start` in document order. The walk is not
    /// limited to the section, the header's own descendants included.
    fn next_table<'a>(&self, start: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let root = start.ancestors().last().unwrap_or(*start);

        root.descendants()
            .skip_while(|node| node.id() != start.id())
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "table")
    }
}
