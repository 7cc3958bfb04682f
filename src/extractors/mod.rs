// src/extractors/mod.rs
pub mod numeric;
pub mod section;
pub mod table;

// Re-export key extraction types for convenience
pub use section::SectionLocator;
pub use table::{parse_combo_table, parse_flat_table};
