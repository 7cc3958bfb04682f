// src/rialcom/mod.rs
pub mod client;
pub mod models;

pub use models::{ChannelMap, ParseStatistics, Tariff};
