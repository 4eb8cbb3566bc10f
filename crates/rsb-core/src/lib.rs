//! Core domain + application logic for the rscripts search bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the rscripts
//! HTTP API live behind ports (traits) implemented in adapter crates.

pub mod card;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod pagination;
pub mod ports;
pub mod script;
pub mod text;

pub use errors::{Error, Result};
