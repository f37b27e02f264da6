//! foodfinder: ranked eatery search for the terminal
//!
//! Fetches candidates from a hybrid search service (or a JSON file),
//! then filters, sorts, and paginates them locally. The ranking pipeline
//! in [`ranking`] is pure; the network edges live in [`provider`].

pub mod config;
pub mod errors;
pub mod logging;
pub mod provider;
pub mod ranking;
pub mod service;
