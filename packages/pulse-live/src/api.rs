//! HTTP client for the market data provider
//!
//! Implements the history, name and quote seams of `pulse_core::provider`
//! over the chart and quote endpoints.

pub mod client;
pub mod types;

pub use client::*;
