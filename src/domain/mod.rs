//! Core domain types and the signal pipeline.

pub mod ohlcv;
pub mod frame;
pub mod indicator;
pub mod window;
pub mod flags;
pub mod notification;
pub mod eligibility;
pub mod trading_day;
pub mod pipeline;
pub mod config;
pub mod config_validation;
pub mod universe;
pub mod error;
