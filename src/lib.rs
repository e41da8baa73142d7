//! Reactive core of the launch records dashboard: an immutable CSV-backed
//! dataset, pure filter and chart-selection functions, and an observer-style
//! binding layer that maps control changes to chart spec updates.

pub mod binding;
pub mod charts;
pub mod controls;
pub mod data;
pub mod filter;
pub mod logging;
pub mod record;
