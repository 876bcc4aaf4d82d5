//! Terminal CPU monitor built around a re-parsing `/proc/stat` sampler.
//!
//! [`system::stat::StatSampler`] keeps the statistics file open, rewinds and
//! re-parses it on every update, and exposes the result as a
//! [`system::stat::CpuSnapshot`]. The rest of the crate schedules updates and
//! draws them.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod system;
pub mod ui;
