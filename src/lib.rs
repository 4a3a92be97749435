//! Analog-pattern time-series forecasting.
//!
//! Extends a series by blending historical windows whose shape resembles the
//! most recent one, each rescaled onto the recent window's statistics.

pub mod analog;
pub mod config;
pub mod diagnostics;
pub mod io;
pub mod series;
