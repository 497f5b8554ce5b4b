//! `sheetkit_io_fs` v1:
//! Retention sweep over the generated-file directory.
//!
//! Module layout:
//! - `sweep`  : listing and expired-entry deletion
//! - `spec`   : policy/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod report;
pub mod spec;
pub mod sweep;
mod util;

pub use report::{ReportSweep, ReportSweepBuilder};
pub use spec::{N_SECS_RETENTION_AGE_MAX_DEFAULT, SpecRetentionPolicy, SpecSweepError, SweepError};
pub use sweep::sweep_expired_files;
