//! Sweep report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecSweepError;

/// Aggregate counters and diagnostics for one `sweep_expired_files` run.
#[derive(Debug, Default, Clone)]
pub struct ReportSweep {
    /// Total directory entries listed.
    pub cnt_scanned: u64,
    /// Expired entries removed.
    pub cnt_deleted: u64,
    /// Entries still inside the retention window.
    pub cnt_retained: u64,
    /// Entries left alone regardless of age (sub-directories).
    pub cnt_skipped: u64,
    /// Non-fatal warnings collected during the pass.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecSweepError>,
}

impl ReportSweep {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_deleted".to_string(), self.cnt_deleted);
        dict_counts.insert("cnt_retained".to_string(), self.cnt_retained);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} deleted={} retained={} skipped={} errors={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_deleted"],
            dict_counts["cnt_retained"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportSweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SWEEP]"))
    }
}

/// Mutable accumulator for sweep statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportSweepBuilder {
    /// See [`ReportSweep::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportSweep::cnt_deleted`].
    pub cnt_deleted: u64,
    /// See [`ReportSweep::cnt_retained`].
    pub cnt_retained: u64,
    /// See [`ReportSweep::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportSweep::errors`].
    pub errors: Vec<SpecSweepError>,
    /// See [`ReportSweep::warnings`].
    pub warnings: Vec<String>,
}

impl ReportSweepBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_deleted(&mut self) {
        self.cnt_deleted += 1;
    }

    pub fn add_retained(&mut self) {
        self.cnt_retained += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        self.errors.push(SpecSweepError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportSweep {
        ReportSweep {
            cnt_scanned: self.cnt_scanned,
            cnt_deleted: self.cnt_deleted,
            cnt_retained: self.cnt_retained,
            cnt_skipped: self.cnt_skipped,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_sweep_to_dict_and_format() {
        let report = ReportSweep {
            cnt_scanned: 6,
            cnt_deleted: 3,
            cnt_retained: 2,
            cnt_skipped: 1,
            warnings: vec![],
            errors: vec![SpecSweepError {
                path: PathBuf::from("gone.xlsx"),
                exception: "denied".to_string(),
            }],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_deleted"], 3);
        assert_eq!(dict_counts["cnt_errors"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 0);

        let txt = report.format("[SWEEP]");
        assert_eq!(
            txt,
            "[SWEEP] scanned=6 deleted=3 retained=2 skipped=1 errors=1 warnings=0"
        );
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn builder_accumulates_counts() {
        let mut builder = ReportSweepBuilder::default();
        builder.add_scanned();
        builder.add_scanned();
        builder.add_deleted();
        builder.add_retained();
        builder.add_warning("slow disk".to_string());

        let report = builder.build();
        assert_eq!(report.cnt_scanned, 2);
        assert_eq!(report.cnt_deleted, 1);
        assert_eq!(report.cnt_retained, 1);
        assert_eq!(report.cnt_skipped, 0);
        assert_eq!(report.warning_count(), 1);
    }
}
