//! Hourly retention sweep over the output directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Duration as ChronoDuration, DurationRound, Utc};
use sheetkit_io_fs::{ReportSweep, SpecRetentionPolicy, sweep_expired_files};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Source of "now" for scheduling and age checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time left until the next wall-clock `hh:minute:00`, strictly after `now`.
pub fn duration_until_next_run(now: DateTime<Utc>, minute: u32) -> Duration {
    let hour_start = now
        .duration_trunc(ChronoDuration::hours(1))
        .unwrap_or(now);
    let mut next = hour_start + ChronoDuration::minutes(i64::from(minute % 60));
    if next <= now {
        next += ChronoDuration::hours(1);
    }
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Clone)]
pub struct RetentionSweeper {
    path_dir: PathBuf,
    policy: SpecRetentionPolicy,
    minute: u32,
    clock: Arc<dyn Clock>,
}

impl RetentionSweeper {
    pub fn new(
        path_dir: impl Into<PathBuf>,
        age_max: Duration,
        minute: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            path_dir: path_dir.into(),
            policy: SpecRetentionPolicy {
                age_max,
                ..SpecRetentionPolicy::default()
            },
            minute,
            clock,
        }
    }

    /// Sweep once and log the outcome. `None` when the directory itself failed.
    pub fn run_once(&self) -> Option<ReportSweep> {
        let now = SystemTime::from(self.clock.now());
        match sweep_expired_files(&self.path_dir, &self.policy, now) {
            Ok(report) => {
                for spec_err in &report.errors {
                    tracing::warn!(
                        path = %spec_err.path.display(),
                        error = %spec_err.exception,
                        "retention sweep failed on entry"
                    );
                }
                for c_warning in &report.warnings {
                    tracing::warn!("{c_warning}");
                }
                tracing::info!(dir = %self.path_dir.display(), "{report}");
                Some(report)
            }
            Err(err) => {
                tracing::warn!(error = %err, "retention sweep skipped");
                None
            }
        }
    }

    /// Start the hourly loop on the tokio runtime.
    pub fn spawn(self) -> SweeperHandle {
        let (tx_stop, mut rx_stop) = oneshot::channel::<()>();
        let join = tokio::spawn(async move {
            loop {
                let wait = duration_until_next_run(self.clock.now(), self.minute);
                tracing::debug!(secs = wait.as_secs(), "next retention sweep scheduled");
                tokio::select! {
                    _ = &mut rx_stop => break,
                    () = tokio::time::sleep(wait) => {
                        let sweeper = self.clone();
                        if let Err(err) = tokio::task::spawn_blocking(move || sweeper.run_once()).await {
                            tracing::error!(error = %err, "retention sweep task panicked");
                        }
                    }
                }
            }
            tracing::info!("retention sweeper stopped");
        });
        SweeperHandle { tx_stop, join }
    }
}

/// Owner-side control of a spawned sweeper loop.
pub struct SweeperHandle {
    tx_stop: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.tx_stop.send(());
        if let Err(err) = self.join.await {
            tracing::error!(error = %err, "retention sweeper ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use filetime::{FileTime, set_file_mtime};
    use tempfile::TempDir;

    use super::*;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn next_run_is_top_of_next_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 30).unwrap();
        assert_eq!(
            duration_until_next_run(now, 0),
            Duration::from_secs(44 * 60 + 30)
        );
    }

    #[test]
    fn run_exactly_on_schedule_waits_a_full_hour() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(duration_until_next_run(now, 0), Duration::from_secs(3600));
    }

    #[test]
    fn next_run_honours_minute_offset() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 0).unwrap();
        assert_eq!(duration_until_next_run(now, 20), Duration::from_secs(5 * 60));
        assert_eq!(duration_until_next_run(now, 10), Duration::from_secs(55 * 60));
    }

    #[test]
    fn run_once_uses_injected_clock() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("excel-file-1.xlsx");
        std::fs::write(&path_file, b"x").expect("write");
        let now_real = Utc::now();
        set_file_mtime(&path_file, FileTime::from_system_time(SystemTime::from(now_real)))
            .expect("mtime");

        let sweeper_early = RetentionSweeper::new(
            tmp.path(),
            Duration::from_secs(3600),
            0,
            Arc::new(FixedClock(now_real + ChronoDuration::minutes(59))),
        );
        let report = sweeper_early.run_once().expect("report");
        assert_eq!(report.cnt_retained, 1);
        assert!(path_file.exists());

        let sweeper_late = RetentionSweeper::new(
            tmp.path(),
            Duration::from_secs(3600),
            0,
            Arc::new(FixedClock(now_real + ChronoDuration::minutes(61))),
        );
        let report = sweeper_late.run_once().expect("report");
        assert_eq!(report.cnt_deleted, 1);
        assert!(!path_file.exists());
    }

    #[test]
    fn run_once_on_missing_dir_logs_and_returns_none() {
        let tmp = TempDir::new().expect("tempdir");
        let sweeper = RetentionSweeper::new(
            tmp.path().join("missing"),
            Duration::from_secs(3600),
            0,
            Arc::new(SystemClock),
        );
        assert!(sweeper.run_once().is_none());
    }

    #[tokio::test]
    async fn spawned_sweeper_stops_on_request() {
        let tmp = TempDir::new().expect("tempdir");
        let handle = RetentionSweeper::new(
            tmp.path(),
            Duration::from_secs(3600),
            0,
            Arc::new(SystemClock),
        )
        .spawn();
        tokio::time::timeout(Duration::from_secs(5), handle.stop())
            .await
            .expect("sweeper stopped");
    }
}
