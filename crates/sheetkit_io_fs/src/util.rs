use std::fs::Metadata;
use std::time::{Duration, SystemTime};

use filetime::FileTime;

pub(crate) fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}

fn convert_file_time_to_nanos(file_time: FileTime) -> i128 {
    i128::from(file_time.unix_seconds()) * 1_000_000_000 + i128::from(file_time.nanoseconds())
}

/// Signed age of an entry at `now`, in nanoseconds.
///
/// Negative when the modification time lies in the future.
pub(crate) fn derive_entry_age_nanos(meta: &Metadata, now: SystemTime) -> i128 {
    let file_time_modify = FileTime::from_last_modification_time(meta);
    let file_time_now = FileTime::from_system_time(now);
    convert_file_time_to_nanos(file_time_now) - convert_file_time_to_nanos(file_time_modify)
}

/// Strictly-older-than check; an entry exactly `age_max` old is kept.
pub(crate) fn is_expired(n_age_nanos: i128, age_max: Duration) -> bool {
    n_age_nanos > age_max.as_nanos() as i128
}
