//! Directory listing and expired-file deletion.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::report::{ReportSweep, ReportSweepBuilder};
use crate::spec::{SpecRetentionPolicy, SweepError};
use crate::util::{calculate_worker_limit, derive_entry_age_nanos, is_expired};

#[derive(Debug)]
struct SpecSweepContext {
    n_workers_max: usize,
    builder_sweep_report: ReportSweepBuilder,
    l_paths_expired: Vec<PathBuf>,
}

/// Delete every entry of `dir` whose modification time is older than
/// `policy.age_max` at `now`.
///
/// Only the top level of `dir` is considered; sub-directories are counted as
/// skipped and never descended into. The pass runs in two stages:
/// 1. List entries, stat them and classify them as expired/retained/skipped.
/// 2. Remove expired entries (serial or rayon thread pool).
///
/// Per-entry stat or delete failures are stored in the report and never abort
/// the pass. Returns [`SweepError`] only when `dir` itself cannot be listed.
pub fn sweep_expired_files<P>(
    dir: P,
    policy: &SpecRetentionPolicy,
    now: SystemTime,
) -> Result<ReportSweep, SweepError>
where
    P: AsRef<Path>,
{
    let path_dir = dir.as_ref().to_path_buf();
    if !path_dir.exists() {
        return Err(SweepError::DirectoryMissing(path_dir));
    }
    if !path_dir.is_dir() {
        return Err(SweepError::NotDirectory(path_dir));
    }

    let iter_entries = fs::read_dir(&path_dir).map_err(|e| SweepError::ReadDirFailed {
        path: path_dir.clone(),
        message: e.to_string(),
    })?;

    let mut spec_sweep_ctx = SpecSweepContext {
        n_workers_max: calculate_worker_limit(policy.num_workers_max),
        builder_sweep_report: ReportSweepBuilder::default(),
        l_paths_expired: Vec::new(),
    };

    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                spec_sweep_ctx.builder_sweep_report.add_warning(format!(
                    "Failed to read directory entry under {} ({e})",
                    path_dir.display()
                ));
                continue;
            }
        };
        spec_sweep_ctx.builder_sweep_report.add_scanned();

        let path_entry = entry.path();
        // Symlinks are judged by the link itself, never by the target.
        let meta_entry = match fs::symlink_metadata(&path_entry) {
            Ok(v) => v,
            Err(e) => {
                spec_sweep_ctx
                    .builder_sweep_report
                    .add_error(path_entry, format!("Failed to stat entry ({e})"));
                continue;
            }
        };
        if meta_entry.is_dir() {
            spec_sweep_ctx.builder_sweep_report.add_skipped();
            continue;
        }

        let n_age_nanos = derive_entry_age_nanos(&meta_entry, now);
        if is_expired(n_age_nanos, policy.age_max) {
            spec_sweep_ctx.l_paths_expired.push(path_entry);
        } else {
            spec_sweep_ctx.builder_sweep_report.add_retained();
        }
    }

    flush_file_delete_tasks(&mut spec_sweep_ctx);
    Ok(spec_sweep_ctx.builder_sweep_report.build())
}

fn delete_entry(path_entry: PathBuf) -> (PathBuf, Result<(), String>) {
    let res_delete = match fs::remove_file(&path_entry) {
        Ok(()) => Ok(()),
        // Removed concurrently by someone else; nothing left to do.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.to_string()),
    };
    (path_entry, res_delete)
}

fn flush_file_delete_tasks(spec_sweep_ctx: &mut SpecSweepContext) {
    let l_paths_expired = std::mem::take(&mut spec_sweep_ctx.l_paths_expired);
    if l_paths_expired.is_empty() {
        return;
    }

    let apply_results = |l_results: Vec<(PathBuf, Result<(), String>)>,
                         builder_sweep_report: &mut ReportSweepBuilder| {
        for (path_entry, res_delete) in l_results {
            match res_delete {
                Ok(_) => builder_sweep_report.add_deleted(),
                Err(msg) => builder_sweep_report.add_error(path_entry, msg),
            }
        }
    };

    if spec_sweep_ctx.n_workers_max <= 1 {
        let l_results = l_paths_expired
            .into_iter()
            .map(delete_entry)
            .collect::<Vec<_>>();
        apply_results(l_results, &mut spec_sweep_ctx.builder_sweep_report);
        return;
    }

    let thread_pool = ThreadPoolBuilder::new()
        .num_threads(spec_sweep_ctx.n_workers_max)
        .build();
    let Ok(thread_pool) = thread_pool else {
        spec_sweep_ctx.builder_sweep_report.add_warning(format!(
            "Failed to initialize thread pool (workers={}); fallback to serial delete.",
            spec_sweep_ctx.n_workers_max
        ));
        let l_results = l_paths_expired
            .into_iter()
            .map(delete_entry)
            .collect::<Vec<_>>();
        apply_results(l_results, &mut spec_sweep_ctx.builder_sweep_report);
        return;
    };

    let l_results = thread_pool.install(|| {
        l_paths_expired
            .into_par_iter()
            .map(delete_entry)
            .collect::<Vec<_>>()
    });
    apply_results(l_results, &mut spec_sweep_ctx.builder_sweep_report);
}
