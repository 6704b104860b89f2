//! Cache integrity checks.
//!
//! Walks every metadata record and its changelog bucket and reports what
//! looks wrong. Nothing is repaired.

use tracing::{info, warn};

use hostcache_store::{decode_meta, validate_bucket_name, CacheError};

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub hosts_checked: u32,
    /// Changelog entries across all host buckets.
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every host recorded in the metadata bucket.
///
/// Per-host problems are collected in the report; only a failure to read
/// the metadata bucket itself is returned as an error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, CacheError> {
    let _enter = env.span.enter();
    let mut report = IntegrityReport::default();

    let dbi = env.lock_dbi()?;
    let rtxn = env.env.read_txn().map_err(LmdbError::from)?;

    for entry in env.meta_db.iter(&rtxn).map_err(LmdbError::from)? {
        let (key, value) = entry.map_err(LmdbError::from)?;
        let host = String::from_utf8_lossy(key);
        report.hosts_checked += 1;

        if let Err(e) = validate_bucket_name(&host) {
            report.errors.push(format!("host '{host}': {e}"));
            continue;
        }

        match decode_meta(value) {
            Ok(meta) if meta.name != host => {
                report.errors.push(format!(
                    "host '{host}': record is named '{}'",
                    meta.name
                ));
            }
            Ok(_) => {}
            Err(e) => report.errors.push(format!("host '{host}': {e}")),
        }

        match env.host_bucket(&dbi, &rtxn, &host) {
            Ok(Some(bucket)) => match bucket.len(&rtxn) {
                Ok(count) => report.total_entries += count,
                Err(e) => report
                    .errors
                    .push(format!("host '{host}': failed to read changelog bucket: {e}")),
            },
            Ok(None) => report
                .errors
                .push(format!("host '{host}': changelog bucket is missing")),
            Err(e) => report
                .errors
                .push(format!("host '{host}': failed to open changelog bucket: {e}")),
        }
    }

    for error in &report.errors {
        warn!("{error}");
    }
    info!(
        hosts = report.hosts_checked,
        entries = report.total_entries,
        errors = report.errors.len(),
        "integrity check finished"
    );
    Ok(report)
}
