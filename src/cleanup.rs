//! Periodic sweep of the generated-output directory.
//!
//! Generation writes under fresh unique names, so the sweep only ever sees
//! finished files. Every per-file problem is counted and swallowed; a sweep
//! never fails a caller.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted: usize,
    pub errors: usize,
}

/// Delete generated files older than `max_age_minutes`.
pub fn sweep(dir: &Path, max_age_minutes: i64) -> SweepReport {
    sweep_older_than(dir, Utc::now() - Duration::minutes(max_age_minutes))
}

fn sweep_older_than(dir: &Path, cutoff: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "sweep could not list directory");
            report.errors += 1;
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                report.errors += 1;
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from);
        match modified {
            Ok(modified) if modified < cutoff => match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %path.display(), "swept stale output file");
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "sweep failed to delete");
                    report.errors += 1;
                }
            },
            Ok(_) => {}
            Err(_) => {
                report.errors += 1;
            }
        }
    }

    report
}
