use crate::pipeline::RunCounters;
use crate::scanner::ScanStatistics;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Running wall clock for one page-count run.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    start: Instant,
    started_at: DateTime<Utc>,
}

impl RunClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn finish(self) -> RunTiming {
        RunTiming {
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed: self.start.elapsed(),
        }
    }
}

/// Start and finish of a run. `elapsed` comes from a monotonic clock, the
/// timestamps are for display only.
#[derive(Debug, Clone, Serialize)]
pub struct RunTiming {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Everything known about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub counters: RunCounters,
    pub timing: RunTiming,
    pub scan: ScanStatistics,
    /// The walk was stopped by Ctrl+C; totals cover submitted work only.
    pub cancelled: bool,
}
