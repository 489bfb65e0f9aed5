//! Export run record

use crate::error::{ExportflowError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known status values.
///
/// Status is an opaque string owned by the persistence collaborator; these
/// are the values the bundled workflows write.
pub mod status {
    pub const STARTING: &str = "Starting";
    pub const RUNNING: &str = "Running";
    pub const COMPLETED: &str = "Completed";
    pub const FAILED: &str = "Failed";
    pub const CANCELLED: &str = "Cancelled";
}

/// One execution instance of a scheduled export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRun {
    pub id: String,
    pub team_id: i64,
    pub schedule_id: Option<String>,
    pub data_interval_start: DateTime<Utc>,
    pub data_interval_end: DateTime<Utc>,
    pub status: String,
    /// Deduplicates creation when the engine redelivers a create call
    #[serde(default)]
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a run that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewExportRun {
    pub team_id: i64,
    pub schedule_id: Option<String>,
    pub data_interval_start: DateTime<Utc>,
    pub data_interval_end: DateTime<Utc>,
    pub idempotency_key: Option<String>,
}

impl NewExportRun {
    /// Fails with `InvalidInput` when the interval ends before it starts
    pub fn new(
        team_id: i64,
        data_interval_start: DateTime<Utc>,
        data_interval_end: DateTime<Utc>,
    ) -> Result<Self> {
        if data_interval_end < data_interval_start {
            return Err(ExportflowError::InvalidInput(format!(
                "data interval ends ({}) before it starts ({})",
                data_interval_end.to_rfc3339(),
                data_interval_start.to_rfc3339()
            )));
        }
        Ok(Self {
            team_id,
            schedule_id: None,
            data_interval_start,
            data_interval_end,
            idempotency_key: None,
        })
    }

    pub fn with_schedule_id(mut self, schedule_id: impl Into<String>) -> Self {
        self.schedule_id = Some(schedule_id.into());
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Materialize the record with a fresh id and the initial status
    pub(crate) fn into_run(self, now: DateTime<Utc>) -> ExportRun {
        ExportRun {
            id: uuid::Uuid::new_v4().to_string(),
            team_id: self.team_id,
            schedule_id: self.schedule_id,
            data_interval_start: self.data_interval_start,
            data_interval_end: self.data_interval_end,
            status: status::STARTING.to_string(),
            idempotency_key: self.idempotency_key,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parse a data interval bound.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`), a naive `YYYY-MM-DDTHH:MM:SS`
/// read as UTC, or a bare `YYYY-MM-DD` meaning midnight UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts.and_utc());
    }
    if let Some(ts) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(ts.and_utc());
    }

    Err(ExportflowError::InvalidInput(format!(
        "invalid timestamp '{}': expected RFC 3339 or YYYY-MM-DD",
        raw
    )))
}
