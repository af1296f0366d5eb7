//! Failure kinds of a dashboard pass.
//!
//! Only [`DashboardError::SourceUnavailable`] ever reaches the caller. Rule and
//! record failures are recovered inside the engines: logged, then left out of
//! the output they would otherwise corrupt.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The task store could not be reached or the core listings failed.
    #[error("Task store unavailable: {0}")]
    SourceUnavailable(String),

    /// One alert rule could not be evaluated; the rest of the feed stands.
    #[error("Alert rule '{rule}' skipped: {reason}")]
    PartialRuleFailure { rule: &'static str, reason: String },

    /// A row failed validation and was quarantined.
    #[error("Malformed {kind} record {id}: {reason}")]
    MalformedRecord { kind: &'static str, id: i64, reason: String },
}

impl DashboardError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DashboardError::SourceUnavailable(_))
    }
}

impl From<rusqlite::Error> for DashboardError {
    fn from(err: rusqlite::Error) -> Self {
        DashboardError::SourceUnavailable(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DashboardError {
    fn from(err: tokio::task::JoinError) -> Self {
        DashboardError::SourceUnavailable(format!("store read aborted: {}", err))
    }
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
