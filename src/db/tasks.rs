use super::db::Db;
use crate::libs::error::DashboardResult;
use crate::libs::task::{Due, RejectedRow, Task, TaskBatch};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::{params_from_iter, Connection, Row};

const SELECT_CARDS: &str = "
    SELECT c.id, c.title, s.board_id, s.title,
           CAST(c.duedate AS TEXT), CAST(c.done AS TEXT),
           CAST(c.last_modified AS INTEGER), c.archived,
           CAST(c.deleted_at AS INTEGER)
    FROM cards c
    JOIN stacks s ON s.id = c.stack_id
";
const WHERE_BOARD: &str = "WHERE s.board_id IN";
const ORDER_BY_ID: &str = "ORDER BY c.id";

/// Parses a textual store timestamp into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (also with a `T`) and bare
/// `YYYY-MM-DD`. Values without an offset are UTC. Returns `None` when the
/// text matches none of these.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parses a due date. A bare `YYYY-MM-DD` stays a calendar day; anything
/// else [`parse_timestamp`] accepts is an instant.
pub fn parse_due(value: &str) -> Option<Due> {
    let value = value.trim();
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(day) => Some(Due::Day(day)),
        Err(_) => parse_timestamp(value).map(Due::At),
    }
}

/// A card row before validation.
#[derive(Debug)]
struct CardRow {
    id: i64,
    title: String,
    board_id: i64,
    stage: String,
    duedate: Option<String>,
    done: Option<String>,
    last_modified: Option<i64>,
    archived: bool,
    deleted_at: Option<i64>,
}

impl CardRow {
    fn into_task(self) -> Result<Task, RejectedRow> {
        let id = self.id;
        let malformed = move |reason: String| RejectedRow { kind: "task", id, reason };

        let due = optional("due date", self.duedate.as_deref(), parse_due).map_err(malformed)?;
        let completed_at = optional("completion date", self.done.as_deref(), parse_timestamp).map_err(malformed)?;
        let last_activity_at = match self.last_modified {
            None | Some(0) => None,
            Some(secs) => Some(
                DateTime::from_timestamp(secs, 0)
                    .ok_or_else(|| malformed(format!("last modification {} is out of range", secs)))?,
            ),
        };

        Ok(Task {
            id: self.id,
            title: self.title,
            board_id: self.board_id,
            stage: self.stage,
            due,
            completed_at,
            last_activity_at,
            archived: self.archived,
            deleted: self.deleted_at.unwrap_or(0) != 0,
        })
    }

    /// Reads the columns of `SELECT_CARDS`. Fails on a column whose stored
    /// type does not fit, e.g. text in `archived`.
    fn decode(row: &Row) -> rusqlite::Result<CardRow> {
        Ok(CardRow {
            id: row.get(0)?,
            title: row.get(1)?,
            board_id: row.get(2)?,
            stage: row.get(3)?,
            duedate: row.get(4)?,
            done: row.get(5)?,
            last_modified: row.get(6)?,
            archived: row.get(7)?,
            deleted_at: row.get(8)?,
        })
    }
}

fn optional<T>(what: &str, value: Option<&str>, parse: fn(&str) -> Option<T>) -> Result<Option<T>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse(text)
            .map(Some)
            .ok_or_else(|| format!("unparseable {} '{}'", what, text)),
    }
}

pub struct Tasks {
    conn: Connection,
}

impl Tasks {
    pub fn new(db: Db) -> Self {
        Tasks { conn: db.conn }
    }

    /// Every card on the given boards, deleted and archived ones included.
    ///
    /// Rows that fail validation are returned in [`TaskBatch::rejected`]
    /// instead of failing the read.
    pub fn fetch(&self, board_ids: &[i64]) -> DashboardResult<TaskBatch> {
        if board_ids.is_empty() {
            return Ok(TaskBatch::default());
        }

        let sql = format!("{} {} ({}) {}", SELECT_CARDS, WHERE_BOARD, vec!["?"; board_ids.len()].join(", "), ORDER_BY_ID);
        let mut stmt = self.conn.prepare(&sql)?;
        // A row that cannot be decoded is rejected; only statement errors abort the read.
        let card_iter = stmt.query_map(params_from_iter(board_ids.iter()), |row| {
            let id: i64 = row.get(0)?;
            Ok(CardRow::decode(row).map_err(|err| RejectedRow {
                kind: "task",
                id,
                reason: err.to_string(),
            }))
        })?;

        let mut batch = TaskBatch::default();
        for card in card_iter {
            match card?.and_then(CardRow::into_task) {
                Ok(task) => batch.tasks.push(task),
                Err(rejected) => batch.rejected.push(rejected),
            }
        }

        Ok(batch)
    }
}
