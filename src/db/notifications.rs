use super::db::Db;
use crate::libs::error::DashboardResult;
use rusqlite::{params, Connection};

pub const UPDATE_NOTIFICATION_APP: &str = "updatenotification";
pub const UPDATE_AVAILABLE_SUBJECT: &str = "update_available";

const COUNT_NOTIFICATIONS: &str = "SELECT COUNT(*) FROM notifications WHERE app = ?1 AND subject = ?2";

pub struct Notifications {
    conn: Connection,
}

impl Notifications {
    pub fn new(db: Db) -> Self {
        Notifications { conn: db.conn }
    }

    /// Number of pending "update available" notices.
    pub fn count_pending_updates(&self) -> DashboardResult<u64> {
        let count: i64 = self
            .conn
            .query_row(COUNT_NOTIFICATIONS, params![UPDATE_NOTIFICATION_APP, UPDATE_AVAILABLE_SUBJECT], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
