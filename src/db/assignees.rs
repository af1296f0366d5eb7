use super::db::Db;
use crate::libs::error::DashboardResult;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashSet;

const SELECT_ASSIGNED_CARDS: &str = "
    SELECT DISTINCT au.card_id
    FROM assigned_users au
    JOIN cards c ON c.id = au.card_id
    JOIN stacks s ON s.id = c.stack_id
";
const WHERE_BOARD: &str = "WHERE s.board_id IN";

pub struct Assignees {
    conn: Connection,
}

impl Assignees {
    pub fn new(db: Db) -> Self {
        Assignees { conn: db.conn }
    }

    /// Ids of cards on the given boards with at least one assignee.
    pub fn fetch_assigned(&self, board_ids: &[i64]) -> DashboardResult<HashSet<i64>> {
        if board_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!("{} {} ({})", SELECT_ASSIGNED_CARDS, WHERE_BOARD, vec!["?"; board_ids.len()].join(", "));
        let mut stmt = self.conn.prepare(&sql)?;
        let card_iter = stmt.query_map(params_from_iter(board_ids.iter()), |row| row.get::<_, i64>(0))?;

        let mut assigned = HashSet::new();
        for card_id in card_iter {
            assigned.insert(card_id?);
        }
        Ok(assigned)
    }
}
