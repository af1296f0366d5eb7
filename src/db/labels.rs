use super::db::Db;
use crate::libs::error::DashboardResult;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashMap;

const SELECT_CARD_LABELS: &str = "
    SELECT al.card_id, l.title
    FROM assigned_labels al
    JOIN labels l ON l.id = al.label_id
    JOIN cards c ON c.id = al.card_id
    JOIN stacks s ON s.id = c.stack_id
";
const WHERE_BOARD: &str = "WHERE s.board_id IN";
const ORDER_BY_ASSIGNMENT: &str = "ORDER BY al.card_id, al.id";

pub struct Labels {
    conn: Connection,
}

impl Labels {
    pub fn new(db: Db) -> Self {
        Labels { conn: db.conn }
    }

    /// Label titles per card, in assignment order, for cards on the given
    /// boards. A title assigned twice to the same card is kept once.
    pub fn fetch_for_boards(&self, board_ids: &[i64]) -> DashboardResult<HashMap<i64, Vec<String>>> {
        let mut labels: HashMap<i64, Vec<String>> = HashMap::new();
        if board_ids.is_empty() {
            return Ok(labels);
        }

        let sql = format!(
            "{} {} ({}) {}",
            SELECT_CARD_LABELS,
            WHERE_BOARD,
            vec!["?"; board_ids.len()].join(", "),
            ORDER_BY_ASSIGNMENT
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let label_iter = stmt.query_map(params_from_iter(board_ids.iter()), |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

        for label in label_iter {
            let (card_id, title) = label?;
            let card_labels = labels.entry(card_id).or_default();
            if !card_labels.contains(&title) {
                card_labels.push(title);
            }
        }
        Ok(labels)
    }
}
