use super::db::Db;
use crate::libs::error::DashboardResult;
use crate::libs::task::Project;
use rusqlite::Connection;

/// Projects whose board exists and is live. The registry stores the board id
/// as text; rows whose id does not cast to an integer never join.
const SELECT_PROJECTS: &str = "
    SELECT p.id, p.name, b.id
    FROM projects p
    INNER JOIN boards b ON b.id = CAST(p.board_id AS INTEGER)
    WHERE b.deleted_at = 0
    ORDER BY p.id
";

pub struct Projects {
    conn: Connection,
}

impl Projects {
    pub fn new(db: Db) -> Self {
        Projects { conn: db.conn }
    }

    pub fn list(&self) -> DashboardResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(SELECT_PROJECTS)?;
        let project_iter = stmt.query_map([], |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                board_id: row.get(2)?,
            })
        })?;

        let mut projects = Vec::new();
        for project in project_iter {
            projects.push(project?);
        }
        Ok(projects)
    }
}
