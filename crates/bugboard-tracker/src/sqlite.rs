//! SQLite storage for bugs and comments.

use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;

use crate::validation::validate_status;
use crate::{
    Bug, BugPatch, BugStatus, BugStore, Comment, NewBug, NewComment, Result, TrackerError,
};

/// Schema applied on every open. Statements are idempotent.
pub const SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS bugs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'unresolved',
        assignee_id TEXT,
        CHECK (length(title) >= 1 AND length(title) <= 100),
        CHECK (status IN ('resolved', 'unresolved')),
        CHECK (assignee_id IS NULL OR length(assignee_id) <= 10)
    );
    CREATE INDEX IF NOT EXISTS idx_bugs_status ON bugs(status);

    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        bug_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        FOREIGN KEY (bug_id) REFERENCES bugs(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_comments_bug_id ON comments(bug_id);
";

const BUG_COLUMNS: &str = "id, title, description, status, assignee_id";
const COMMENT_COLUMNS: &str = "id, title, body, bug_id";

impl ToSql for BugStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BugStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        validate_status(raw)
            .map_err(|_| FromSqlError::Other(format!("unknown bug status: {raw}").into()))
    }
}

/// SQLite-backed store.
///
/// A single connection is shared behind a mutex; every compound operation
/// runs in its own transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        tracing::info!(path = %path.display(), "Opened SQLite bug store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Creates tables and enables foreign key enforcement.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

fn sql_id(id: u64) -> i64 {
    // Ids past i64::MAX were never issued, so clamping keeps lookups "not found".
    i64::try_from(id).unwrap_or(i64::MAX)
}

fn bug_from_row(row: &Row<'_>) -> rusqlite::Result<Bug> {
    Ok(Bug {
        id: row.get::<_, i64>(0)? as u64,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        assignee_id: row.get(4)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get::<_, i64>(0)? as u64,
        title: row.get(1)?,
        body: row.get(2)?,
        bug: row.get::<_, i64>(3)? as u64,
    })
}

fn find_bug(conn: &Connection, id: u64) -> Result<Option<Bug>> {
    let bug = conn
        .query_row(
            &format!("SELECT {BUG_COLUMNS} FROM bugs WHERE id = ?1"),
            [sql_id(id)],
            bug_from_row,
        )
        .optional()?;
    Ok(bug)
}

fn require_bug(tx: &Transaction<'_>, id: u64) -> Result<Bug> {
    find_bug(tx, id)?.ok_or(TrackerError::BugNotFound { id })
}

impl BugStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn create_bug(&self, new: NewBug) -> Result<Bug> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO bugs (title, description, status, assignee_id) VALUES (?1, ?2, ?3, ?4)",
            params![new.title, new.description, new.status, new.assignee_id],
        )?;
        let id = conn.last_insert_rowid() as u64;

        Ok(Bug::from_new(id, new))
    }

    fn get_bug(&self, id: u64) -> Result<Bug> {
        let conn = self.conn.lock();
        find_bug(&conn, id)?.ok_or(TrackerError::BugNotFound { id })
    }

    fn list_bugs(&self, status: Option<BugStatus>) -> Result<Vec<Bug>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {BUG_COLUMNS} FROM bugs WHERE ?1 IS NULL OR status = ?1 ORDER BY id ASC"
        ))?;

        let bugs = stmt
            .query_map([status], bug_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(bugs)
    }

    fn update_bug(&self, id: u64, patch: BugPatch) -> Result<Bug> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let mut bug = require_bug(&tx, id)?;
        bug.apply(patch);
        tx.execute(
            "UPDATE bugs SET title = ?1, description = ?2, status = ?3, assignee_id = ?4
             WHERE id = ?5",
            params![
                bug.title,
                bug.description,
                bug.status,
                bug.assignee_id,
                sql_id(id)
            ],
        )?;

        tx.commit()?;
        Ok(bug)
    }

    fn delete_bug(&self, id: u64) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        require_bug(&tx, id)?;
        let removed = tx.execute("DELETE FROM comments WHERE bug_id = ?1", [sql_id(id)])?;
        tx.execute("DELETE FROM bugs WHERE id = ?1", [sql_id(id)])?;

        tx.commit()?;
        tracing::debug!(bug_id = id, comments = removed, "Cascaded bug delete");
        Ok(())
    }

    fn create_comment(&self, bug_id: u64, new: NewComment) -> Result<Comment> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        require_bug(&tx, bug_id)?;
        tx.execute(
            "INSERT INTO comments (bug_id, title, body) VALUES (?1, ?2, ?3)",
            params![sql_id(bug_id), new.title, new.body],
        )?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit()?;
        Ok(Comment::from_new(id, bug_id, new))
    }

    fn get_comment(&self, bug_id: u64, comment_id: u64) -> Result<Comment> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1 AND bug_id = ?2"),
            [sql_id(comment_id), sql_id(bug_id)],
            comment_from_row,
        )
        .optional()?
        .ok_or(TrackerError::CommentNotFound { id: comment_id })
    }

    fn delete_comment(&self, bug_id: u64, comment_id: u64) -> Result<()> {
        let conn = self.conn.lock();
        let removed = conn.execute(
            "DELETE FROM comments WHERE id = ?1 AND bug_id = ?2",
            [sql_id(comment_id), sql_id(bug_id)],
        )?;

        if removed == 0 {
            return Err(TrackerError::CommentNotFound { id: comment_id });
        }
        Ok(())
    }

    fn count_bugs(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM bugs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn count_comments(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
