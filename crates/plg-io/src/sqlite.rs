//! SQLite export backend (feature `sqlite`).
//!
//! Creates a single `plg.db` file in the configured output directory with
//! two tables: `nodes` and `path_samples`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::PathWriter;
use crate::{NodeRow, OutputResult, PathRow};

/// Writes the node table and generated paths to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `plg.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("plg.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS nodes (
                 node_id INTEGER PRIMARY KEY,
                 x       REAL    NOT NULL,
                 y       REAL    NOT NULL,
                 lane_id INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS path_samples (
                 path_id INTEGER NOT NULL,
                 step    INTEGER NOT NULL,
                 node_id INTEGER NOT NULL,
                 x       REAL    NOT NULL,
                 y       REAL    NOT NULL,
                 heading REAL    NOT NULL,
                 PRIMARY KEY (path_id, step)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl PathWriter for SqliteWriter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO nodes (node_id, x, y, lane_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.node_id, row.x, row.y, row.lane_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_path(&mut self, rows: &[PathRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO path_samples \
                 (path_id, step, node_id, x, y, heading) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.path_id,
                    row.step,
                    row.node_id,
                    row.x,
                    row.y,
                    row.heading,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
