use crate::domain::{DomainError, MediaIndex, MediaKind, RawMediaRecord, RowVisitor};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::ops::Deref;
use std::path::Path;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

const POOL_SIZE: usize = 2;

/// Read-only view over a MediaStore-shaped SQLite file.
///
/// Expects an `images` and a `video` table with the usual MediaStore column
/// names. `duration`, `width` and `height` are optional; older index versions
/// do not have them and they come back as `None`.
pub struct SqliteMediaIndex {
    pool: Mutex<Vec<Connection>>,
    available: Condvar,
}

/// Optional columns present on one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct OptionalColumns {
    duration: bool,
    width: bool,
    height: bool,
}

fn table_for(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "images",
        MediaKind::Video => "video",
    }
}

impl SqliteMediaIndex {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        info!("Opening media index at {}", path.display());

        let mut connections = Vec::with_capacity(POOL_SIZE);
        for _ in 0..POOL_SIZE {
            connections.push(Self::open_conn(path)?);
        }

        Ok(Self {
            pool: Mutex::new(connections),
            available: Condvar::new(),
        })
    }

    fn open_conn(path: &Path) -> Result<Connection, DomainError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DomainError::Database(format!("Failed to open media index: {}", e)))?;

        conn.busy_timeout(Duration::from_secs(10))?;
        Ok(conn)
    }

    /// Borrow a pooled connection for the duration of `f`. The connection goes
    /// back to the pool when the guard drops, including when `f` panics.
    pub(crate) fn with_conn<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&Connection) -> Result<T, DomainError>,
    {
        let conn = self.checkout();
        f(&conn)
    }

    fn checkout(&self) -> PooledConn<'_> {
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(conn) = pool.pop() {
                return PooledConn {
                    index: self,
                    conn: Some(conn),
                };
            }
            pool = self
                .available
                .wait(pool)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn optional_columns(conn: &Connection, table: &str) -> Result<OptionalColumns, DomainError> {
        let mut stmt = conn.prepare(&format!("SELECT name FROM pragma_table_info('{}')", table))?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut columns = OptionalColumns::default();
        let mut found_any = false;
        for name in names {
            found_any = true;
            match name?.to_ascii_lowercase().as_str() {
                "duration" => columns.duration = true,
                "width" => columns.width = true,
                "height" => columns.height = true,
                _ => {}
            }
        }

        if !found_any {
            return Err(DomainError::Database(format!("no such table: {}", table)));
        }
        Ok(columns)
    }

    fn select_sql(kind: MediaKind, columns: OptionalColumns, filtered: bool) -> String {
        let optional = |present: bool, name: &str| if present { name.to_string() } else { "NULL".to_string() };
        let duration = optional(kind == MediaKind::Video && columns.duration, "duration");

        format!(
            "SELECT _id, _data, _display_name, date_added, _size, mime_type,
                    bucket_id, bucket_display_name, {}, {}, {}
             FROM {}
             {}
             ORDER BY date_added DESC",
            duration,
            optional(columns.width, "width"),
            optional(columns.height, "height"),
            table_for(kind),
            if filtered { "WHERE bucket_id = ?1" } else { "" },
        )
    }
}

struct PooledConn<'a> {
    index: &'a SqliteMediaIndex,
    conn: Option<Connection>,
}

impl Deref for PooledConn<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only taken in drop.
        self.conn.as_ref().unwrap()
    }
}

impl Drop for PooledConn<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.index
                .pool
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(conn);
            self.index.available.notify_one();
        }
    }
}

/// Mandatory columns fail the row; optional ones degrade to `None`.
fn read_record(row: &Row<'_>) -> rusqlite::Result<RawMediaRecord> {
    Ok(RawMediaRecord {
        id: row.get(0)?,
        path: row.get(1)?,
        display_name: lenient_text(row, 2),
        date_added: lenient_integer(row, 3).unwrap_or(0),
        size_bytes: lenient_integer(row, 4).unwrap_or(0),
        mime_type: row.get(5)?,
        group_id: text_or_integer(row, 6)?,
        group_name: row.get(7)?,
        duration_ms: lenient_integer(row, 8),
        width: lenient_integer(row, 9),
        height: lenient_integer(row, 10),
    })
}

// Optional numeric columns: anything that is not an in-range integer reads as absent.
fn lenient_integer<T: TryFrom<i64>>(row: &Row<'_>, idx: usize) -> Option<T> {
    match row.get_ref(idx).ok()? {
        ValueRef::Integer(i) => T::try_from(i).ok(),
        _ => None,
    }
}

fn lenient_text(row: &Row<'_>, idx: usize) -> Option<String> {
    match row.get_ref(idx).ok()? {
        ValueRef::Text(t) => std::str::from_utf8(t).ok().map(str::to_string),
        _ => None,
    }
}

// Bucket ids are integers on some index versions and text on others.
fn text_or_integer(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Text(t) => Ok(Some(String::from_utf8_lossy(t).into_owned())),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "bucket_id".to_string(),
            other.data_type(),
        )),
    }
}

impl MediaIndex for SqliteMediaIndex {
    fn query_group(
        &self,
        kind: MediaKind,
        group_id: Option<&str>,
        visit: &mut RowVisitor<'_>,
    ) -> Result<(), DomainError> {
        self.with_conn(|conn| {
            let table = table_for(kind);
            let columns = Self::optional_columns(conn, table)?;
            debug!(table, ?columns, "Querying media index");

            let sql = Self::select_sql(kind, columns, group_id.is_some());
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = match group_id {
                Some(group_id) => stmt.query([group_id])?,
                None => stmt.query([])?,
            };

            while let Some(row) = rows.next()? {
                let record = read_record(row).map_err(|e| {
                    let id = row.get_ref(0).ok().and_then(|v| v.as_i64().ok());
                    DomainError::MalformedRow(format!("{} row {:?}: {}", table, id, e))
                });
                visit(record);
            }
            Ok(())
        })
    }
}
