//! `SQLite` feed store over `rusqlite`.

use std::path::Path;

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params, params_from_iter};

use crate::builder::{QueryResult, Value};
use crate::dialect::Sqlite;
use crate::entity::{Grow, Photo, Plant};
use crate::store::{FeedStore, FetchError, Row};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS grow (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    environment TEXT,
    culture_medium TEXT,
    fertilizer_type TEXT,
    fertilizer_form TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS grow_owner_idx ON grow (owner_id);

CREATE TABLE IF NOT EXISTS plant (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    grow_id TEXT REFERENCES grow (id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS plant_owner_idx ON plant (owner_id);
CREATE INDEX IF NOT EXISTS plant_grow_idx ON plant (grow_id);

CREATE TABLE IF NOT EXISTS image (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    image_url TEXT NOT NULL,
    original_filename TEXT NOT NULL,
    capture_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS image_owner_idx ON image (owner_id);

CREATE TABLE IF NOT EXISTS plant_images (
    plant_id TEXT NOT NULL REFERENCES plant (id) ON DELETE CASCADE,
    image_id TEXT NOT NULL REFERENCES image (id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (plant_id, image_id)
);
";

/// Feed store backed by a `SQLite` connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, FetchError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Open a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Wrap an existing connection.
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the users, grow, plant, image and `plant_images` tables if missing.
    pub fn create_schema(&self) -> Result<(), FetchError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert an account; `username` may be unset.
    pub fn insert_user(&self, id: &str, username: Option<&str>) -> Result<(), FetchError> {
        self.conn.execute(
            "INSERT INTO users (id, username) VALUES (?1, ?2)",
            params![id, username],
        )?;
        Ok(())
    }

    /// Insert a grow.
    pub fn insert_grow(&self, grow: &Grow) -> Result<(), FetchError> {
        self.conn.execute(
            "INSERT INTO grow (id, owner_id, name, environment, culture_medium, \
             fertilizer_type, fertilizer_form, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                grow.id,
                grow.owner_id,
                grow.name,
                grow.environment,
                grow.culture_medium,
                grow.fertilizer_type,
                grow.fertilizer_form,
                grow.created_at,
                grow.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Insert a plant.
    pub fn insert_plant(&self, plant: &Plant) -> Result<(), FetchError> {
        self.conn.execute(
            "INSERT INTO plant (id, owner_id, name, grow_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                plant.id,
                plant.owner_id,
                plant.name,
                plant.grow_id,
                plant.created_at,
                plant.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Insert a photo.
    pub fn insert_photo(&self, photo: &Photo) -> Result<(), FetchError> {
        self.conn.execute(
            "INSERT INTO image (id, owner_id, image_url, original_filename, capture_date, \
             created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                photo.id,
                photo.owner_id,
                photo.image_url,
                photo.original_filename,
                photo.capture_date,
                photo.created_at,
                photo.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Connect a photo to a plant.
    pub fn link_photo(&self, plant_id: &str, image_id: &str) -> Result<(), FetchError> {
        self.conn.execute(
            "INSERT INTO plant_images (plant_id, image_id) VALUES (?1, ?2)",
            params![plant_id, image_id],
        )?;
        Ok(())
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(column: &str, value: ValueRef<'_>) -> Result<Value, FetchError> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::Int(i)),
        ValueRef::Real(f) => Ok(Value::Float(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::String(s.to_string()))
            .map_err(|_| FetchError::ColumnType {
                column: column.to_string(),
                expected: "utf-8 text",
                found: "invalid utf-8",
            }),
        ValueRef::Blob(_) => Err(FetchError::ColumnType {
            column: column.to_string(),
            expected: "scalar",
            found: "blob",
        }),
    }
}

impl FeedStore for SqliteStore {
    type Dialect = Sqlite;

    fn dialect(&self) -> Sqlite {
        Sqlite
    }

    fn fetch_rows(&self, query: &QueryResult) -> Result<Vec<Row>, FetchError> {
        let mut stmt = self.conn.prepare(&query.sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| (*c).to_string()).collect();
        let mut rows = stmt.query(params_from_iter(query.params.iter().map(to_sql)))?;

        let mut out = Vec::new();
        while let Some(sql_row) = rows.next()? {
            let mut row = Row::new();
            for (idx, column) in columns.iter().enumerate() {
                let value = from_sql(column, sql_row.get_ref(idx)?)?;
                row.push(column.as_str(), value);
            }
            out.push(row);
        }
        Ok(out)
    }

    fn count(&self, query: &QueryResult) -> Result<u64, FetchError> {
        let count: i64 = self.conn.query_row(
            &query.sql,
            params_from_iter(query.params.iter().map(to_sql)),
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| FetchError::Backend(format!("negative count {count}")))
    }
}
