use std::path::Path;
use std::time::Duration;

use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension, Row};

use crate::error::{CategoryError, CategoryResult};
use crate::types::Category;

pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS category_kids (
    parent_id INTEGER NOT NULL,
    child_id INTEGER NOT NULL UNIQUE,
    CHECK (parent_id <> child_id),
    FOREIGN KEY(parent_id) REFERENCES categories(id) ON DELETE CASCADE,
    FOREIGN KEY(child_id) REFERENCES categories(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS category_siblings (
    category_id INTEGER NOT NULL,
    sibling_id INTEGER NOT NULL,
    PRIMARY KEY (category_id, sibling_id),
    CHECK (category_id <> sibling_id),
    FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE CASCADE,
    FOREIGN KEY(sibling_id) REFERENCES categories(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_kids_parent ON category_kids(parent_id);
"#;

/// Graph operations the builder and resolvers need from a relational store.
///
/// Relation lists come back in store order, i.e. the order the edges were
/// written.
pub trait CategoryStore {
    fn create_category(&self, name: &str) -> CategoryResult<Category>;
    fn find_by_id(&self, id: i64) -> CategoryResult<Option<Category>>;
    fn find_by_name(&self, name: &str) -> CategoryResult<Option<Category>>;

    /// Adds every child to `parent`'s kids in one batch.
    fn attach_kids(&self, parent: i64, children: &[i64]) -> CategoryResult<()>;

    /// Records `a` and `b` as siblings of one another.
    fn add_sibling(&self, a: i64, b: i64) -> CategoryResult<()>;

    fn kids_of(&self, id: i64) -> CategoryResult<Vec<Category>>;

    /// The `child_of` view: categories holding `id` in their kids.
    fn parents_of(&self, id: i64) -> CategoryResult<Vec<Category>>;

    fn siblings_of(&self, id: i64) -> CategoryResult<Vec<Category>>;

    fn count(&self) -> CategoryResult<u64>;
}

pub fn open_connection(path: &Path) -> CategoryResult<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let connection = Connection::open(path)?;
    connection.busy_timeout(BUSY_TIMEOUT)?;
    connection.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        "#,
    )?;
    Ok(connection)
}

pub fn init_schema(connection: &Connection) -> CategoryResult<()> {
    connection.execute_batch(SCHEMA)?;
    Ok(())
}

impl CategoryStore for Connection {
    fn create_category(&self, name: &str) -> CategoryResult<Category> {
        match self.execute("INSERT INTO categories (name) VALUES (?1)", params![name]) {
            Ok(_) => Ok(Category {
                id: self.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(error) if is_unique_violation(&error) => Err(CategoryError::duplicate_name()),
            Err(error) => Err(error.into()),
        }
    }

    fn find_by_id(&self, id: i64) -> CategoryResult<Option<Category>> {
        let category = self
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn find_by_name(&self, name: &str) -> CategoryResult<Option<Category>> {
        let category = self
            .query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                params![name],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    fn attach_kids(&self, parent: i64, children: &[i64]) -> CategoryResult<()> {
        let mut statement =
            self.prepare_cached("INSERT INTO category_kids (parent_id, child_id) VALUES (?1, ?2)")?;
        for child in children {
            match statement.execute(params![parent, child]) {
                Ok(_) => {}
                Err(error) if is_unique_violation(&error) => {
                    return Err(CategoryError::Structural(format!(
                        "category {child} already has a parent"
                    )));
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }

    fn add_sibling(&self, a: i64, b: i64) -> CategoryResult<()> {
        if a == b {
            return Err(CategoryError::Structural(format!(
                "category {a} cannot be its own sibling"
            )));
        }
        let mut statement = self.prepare_cached(
            "INSERT OR IGNORE INTO category_siblings (category_id, sibling_id) VALUES (?1, ?2)",
        )?;
        statement.execute(params![a, b])?;
        statement.execute(params![b, a])?;
        Ok(())
    }

    fn kids_of(&self, id: i64) -> CategoryResult<Vec<Category>> {
        query_categories(
            self,
            r#"
            SELECT c.id, c.name
            FROM category_kids k
            JOIN categories c ON c.id = k.child_id
            WHERE k.parent_id = ?1
            ORDER BY k.rowid
            "#,
            id,
        )
    }

    fn parents_of(&self, id: i64) -> CategoryResult<Vec<Category>> {
        query_categories(
            self,
            r#"
            SELECT c.id, c.name
            FROM category_kids k
            JOIN categories c ON c.id = k.parent_id
            WHERE k.child_id = ?1
            ORDER BY k.rowid
            "#,
            id,
        )
    }

    fn siblings_of(&self, id: i64) -> CategoryResult<Vec<Category>> {
        query_categories(
            self,
            r#"
            SELECT c.id, c.name
            FROM category_siblings s
            JOIN categories c ON c.id = s.sibling_id
            WHERE s.category_id = ?1
            ORDER BY s.rowid
            "#,
            id,
        )
    }

    fn count(&self) -> CategoryResult<u64> {
        let count: i64 = self.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

fn query_categories(connection: &Connection, sql: &str, id: i64) -> CategoryResult<Vec<Category>> {
    let mut statement = connection.prepare_cached(sql)?;
    let rows = statement.query_map(params![id], category_from_row)?;
    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}
