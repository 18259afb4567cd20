use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use tracing::debug;

use crate::error::AppError;
use crate::model::Recipe;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS recipes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL UNIQUE CHECK (length(title) <= 100),
    description TEXT NOT NULL,
    author      TEXT NOT NULL CHECK (length(author) <= 50),
    date_posted TEXT NOT NULL
)";

/// Durable keyed storage for [`Recipe`] records.
///
/// Every mutating operation commits before returning (SQLite autocommit);
/// there is no deferred or batched writing. Concurrent writers race at the
/// commit, last writer wins.
pub struct RecipeStore {
    conn: Mutex<Connection>,
}

impl RecipeStore {
    /// Opens (creating if needed) the database file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// An in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("recipe store mutex poisoned")
    }

    /// Every stored recipe, in storage (id) order.
    pub fn list_all(&self) -> Result<Vec<Recipe>, AppError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, author, date_posted FROM recipes ORDER BY id",
        )?;
        let recipes = stmt
            .query_map([], row_to_recipe)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    pub fn get(&self, id: i64) -> Result<Recipe, AppError> {
        self.conn()
            .query_row(
                "SELECT id, title, description, author, date_posted FROM recipes WHERE id = ?1",
                params![id],
                row_to_recipe,
            )
            .optional()?
            .ok_or(AppError::NotFound)
    }

    /// Persists a new recipe, assigning its id and posting time.
    pub fn create(
        &self,
        title: &str,
        description: &str,
        author: &str,
    ) -> Result<Recipe, AppError> {
        require_present("title", title)?;
        require_present("description", description)?;
        require_present("author", author)?;

        let date_posted = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO recipes (title, description, author, date_posted)
             VALUES (?1, ?2, ?3, ?4)",
            params![title, description, author, date_posted],
        )
        .map_err(constraint_or_db)?;
        let id = conn.last_insert_rowid();
        debug!(id, title, "recipe created");

        Ok(Recipe {
            id,
            title: title.to_owned(),
            description: description.to_owned(),
            author: author.to_owned(),
            date_posted,
        })
    }

    /// Overwrites title and description; author and posting time stay as they are.
    pub fn update(&self, id: i64, title: &str, description: &str) -> Result<Recipe, AppError> {
        require_present("title", title)?;
        require_present("description", description)?;

        let changed = self
            .conn()
            .execute(
                "UPDATE recipes SET title = ?1, description = ?2 WHERE id = ?3",
                params![title, description, id],
            )
            .map_err(constraint_or_db)?;
        if changed == 0 {
            return Err(AppError::NotFound);
        }
        debug!(id, title, "recipe updated");
        self.get(id)
    }

    /// Permanent removal; deleting an id twice fails the second time.
    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        let changed = self
            .conn()
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(AppError::NotFound);
        }
        debug!(id, "recipe deleted");
        Ok(())
    }
}

fn row_to_recipe(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        author: row.get(3)?,
        date_posted: row.get(4)?,
    })
}

fn require_present(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Constraint(format!("{field} is required")));
    }
    Ok(())
}

fn constraint_or_db(err: rusqlite::Error) -> AppError {
    match &err {
        rusqlite::Error::SqliteFailure(f, msg) if f.code == ErrorCode::ConstraintViolation => {
            AppError::Constraint(msg.clone().unwrap_or_else(|| "constraint failed".into()))
        }
        _ => AppError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecipeStore {
        RecipeStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_then_list_contains_the_record() {
        let store = store();
        let before = Utc::now();
        let created = store.create("Pasta", "Boil water, add pasta", "Joey").unwrap();

        assert!(created.date_posted >= before);

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].title, "Pasta");
        assert_eq!(all[0].author, "Joey");
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store = store();
        assert!(matches!(store.get(999), Err(AppError::NotFound)));
        assert!(matches!(store.update(999, "x", "y"), Err(AppError::NotFound)));
        assert!(matches!(store.delete(999), Err(AppError::NotFound)));
    }

    #[test]
    fn duplicate_title_is_rejected_and_first_record_kept() {
        let store = store();
        store.create("Pasta", "first", "Joey").unwrap();
        let err = store.create("Pasta", "second", "Mia").unwrap_err();
        assert!(matches!(err, AppError::Constraint(_)));

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "first");
    }

    #[test]
    fn empty_required_fields_are_rejected() {
        let store = store();
        assert!(matches!(
            store.create("", "desc", "Joey"),
            Err(AppError::Constraint(_))
        ));
        assert!(matches!(
            store.create("Pasta", "  ", "Joey"),
            Err(AppError::Constraint(_))
        ));
        assert!(matches!(
            store.create("Pasta", "desc", ""),
            Err(AppError::Constraint(_))
        ));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn update_changes_title_and_description_only() {
        let store = store();
        let created = store.create("Soup", "old text", "Joey").unwrap();

        let updated = store.update(created.id, "Stew", "new text").unwrap();
        assert_eq!(updated.title, "Stew");
        assert_eq!(updated.description, "new text");

        let fetched = store.get(created.id).unwrap();
        assert_eq!(fetched.title, "Stew");
        assert_eq!(fetched.description, "new text");
        assert_eq!(fetched.author, created.author);
        assert_eq!(fetched.date_posted, created.date_posted);
    }

    #[test]
    fn update_to_duplicate_title_is_rejected() {
        let store = store();
        store.create("Pasta", "a", "Joey").unwrap();
        let other = store.create("Soup", "b", "Mia").unwrap();
        assert!(matches!(
            store.update(other.id, "Pasta", "b"),
            Err(AppError::Constraint(_))
        ));
    }

    #[test]
    fn delete_is_permanent_and_not_repeatable() {
        let store = store();
        let created = store.create("Pasta", "a", "Joey").unwrap();

        store.delete(created.id).unwrap();
        assert!(matches!(store.get(created.id), Err(AppError::NotFound)));
        assert!(matches!(store.delete(created.id), Err(AppError::NotFound)));
    }

    #[test]
    fn titles_longer_than_the_cap_are_rejected() {
        let store = store();
        let long = "t".repeat(101);
        assert!(matches!(
            store.create(&long, "desc", "Joey"),
            Err(AppError::Constraint(_))
        ));

        // 100 characters is still within the cap.
        let at_cap = "t".repeat(100);
        let created = store.create(&at_cap, "desc", "Joey").unwrap();
        assert_eq!(created.title, at_cap);
    }

    #[test]
    fn authors_longer_than_the_cap_are_rejected() {
        let store = store();
        let long = "a".repeat(51);
        assert!(matches!(
            store.create("Pasta", "desc", &long),
            Err(AppError::Constraint(_))
        ));
        assert!(store.list_all().unwrap().is_empty());
    }
}
