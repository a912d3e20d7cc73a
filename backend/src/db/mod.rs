//! SQLite access.
//!
//! The whole service shares one connection behind an async mutex, injected
//! into Actix as `web::Data<Database>`. All query operations are read-only;
//! the only post-seed mutation is the approval toggle, which the mutex
//! serializes in-process.

pub mod seed;

use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database file. `":memory:"` gives a private
    /// in-memory database, which is what the tests use.
    pub fn new(db_path: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(db_path)?;
        // SQLite leaves foreign keys off per connection; cascade deletes on
        // review_categories depend on it.
        conn.pragma_update(None, "foreign_keys", true)?;
        log::info!("Database connection established at: {}", db_path);
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }

    /// Creates the four tables and every filterable/sortable index.
    /// Idempotent.
    pub async fn create_schema(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().await;

        // 1. Businesses table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS businesses (
                id INTEGER PRIMARY KEY,
                source_id TEXT NOT NULL,
                name TEXT NOT NULL,
                address TEXT,
                city TEXT,
                state TEXT,
                postal_code TEXT,
                latitude REAL,
                longitude REAL,
                stars REAL,
                review_count INTEGER NOT NULL DEFAULT 0,
                is_open INTEGER NOT NULL DEFAULT 1,
                categories TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_businesses_source_id ON businesses(source_id);
            CREATE INDEX IF NOT EXISTS idx_businesses_name ON businesses(name);
            CREATE INDEX IF NOT EXISTS idx_businesses_city ON businesses(city);
            CREATE INDEX IF NOT EXISTS idx_businesses_state ON businesses(state);
            CREATE INDEX IF NOT EXISTS idx_businesses_postal_code ON businesses(postal_code);",
        )?;

        // 2. Users table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                source_id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                review_count INTEGER NOT NULL DEFAULT 0,
                average_stars REAL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );",
        )?;

        // 3. Reviews table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                source_id TEXT NOT NULL UNIQUE,
                business_id INTEGER NOT NULL REFERENCES businesses(id),
                user_id INTEGER NOT NULL REFERENCES users(id),
                type TEXT NOT NULL DEFAULT 'guest-to-host',
                stars REAL NOT NULL,
                text TEXT NOT NULL,
                date TEXT NOT NULL,
                approved INTEGER NOT NULL DEFAULT 0,
                channel TEXT NOT NULL DEFAULT 'hostaway',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_reviews_business_id ON reviews(business_id);
            CREATE INDEX IF NOT EXISTS idx_reviews_user_id ON reviews(user_id);
            CREATE INDEX IF NOT EXISTS idx_reviews_date ON reviews(date);
            CREATE INDEX IF NOT EXISTS idx_reviews_stars ON reviews(stars);
            CREATE INDEX IF NOT EXISTS idx_reviews_approved ON reviews(approved);
            CREATE INDEX IF NOT EXISTS idx_reviews_channel ON reviews(channel);
            CREATE INDEX IF NOT EXISTS idx_reviews_type ON reviews(type);
            CREATE INDEX IF NOT EXISTS idx_reviews_business_date ON reviews(business_id, date);
            CREATE INDEX IF NOT EXISTS idx_reviews_approved_date ON reviews(approved, date);",
        )?;

        // 4. Review categories table, cascade-deleted with their review
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS review_categories (
                id INTEGER PRIMARY KEY,
                review_id INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
                category TEXT NOT NULL,
                rating REAL NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_review_categories_review_id ON review_categories(review_id);
            CREATE INDEX IF NOT EXISTS idx_review_categories_category ON review_categories(category);
            CREATE INDEX IF NOT EXISTS idx_review_categories_review_category
                ON review_categories(review_id, category);",
        )?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for the data-layer tests: an in-memory database and
    //! row-insertion shorthands.

    use super::Database;
    use rusqlite::{params, Connection};

    pub(crate) async fn memory_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.create_schema().await.unwrap();
        db
    }

    pub(crate) fn insert_business(conn: &Connection, source_id: &str, name: &str) -> i64 {
        conn.execute(
            "INSERT INTO businesses (source_id, name) VALUES (?1, ?2)",
            params![source_id, name],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub(crate) fn insert_user(conn: &Connection, source_id: &str, name: &str) -> i64 {
        conn.execute(
            "INSERT INTO users (source_id, name) VALUES (?1, ?2)",
            params![source_id, name],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn insert_review(
        conn: &Connection,
        source_id: &str,
        business_id: i64,
        user_id: i64,
        stars: f64,
        date: &str,
        channel: &str,
        approved: bool,
    ) -> i64 {
        conn.execute(
            "INSERT INTO reviews (source_id, business_id, user_id, stars, text, date, approved, channel)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                source_id,
                business_id,
                user_id,
                stars,
                "Great stay, would come back.",
                date,
                approved,
                channel
            ],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub(crate) fn insert_category(conn: &Connection, review_id: i64, category: &str, rating: f64) {
        conn.execute(
            "INSERT INTO review_categories (review_id, category, rating) VALUES (?1, ?2, ?3)",
            params![review_id, category, rating],
        )
        .unwrap();
    }
}
