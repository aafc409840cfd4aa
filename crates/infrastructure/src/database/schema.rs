// Database schema for the article store
diesel::table! {
    posts (id) {
        id -> Integer,
        title -> Text,
        content -> Text,
        category -> Text,
        created_date -> Timestamp,
        updated_date -> Timestamp,
        status -> Text,            // publish, draft, trash
    }
}

/// DDL applied on startup. AUTOINCREMENT keeps SQLite from handing out the id
/// of a removed row again.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    category TEXT NOT NULL,
    created_date TIMESTAMP NOT NULL,
    updated_date TIMESTAMP NOT NULL,
    status TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posts_status_updated
    ON posts (status, updated_date DESC, id DESC);
";
