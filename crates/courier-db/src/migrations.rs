use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        // Preference flags carry no column default: a missing row is the
        // only way a user gets the all-allowed default.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id      TEXT PRIMARY KEY,
                email   TEXT NOT NULL UNIQUE
            );

            CREATE TABLE notifications (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title       TEXT NOT NULL,
                description TEXT NOT NULL,
                type        TEXT NOT NULL CHECK (type IN ('EMAIL', 'SMS', 'PUSH')),
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_notifications_user
                ON notifications(user_id, created_at);

            CREATE TABLE user_preferences (
                user_id     TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                allow_email BOOLEAN NOT NULL,
                allow_sms   BOOLEAN NOT NULL,
                allow_push  BOOLEAN NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerunning_migrations_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn notification_type_is_constrained() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute("INSERT INTO users (id, email) VALUES ('u1', 'a@example.com')", [])
            .unwrap();

        let bad = conn.execute(
            "INSERT INTO notifications (id, user_id, title, description, type, created_at)
             VALUES ('n1', 'u1', 't', 'd', 'FAX', '2024-01-01 00:00:00')",
            [],
        );
        assert!(bad.is_err());
    }
}
