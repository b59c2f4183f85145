use crate::models::{NotificationRow, PreferencesRow};
use crate::Database;
use anyhow::{Result, anyhow};
use courier_types::models::{ChannelType, Notification, Preferences, PreferencesUpdate};
use rusqlite::{Connection, TransactionBehavior};

impl Database {
    // -- Users --

    pub fn insert_user(&self, id: &str, email: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO users (id, email) VALUES (?1, ?2)",
                (id, email),
            )?;
            Ok(())
        })
    }

    pub fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id FROM users WHERE email = ?1", [email], |row| row.get(0))
                .optional()
        })
    }

    // -- Notifications --

    pub fn insert_notification(&self, n: &Notification) -> Result<()> {
        self.with_conn(|conn| insert_notification(conn, n))
    }

    /// Notifications owned by `user_id` whose type is in `allowed`, newest
    /// first. `datetime(created_at)` orders chronologically; malformed
    /// timestamps evaluate to NULL and land after every valid one.
    ///
    /// An empty `allowed` slice matches nothing and never reaches SQLite.
    pub fn list_notifications(
        &self,
        user_id: &str,
        allowed: &[ChannelType],
    ) -> Result<Vec<Notification>> {
        if allowed.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| query_notifications(conn, user_id, allowed))
    }

    // -- Preferences --

    /// Stored preferences, or `None` when the user has never written any.
    pub fn get_preferences(&self, user_id: &str) -> Result<Option<Preferences>> {
        self.with_conn(|conn| query_preferences(conn, user_id))
    }

    /// Create-or-patch the preferences row and return the stored result.
    /// A new row starts with every flag not named in `update` set to true.
    pub fn upsert_preferences(
        &self,
        user_id: &str,
        update: &PreferencesUpdate,
    ) -> Result<Preferences> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            tx.execute(
                "INSERT INTO user_preferences (user_id, allow_email, allow_sms, allow_push)
                 VALUES (?1, COALESCE(?2, 1), COALESCE(?3, 1), COALESCE(?4, 1))
                 ON CONFLICT(user_id) DO UPDATE SET
                     allow_email = COALESCE(?2, allow_email),
                     allow_sms   = COALESCE(?3, allow_sms),
                     allow_push  = COALESCE(?4, allow_push)",
                rusqlite::params![user_id, update.email, update.sms, update.push],
            )?;

            let prefs = query_preferences(&tx, user_id)?
                .ok_or_else(|| anyhow!("Preferences row missing after upsert: {}", user_id))?;

            tx.commit()?;
            Ok(prefs)
        })
    }
}

pub(crate) fn insert_notification(conn: &Connection, n: &Notification) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO notifications (id, user_id, title, description, type, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            n.id,
            n.user_id,
            n.title,
            n.description,
            n.channel.as_str(),
            n.created_at
        ],
    )?;
    Ok(())
}

fn query_notifications(
    conn: &Connection,
    user_id: &str,
    allowed: &[ChannelType],
) -> Result<Vec<Notification>> {
    let placeholders: Vec<String> = (2..=allowed.len() + 1).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT id, user_id, title, description, type, created_at
         FROM notifications
         WHERE user_id = ?1 AND type IN ({})
         ORDER BY datetime(created_at) DESC",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let kinds: Vec<&str> = allowed.iter().map(|c| c.as_str()).collect();
    let mut params: Vec<&dyn rusqlite::types::ToSql> = Vec::with_capacity(kinds.len() + 1);
    params.push(&user_id);
    params.extend(kinds.iter().map(|k| k as &dyn rusqlite::types::ToSql));

    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(NotificationRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                kind: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let notifications = rows
        .into_iter()
        .map(Notification::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(notifications)
}

fn query_preferences(conn: &Connection, user_id: &str) -> Result<Option<Preferences>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, allow_email, allow_sms, allow_push FROM user_preferences WHERE user_id = ?1",
    )?;

    let row = stmt
        .query_row([user_id], |row| {
            Ok(PreferencesRow {
                user_id: row.get(0)?,
                allow_email: row.get(1)?,
                allow_sms: row.get(2)?,
                allow_push: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row.map(Preferences::from))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
