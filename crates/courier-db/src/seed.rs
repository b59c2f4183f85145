//! Bootstrap loader for the CSV fixtures under `seed/`.
//!
//! `users.csv`:         `id,email`
//! `notifications.csv`: `id,userId,title,description,type,createdAt`

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use courier_types::models::{ChannelType, Notification};
use tracing::{info, warn};

use crate::Database;

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load `users.csv` then `notifications.csv` from `dir`.
pub fn seed_from_dir(db: &Database, dir: &Path) -> Result<()> {
    let users = load_users(db, &dir.join("users.csv"))?;
    let notifications = load_notifications(db, &dir.join("notifications.csv"))?;
    info!(users, notifications, dir = %dir.display(), "Seed data loaded");
    Ok(())
}

/// Insert every complete `id,email` record. Returns the number of records inserted or ignored.
pub fn load_users(db: &Database, path: &Path) -> Result<usize> {
    let mut reader = open_csv(path)?;

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO users (id, email) VALUES (?1, ?2)")?;
            for record in reader.records() {
                let record = record.with_context(|| format!("reading {}", path.display()))?;
                if record.len() < 2 {
                    continue;
                }
                let (id, email) = (&record[0], &record[1]);
                if id.is_empty() || email.is_empty() {
                    continue;
                }
                stmt.execute((id, email))?;
                count += 1;
            }
        }
        tx.commit()?;
        Ok(count)
    })
}

/// Insert every complete notification record. A `createdAt` that does not
/// match [`CREATED_AT_FORMAT`] is logged and stored as-is; an unknown type
/// aborts the whole file.
pub fn load_notifications(db: &Database, path: &Path) -> Result<usize> {
    let mut reader = open_csv(path)?;

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let mut count = 0;
        for record in reader.records() {
            let record = record.with_context(|| format!("reading {}", path.display()))?;
            if record.len() < 6 {
                continue;
            }
            let (id, user_id) = (&record[0], &record[1]);
            if id.is_empty() || user_id.is_empty() {
                continue;
            }

            let created_at = &record[5];
            if let Err(e) = NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT) {
                warn!(id, created_at, error = %e, "Invalid createdAt in seed data");
            }

            let channel: ChannelType = record[4]
                .parse()
                .with_context(|| format!("notification {} in {}", id, path.display()))?;

            crate::queries::insert_notification(
                &tx,
                &Notification {
                    id: id.to_string(),
                    user_id: user_id.to_string(),
                    title: record[2].to_string(),
                    description: record[3].to_string(),
                    channel,
                    created_at: created_at.to_string(),
                },
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    })
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}
