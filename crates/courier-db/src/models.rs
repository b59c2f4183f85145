//! Database row types. These map directly to SQLite rows.
//! Distinct from courier-types models to keep the DB layer independent.

use courier_types::models::{ChannelType, Notification, Preferences};

pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub created_at: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = courier_types::models::UnknownChannelType;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            channel: row.kind.parse::<ChannelType>()?,
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

pub struct PreferencesRow {
    pub user_id: String,
    pub allow_email: bool,
    pub allow_sms: bool,
    pub allow_push: bool,
}

impl From<PreferencesRow> for Preferences {
    fn from(row: PreferencesRow) -> Self {
        Preferences {
            user_id: row.user_id,
            email: row.allow_email,
            sms: row.allow_sms,
            push: row.allow_push,
        }
    }
}
