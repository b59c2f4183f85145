use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delivery medium of a notification. Stored and serialised as the
/// upper-case literal (`EMAIL`, `SMS`, `PUSH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelType {
    Email,
    Sms,
    Push,
}

impl ChannelType {
    pub const ALL: [ChannelType; 3] = [ChannelType::Email, ChannelType::Sms, ChannelType::Push];

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelType::Email => "EMAIL",
            ChannelType::Sms => "SMS",
            ChannelType::Push => "PUSH",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChannelType(pub String);

impl fmt::Display for UnknownChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown channel type '{}'", self.0)
    }
}

impl std::error::Error for UnknownChannelType {}

impl FromStr for ChannelType {
    type Err = UnknownChannelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(ChannelType::Email),
            "SMS" => Ok(ChannelType::Sms),
            "PUSH" => Ok(ChannelType::Push),
            other => Err(UnknownChannelType(other.to_string())),
        }
    }
}

/// A notification addressed to a single user.
///
/// `created_at` is kept as the raw stored string (`YYYY-MM-DD HH:MM:SS` when
/// well-formed). Seeded rows with malformed timestamps are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub channel: ChannelType,
    pub created_at: String,
}

/// Per-user channel allow-flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(skip)]
    pub user_id: String,
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

impl Preferences {
    /// The value used when a user has no stored preferences row.
    pub fn allow_all(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: true,
            sms: true,
            push: true,
        }
    }

    /// Allowed channel types, always in EMAIL, SMS, PUSH order.
    pub fn allowed_channels(&self) -> Vec<ChannelType> {
        let mut allowed = Vec::with_capacity(3);
        if self.email {
            allowed.push(ChannelType::Email);
        }
        if self.sms {
            allowed.push(ChannelType::Sms);
        }
        if self.push {
            allowed.push(ChannelType::Push);
        }
        allowed
    }
}

/// A partial preferences write. `None` leaves the stored flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PreferencesUpdate {
    pub email: Option<bool>,
    pub sms: Option<bool>,
    pub push: Option<bool>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.sms.is_none() && self.push.is_none()
    }
}
