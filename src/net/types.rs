//! Wire types shared by the gateways and view models.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON exactly (`teacher_id` and `users`
//! on sessions, camelCase elsewhere). Timestamps travel as ISO-8601 strings
//! and are decoded into `time` values on read; see [`timestamp`].

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

pub type UserId = i64;
pub type SessionId = i64;
pub type TeacherId = i64;

// =============================================================================
// AUTH
// =============================================================================

/// Login-session record returned by `POST auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInformation {
    pub token: String,
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub admin: bool,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

impl SessionInformation {
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_owned()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// `Authorization` header value for this record.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

// =============================================================================
// CLASS SESSIONS
// =============================================================================

/// A scheduled class as returned by `GET session` / `GET session/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: SessionId,
    pub name: String,
    pub description: String,
    #[serde(with = "timestamp")]
    pub date: OffsetDateTime,
    #[serde(rename = "teacher_id")]
    pub teacher_id: TeacherId,
    /// Participant user ids. Membership only; order is not meaningful.
    #[serde(rename = "users", default)]
    pub participants: BTreeSet<UserId>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

impl ClassSession {
    #[must_use]
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    /// Editable fields of this session, e.g. to prefill an edit form.
    #[must_use]
    pub fn to_payload(&self) -> SessionPayload {
        SessionPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            date: self.date.date(),
            teacher_id: self.teacher_id,
        }
    }
}

/// Body of `POST session` and `PUT session/{id}`: a full replace of the
/// editable fields. Ids and participants are owned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub name: String,
    pub description: String,
    #[serde(with = "timestamp::day")]
    pub date: Date,
    pub teacher_id: TeacherId,
}

// =============================================================================
// TEACHERS / USERS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Teacher {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

// =============================================================================
// TIMESTAMP CODEC
// =============================================================================

/// ISO-8601 codec for backend timestamps.
///
/// Accepted on read, in order: RFC 3339 (`2025-04-10T00:00:00.000+00:00`),
/// an offset-less local date-time (`2025-04-10T09:30:00`, taken as UTC),
/// and a bare day (`2025-04-10`, midnight UTC). Written back as RFC 3339.
pub mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;
    use time::{Date, OffsetDateTime, PrimitiveDateTime};

    /// Parse any accepted timestamp shape.
    ///
    /// # Errors
    ///
    /// Returns a description of the input when no shape matches.
    pub fn parse(raw: &str) -> Result<OffsetDateTime, String> {
        let raw = raw.trim();
        if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(value);
        }
        if let Ok(value) = PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
        ) {
            return Ok(value.assume_utc());
        }
        if let Ok(day) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            return Ok(day.midnight().assume_utc());
        }
        Err(format!("unrecognized timestamp: {raw:?}"))
    }

    /// Render a day as `YYYY-MM-DD`.
    #[must_use]
    pub fn format_day(day: Date) -> String {
        day.format(format_description!("[year]-[month]-[day]")).unwrap_or_default()
    }

    /// Parse a `YYYY-MM-DD` day.
    ///
    /// # Errors
    ///
    /// Returns a description of the input when it is not a calendar day.
    pub fn parse_day(raw: &str) -> Result<Date, String> {
        Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| format!("unrecognized day: {raw:?}"))
    }

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::OffsetDateTime;

        pub fn serialize<S: Serializer>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }

    /// Day-granularity fields: written as `YYYY-MM-DD`, read from any
    /// accepted timestamp shape.
    pub mod day {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(value: &Date, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&super::format_day(*value))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
            let raw = String::deserialize(deserializer)?;
            super::parse(&raw).map(|value| value.date()).map_err(serde::de::Error::custom)
        }
    }
}
