//! DTOs exchanged with the authentication service

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{SessionId, UserId};

/// The user associated with the active session
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    /// The user identifier
    #[serde(rename = "$id")]
    pub id: UserId,

    /// The user's name, which may be empty
    #[serde(default)]
    pub name: String,

    /// The user's email address
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,

    /// The user's preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefs: Option<BTreeMap<String, serde_json::Value>>,
}

impl User {
    /// The name to show for this user
    ///
    /// Falls back from the name to the email address to the identifier.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if let Some(email) = &self.email {
            email
        } else {
            self.id.as_str()
        }
    }

    /// The upper-cased first character of the display name
    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_owned())
    }
}

/// Details of the active session
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The session identifier
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SessionId>,

    /// The OAuth provider used to establish the session
    #[serde(default)]
    pub provider: String,

    /// The user's identifier at the provider
    #[serde(default)]
    pub provider_uid: String,

    /// When the provider's access token expires, as an RFC 3339 timestamp
    #[serde(default)]
    pub provider_access_token_expiry: String,

    /// When the session was created, as an RFC 3339 timestamp
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
}

impl Session {
    /// When the session was created, if the timestamp is well-formed
    pub fn created(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.created_at, &Rfc3339).ok()
    }

    /// When the provider's access token expires, if the timestamp is well-formed
    pub fn provider_access_token_expires(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.provider_access_token_expiry, &Rfc3339).ok()
    }
}

/// The error body returned by the service
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: Option<&str>) -> User {
        User {
            id: UserId::from_static("64f0c0ffee"),
            name: name.to_owned(),
            email: email.map(ToOwned::to_owned),
            prefs: None,
        }
    }

    #[test]
    fn display_name_prefers_name() {
        assert_eq!(user("Ada", Some("ada@example.com")).display_name(), "Ada");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(
            user("", Some("ada@example.com")).display_name(),
            "ada@example.com"
        );
    }

    #[test]
    fn display_name_falls_back_to_identifier() {
        assert_eq!(user("", None).display_name(), "64f0c0ffee");
    }

    #[test]
    fn initial_is_upper_cased() {
        assert_eq!(user("ada", None).initial(), "A");
        assert_eq!(user("", Some("zed@example.com")).initial(), "Z");
    }

    #[test]
    fn user_with_empty_email_deserializes_without_email() {
        let user: User = serde_json::from_str(
            r#"{"$id":"64f0c0ffee","name":"Ada","email":"","prefs":{"theme":"dark"}}"#,
        )
        .unwrap();

        assert_eq!(user.email, None);
        assert_eq!(
            user.prefs.unwrap().get("theme"),
            Some(&serde_json::Value::from("dark"))
        );
    }

    #[test]
    fn session_parses_timestamps() {
        let session: Session = serde_json::from_str(
            r#"{
                "$id": "s1",
                "$createdAt": "2024-03-01T12:30:00.000+00:00",
                "provider": "google",
                "providerUid": "1234",
                "providerAccessTokenExpiry": "not a timestamp"
            }"#,
        )
        .unwrap();

        let created = session.created().unwrap();
        assert_eq!(created.year(), 2024);
        assert_eq!(created.day(), 1);
        assert_eq!(session.provider_access_token_expires(), None);
    }
}
