use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// Authenticated user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
    // Free-form user metadata captured at sign-up (names, country).
    pub metadata: Value,
}

impl SessionUser {
    // Non-empty string value stored under `key` in the user metadata.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

// Live session held by the auth provider; read-only for the booking flow.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHandle {
    pub access_token: String,
    pub refresh_token: Option<String>,
    // Unix seconds; `None` when the provider did not report an expiry.
    pub expires_at: Option<u64>,
    pub user: SessionUser,
}

impl SessionHandle {
    pub fn is_expired(&self, now_epoch_seconds: u64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now_epoch_seconds)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    #[default]
    Buy,
    Rent,
    Safari,
}

impl Preference {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(Preference::Buy),
            "rent" => Some(Preference::Rent),
            "safari" => Some(Preference::Safari),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Buy => "buy",
            Preference::Rent => "rent",
            Preference::Safari => "safari",
        }
    }
}

// Row of the `profiles` table, keyed by `user_id`. Every column is nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub preference: Option<String>,
    pub about: Option<String>,
}

impl ProfileRecord {
    // "First Last" with missing parts dropped; `None` when both are blank.
    pub fn full_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        let name = format!("{first} {last}").trim().to_string();
        (!name.is_empty()).then_some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_only_first_name_is_set_then_full_name_is_trimmed() {
        let profile = ProfileRecord {
            first_name: Some("Jane".to_string()),
            ..Default::default()
        };

        assert_eq!(profile.full_name().as_deref(), Some("Jane"));
    }

    #[test]
    fn when_names_are_missing_then_full_name_is_none() {
        assert_eq!(ProfileRecord::default().full_name(), None);
    }

    #[test]
    fn when_metadata_value_is_blank_then_metadata_str_is_none() {
        let user = SessionUser {
            id: Uuid::nil(),
            email: None,
            metadata: json!({ "first_name": "  ", "country": "Kenya", "age": 3 }),
        };

        assert_eq!(user.metadata_str("first_name"), None);
        assert_eq!(user.metadata_str("country"), Some("Kenya"));
        assert_eq!(user.metadata_str("age"), None);
    }

    #[test]
    fn when_expiry_equals_now_then_session_is_expired() {
        let session = SessionHandle {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: Some(1_700_000_000),
            user: SessionUser {
                id: Uuid::nil(),
                email: None,
                metadata: Value::Null,
            },
        };

        assert!(session.is_expired(1_700_000_000));
        assert!(!session.is_expired(1_699_999_999));
    }
}
