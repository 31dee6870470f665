//! Signed-in user profile.

use mma_shop_core::{Email, Phone, UserId};
use serde::{Deserialize, Deserializer, Serialize};

/// Profile of the signed-in user as returned by the account service.
///
/// `address` is always a string: a missing or `null` address reads as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub dob: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Address to ship to, or `None` when the profile has none.
    #[must_use]
    pub fn delivery_address(&self) -> Option<String> {
        let address = self.address.trim();
        (!address.is_empty()).then(|| address.to_owned())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_address_read_as_empty() {
        let missing = r#"{"_id":"u1","name":"Lan","email":"lan@example.vn","phone":"0912345678","dob":"2000-01-01"}"#;
        let profile: UserProfile = serde_json::from_str(missing).unwrap();
        assert_eq!(profile.address, "");
        assert_eq!(profile.delivery_address(), None);

        let null = r#"{"_id":"u1","name":"Lan","email":"lan@example.vn","phone":"0912345678","dob":"2000-01-01","address":null}"#;
        let profile: UserProfile = serde_json::from_str(null).unwrap();
        assert_eq!(profile.address, "");
    }

    #[test]
    fn test_delivery_address() {
        let json = r#"{"_id":"u1","name":"Lan","email":"lan@example.vn","phone":"0912345678","dob":"2000-01-01","address":" 12 Le Loi, Hue "}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.delivery_address().as_deref(), Some("12 Le Loi, Hue"));
    }
}
