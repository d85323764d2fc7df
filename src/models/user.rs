use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Verified,
    Rejected,
}

/// A platform account as listed in the admin user table. Distinct from
/// [`crate::auth::UserSummary`], which is the slim shape the login
/// endpoint returns for the operator themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn awaiting_review(&self) -> bool {
        self.verification_status == VerificationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_shape() {
        let json = r#"{
            "id": "u-12",
            "name": "Carlos Lima",
            "email": "carlos@example.com",
            "phone": "+55 92 99999-0000",
            "verificationStatus": "pending",
            "createdAt": "2026-03-10T12:00:00Z"
        }"#;

        let user: UserAccount = serde_json::from_str(json).expect("user should parse");
        assert!(user.awaiting_review());
        assert_eq!(user.phone.as_deref(), Some("+55 92 99999-0000"));
    }
}
